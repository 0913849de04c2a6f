use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Due-time bookkeeping for a single recurring job.
#[derive(Debug, Clone, Copy)]
pub struct ScheduleState {
    interval: Duration,
    /// `None` when the due time is past what `Instant` can represent.
    next_run: Option<Instant>,
}

impl ScheduleState {
    /// Registers a job at `now`; it first becomes due one interval later.
    pub fn register(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_run: now.checked_add(interval),
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        self.next_run.is_some_and(|due| now >= due)
    }

    /// Re-arms after a run that finished at `finished_at`.
    pub fn mark_ran(&mut self, finished_at: Instant) {
        self.next_run = finished_at.checked_add(self.interval);
    }

    pub fn next_run(&self) -> Option<Instant> {
        self.next_run
    }
}

/// Runs a job immediately and then every `interval`, checking once per `tick`.
pub struct IntervalScheduler {
    interval: Duration,
    tick: Duration,
}

impl IntervalScheduler {
    pub const DEFAULT_TICK: Duration = Duration::from_secs(60);

    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            tick: Self::DEFAULT_TICK,
        }
    }

    /// Saturates at `Duration::MAX` for absurdly large hour counts.
    pub fn every_hours(hours: u64) -> Self {
        let interval = hours
            .checked_mul(3600)
            .map(Duration::from_secs)
            .unwrap_or(Duration::MAX);
        Self::new(interval)
    }

    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Loops until `shutdown` fires. Returns the number of completed runs.
    ///
    /// The job is registered before the first immediate run, so the first
    /// scheduled run is one interval after start regardless of how long the
    /// immediate run took. A run still in flight when `shutdown` fires is
    /// dropped and not counted.
    pub async fn run<F, Fut>(&self, shutdown: CancellationToken, mut job: F) -> u64
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ()>,
    {
        let mut state = ScheduleState::register(self.interval, Instant::now());
        let mut runs = 0u64;

        if !Self::run_once(&shutdown, job()).await {
            warn!("🛑 Scheduler interrupted during the first run");
            return runs;
        }
        runs += 1;

        loop {
            if state.is_due(Instant::now()) {
                info!("⏰ Scheduled interval elapsed, starting next cycle");
                if !Self::run_once(&shutdown, job()).await {
                    warn!("🛑 Scheduler interrupted after {} runs", runs);
                    return runs;
                }
                runs += 1;
                state.mark_ran(Instant::now());
                match state.next_run() {
                    Some(due) => debug!(
                        "Next cycle due in {}s",
                        due.saturating_duration_since(Instant::now()).as_secs()
                    ),
                    None => debug!("Next cycle time is out of range"),
                }
            }

            tokio::select! {
                _ = shutdown.cancelled() => {
                    warn!("🛑 Scheduler stopped after {} runs", runs);
                    return runs;
                }
                _ = tokio::time::sleep(self.tick) => {}
            }
        }
    }

    /// Drives one run; `false` if `shutdown` fired first.
    async fn run_once<Fut: Future<Output = ()>>(shutdown: &CancellationToken, run: Fut) -> bool {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => false,
            _ = run => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_state_due_after_interval() {
        let start = Instant::now();
        let mut state = ScheduleState::register(Duration::from_secs(3600), start);

        assert!(!state.is_due(start));
        assert!(!state.is_due(start + Duration::from_secs(3599)));
        assert!(state.is_due(start + Duration::from_secs(3600)));

        let finished = start + Duration::from_secs(3700);
        state.mark_ran(finished);
        assert_eq!(state.next_run(), Some(finished + Duration::from_secs(3600)));
        assert!(!state.is_due(finished + Duration::from_secs(10)));
    }

    #[tokio::test]
    async fn test_immediate_run_then_stop() {
        let counter = Arc::new(AtomicU64::new(0));
        let token = CancellationToken::new();
        let scheduler = IntervalScheduler::every_hours(24).with_tick(Duration::from_millis(5));

        let c = counter.clone();
        let t = token.clone();
        let runs = scheduler
            .run(token.clone(), move || {
                let c = c.clone();
                let t = t.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    t.cancel();
                }
            })
            .await;

        assert_eq!(runs, 1);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_repeats_when_interval_elapses() {
        let counter = Arc::new(AtomicU64::new(0));
        let token = CancellationToken::new();
        let scheduler = IntervalScheduler::new(Duration::from_millis(20))
            .with_tick(Duration::from_millis(5));

        let c = counter.clone();
        let t = token.clone();
        let runs = scheduler
            .run(token.clone(), move || {
                let c = c.clone();
                let t = t.clone();
                async move {
                    if c.fetch_add(1, Ordering::SeqCst) + 1 >= 3 {
                        t.cancel();
                    }
                }
            })
            .await;

        assert_eq!(runs, 3);
    }

    #[test]
    fn test_huge_interval_never_due() {
        let start = Instant::now();
        let state = ScheduleState::register(Duration::MAX, start);
        assert_eq!(state.next_run(), None);
        assert!(!state.is_due(start + Duration::from_secs(10 * 365 * 24 * 3600)));
    }

    #[test]
    fn test_every_hours_saturates() {
        assert_eq!(IntervalScheduler::every_hours(u64::MAX).interval(), Duration::MAX);
        assert_eq!(
            IntervalScheduler::every_hours(24).interval(),
            Duration::from_secs(86_400)
        );
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_running_job() {
        let token = CancellationToken::new();
        let scheduler = IntervalScheduler::every_hours(24).with_tick(Duration::from_millis(5));

        let t = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            t.cancel();
        });

        let started = std::time::Instant::now();
        let runs = scheduler
            .run(token, || tokio::time::sleep(Duration::from_secs(30)))
            .await;

        assert_eq!(runs, 0);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
