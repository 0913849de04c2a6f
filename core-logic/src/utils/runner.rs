use crate::config::DispatchMode;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, Instrument};

/// Outcome of a single dispatch round.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchStats {
    pub dispatched: usize,
    pub panicked: usize,
}

pub struct WorkerRunner;

impl WorkerRunner {
    /// Runs `job` once per item.
    ///
    /// Sequential mode awaits each job in order. Concurrent mode spawns every
    /// job onto a `JoinSet` gated by a semaphore, so at most `max_workers` are
    /// in flight, and joins them all before returning. Results are not
    /// collected; jobs log their own outcome.
    pub async fn dispatch<T, F, Fut>(items: Vec<T>, mode: DispatchMode, job: F) -> DispatchStats
    where
        T: Send + 'static,
        F: Fn(usize, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let total = items.len();
        let start_time = std::time::Instant::now();
        let mut stats = DispatchStats::default();

        match mode {
            DispatchMode::Sequential => {
                info!("Running {} accounts sequentially", total);
                for (i, item) in items.into_iter().enumerate() {
                    let span = tracing::info_span!("worker", worker_id = format!("{:03}", i + 1));
                    job(i, item).instrument(span).await;
                    stats.dispatched += 1;
                }
            }
            DispatchMode::Concurrent { max_workers } => {
                let workers = max_workers.max(1);
                info!("Running {} accounts on {} workers", total, workers);

                let permits = Arc::new(Semaphore::new(workers));
                let job = Arc::new(job);
                let mut set = JoinSet::new();

                for (i, item) in items.into_iter().enumerate() {
                    let permits = permits.clone();
                    let job = job.clone();
                    let span = tracing::info_span!("worker", worker_id = format!("{:03}", i + 1));

                    set.spawn(
                        async move {
                            // The semaphore is never closed, so acquire only fails if
                            // that invariant is broken; run unthrottled in that case.
                            let _permit = permits.acquire_owned().await.ok();
                            job(i, item).await;
                        }
                        .instrument(span),
                    );
                    stats.dispatched += 1;
                }

                while let Some(res) = set.join_next().await {
                    if let Err(e) = res {
                        stats.panicked += 1;
                        error!("A worker task panicked or failed to join: {:?}", e);
                    }
                }
            }
        }

        info!(
            "Batch finished: {} accounts in {:.1}s ({} panicked)",
            stats.dispatched,
            start_time.elapsed().as_secs_f64(),
            stats.panicked
        );
        stats
    }
}
