//! Batch cycle: load accounts (and proxies), then run one script per account.

use crate::config::NewtonConfig;
use crate::session::AccountSession;
use crate::tasks::{
    DailyRollTask, Pacer, RandomPacer, ScriptContext, SocialQuestTask, Task, TaskResult,
};
use core_logic::{
    AccountManager, ConfigError, IntervalScheduler, ProxyConfig, ProxyManager, SessionToken,
    WorkerRunner,
};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    DailyRoll,
    SocialQuests,
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Script::DailyRoll => write!(f, "daily roll"),
            Script::SocialQuests => write!(f, "social quests"),
        }
    }
}

/// One account paired with its index-aligned proxy, if proxy mode is on.
#[derive(Debug, Clone)]
pub struct AccountJob {
    pub token: SessionToken,
    pub proxy: Option<ProxyConfig>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub accounts: usize,
    pub aborted: bool,
}

/// Reads the accounts file and, in proxy mode, the proxies file.
///
/// Fails without producing any job when proxies cannot cover every account.
pub fn load_jobs(config: &NewtonConfig) -> Result<Vec<AccountJob>, ConfigError> {
    let accounts = AccountManager::load(&config.accounts.accounts_file)?;

    if !config.proxy.enabled {
        return Ok(accounts
            .into_iter()
            .map(|token| AccountJob { token, proxy: None })
            .collect());
    }

    let proxies = ProxyManager::load_from(&config.proxy.proxy_file)?;
    ProxyManager::ensure_coverage(&proxies, accounts.len())?;

    Ok(accounts
        .into_iter()
        .zip(proxies)
        .map(|(token, proxy)| AccountJob {
            token,
            proxy: Some(proxy),
        })
        .collect())
}

/// Loads the jobs and dispatches `job` for each according to the configured
/// mode. File problems are logged and abort the cycle.
pub async fn run_batch_with<F, Fut>(config: &NewtonConfig, job: F) -> BatchReport
where
    F: Fn(usize, AccountJob) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let jobs = match load_jobs(config) {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("❌ Batch aborted: {}", e);
            return BatchReport {
                accounts: 0,
                aborted: true,
            };
        }
    };

    let stats = WorkerRunner::dispatch(jobs, config.dispatch_mode(), job).await;
    BatchReport {
        accounts: stats.dispatched,
        aborted: false,
    }
}

/// One full batch cycle of `script` over every configured account.
pub async fn run_batch(config: Arc<NewtonConfig>, script: Script) -> BatchReport {
    info!("🚀 Starting {} batch", script);

    let pacer: Arc<dyn Pacer> = Arc::new(RandomPacer);
    let cfg = config.clone();
    run_batch_with(&config, move |_, job| {
        let cfg = cfg.clone();
        let pacer = pacer.clone();
        async move {
            run_account(&cfg, script, job, pacer).await;
        }
    })
    .await
}

/// [`run_batch`] that gives up as soon as `shutdown` fires. In-flight
/// accounts are dropped (concurrent workers are aborted with their pool).
/// Returns `None` when interrupted.
pub async fn run_batch_until(
    config: Arc<NewtonConfig>,
    script: Script,
    shutdown: &CancellationToken,
) -> Option<BatchReport> {
    tokio::select! {
        biased;
        _ = shutdown.cancelled() => {
            warn!("🛑 {} batch interrupted", script);
            None
        }
        report = run_batch(config, script) => Some(report),
    }
}

/// Builds the account's session and runs `script` on it.
///
/// Returns `None` when the session could not even be set up (bad token
/// characters, unusable proxy URL).
pub async fn run_account(
    config: &NewtonConfig,
    script: Script,
    job: AccountJob,
    pacer: Arc<dyn Pacer>,
) -> Option<TaskResult> {
    let label = job.token.short();
    let session = match AccountSession::new(config, job.token, job.proxy) {
        Ok(session) => session,
        Err(e) => {
            error!("❌ Account {} setup FAILED: {:#}", label, e);
            return None;
        }
    };

    debug!(
        "Account {} session ready (proxied: {})",
        label,
        session.is_proxied()
    );

    let task: Box<dyn Task<ScriptContext>> = match script {
        Script::DailyRoll => Box::new(DailyRollTask::new()),
        Script::SocialQuests => Box::new(SocialQuestTask::new()),
    };
    let ctx = ScriptContext::new(Box::new(session), pacer, config);

    match task.run(ctx).await {
        Ok(res) => {
            debug!("Account {} {}: {}", label, task.name(), res.message);
            Some(res)
        }
        Err(e) => {
            error!("❌ Account {} {} FAILED: {:#}", label, task.name(), e);
            None
        }
    }
}

/// Scheduled roll mode: one cycle now, then one every `interval_hours`,
/// until `shutdown` fires.
pub async fn run_daily_schedule(config: Arc<NewtonConfig>, shutdown: CancellationToken) -> u64 {
    let scheduler = IntervalScheduler::every_hours(config.execution.interval_hours);
    info!(
        "⏰ Daily roll scheduled every {} hours",
        scheduler.interval().as_secs() / 3600
    );

    scheduler
        .run(shutdown, || {
            let config = config.clone();
            async move {
                run_batch(config, Script::DailyRoll).await;
            }
        })
        .await
}
