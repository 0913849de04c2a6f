//! Tasks Module - the fixed per-account scripts
//!
//! Two scripts run against a single account:
//!
//! - [`DailyRollTask`]: up to five ROLLs with a random pause between them,
//!   one BANK at the end (plus an extra BANK if a roll fails), then a read of
//!   the authoritative credit total.
//! - [`SocialQuestTask`]: submits each social quest once, pausing 1-3 s after
//!   every submission, then reads the total.
//!
//! Both implement [`core_logic::Task`] over a [`ScriptContext`], which owns
//! the account's [`QuestPortal`] and borrows a shared [`Pacer`]. Scripts never
//! return `Err`; failures are logged and reflected in [`TaskResult::success`].

use crate::config::NewtonConfig;
use crate::session::QuestPortal;
use async_trait::async_trait;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

pub mod daily_roll;
pub mod social_quests;

pub use core_logic::{Task, TaskResult};
pub use daily_roll::DailyRollTask;
pub use social_quests::SocialQuestTask;

/// Inclusive bounds, in seconds, of a randomized pause.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayRange {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DelayRange {
    pub const fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }

    /// Uniform sample in `[min, max]`; `min` when the range is empty.
    pub fn sample(&self) -> Duration {
        let min = self.min_secs.max(0.0);
        let secs = if self.max_secs > min {
            rand::thread_rng().gen_range(min..=self.max_secs)
        } else {
            min
        };
        Duration::from_secs_f64(secs)
    }
}

/// Pause between social quest submissions.
pub const SOCIAL_QUEST_DELAY: DelayRange = DelayRange::new(1.0, 3.0);

#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, range: DelayRange);
}

/// Sleeps for a uniformly random duration inside the range.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPacer;

#[async_trait]
impl Pacer for RandomPacer {
    async fn pause(&self, range: DelayRange) {
        tokio::time::sleep(range.sample()).await;
    }
}

/// Everything a script needs for one account.
pub struct ScriptContext {
    pub portal: Box<dyn QuestPortal>,
    pub pacer: Arc<dyn Pacer>,
    pub roll_delay: DelayRange,
    pub interval_hours: u64,
}

impl ScriptContext {
    pub fn new(portal: Box<dyn QuestPortal>, pacer: Arc<dyn Pacer>, config: &NewtonConfig) -> Self {
        Self {
            portal,
            pacer,
            roll_delay: config.roll_delay(),
            interval_hours: config.execution.interval_hours,
        }
    }
}
