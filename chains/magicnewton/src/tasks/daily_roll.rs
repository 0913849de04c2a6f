//! Daily Roll Task
//!
//! Rolls the dice quest up to [`MAX_ROUNDS`] times and banks the result.
//! A failed roll banks immediately and ends the loop; the closing BANK still
//! runs afterwards, so an early exit banks twice.

use crate::tasks::{ScriptContext, Task, TaskResult};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta};
use tracing::{error, info, warn};

pub const MAX_ROUNDS: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct DailyRollTask;

impl DailyRollTask {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Task<ScriptContext> for DailyRollTask {
    fn name(&self) -> &str {
        "daily_roll"
    }

    async fn run(&self, mut ctx: ScriptContext) -> Result<TaskResult> {
        ctx.portal.resolve_identity().await;
        let wallet = ctx.portal.wallet_label();
        info!("🎮 Account {} starting daily roll", wallet);

        let mut completed = 0;
        for round in 1..=MAX_ROUNDS {
            info!("🎲 Account {} rolling, round {}", wallet, round);

            let Some(outcome) = ctx.portal.roll().await else {
                error!(
                    "❌ Account {} roll round {} FAILED, ending early",
                    wallet, round
                );
                if !ctx.portal.bank().await {
                    warn!("💰 Account {} early bank FAILED", wallet);
                }
                break;
            };

            completed += 1;
            info!(
                "🎯 Account {} round {} dice points: {} | credits earned: {}",
                wallet,
                round,
                outcome.faces_display(),
                outcome.credits
            );

            if round < MAX_ROUNDS {
                ctx.pacer.pause(ctx.roll_delay).await;
            }
        }

        if ctx.portal.bank().await {
            info!("💰 Account {} bank SUCCESS", wallet);
        } else {
            warn!("💰 Account {} bank FAILED", wallet);
        }

        let total = ctx.portal.fetch_total_credits().await;
        info!("✨ Account {} finished! Total credits: {}", wallet, total);
        match next_run_after(Local::now(), ctx.interval_hours) {
            Some(at) => info!(
                "⏰ Account {} next run at: {}",
                wallet,
                at.format("%Y-%m-%d %H:%M:%S")
            ),
            None => warn!("⏰ Account {} next run time unknown", wallet),
        }

        let message = format!("{}/{} rolls, total credits {}", completed, MAX_ROUNDS, total);
        Ok(if completed == MAX_ROUNDS {
            TaskResult::completed(message, total)
        } else {
            TaskResult::partial(message, total)
        })
    }
}

/// `now + hours`, or `None` when that falls outside chrono's range.
pub fn next_run_after(now: DateTime<Local>, hours: u64) -> Option<DateTime<Local>> {
    let hours = i64::try_from(hours).ok()?;
    now.checked_add_signed(TimeDelta::try_hours(hours)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_run_after_adds_hours() {
        let now = Local::now();
        assert_eq!(next_run_after(now, 24), Some(now + TimeDelta::hours(24)));
    }

    #[test]
    fn test_next_run_after_out_of_range() {
        let now = Local::now();
        assert_eq!(next_run_after(now, 3_000_000_000), None);
        assert_eq!(next_run_after(now, u64::MAX), None);
    }
}
