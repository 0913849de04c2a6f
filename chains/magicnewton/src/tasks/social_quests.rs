//! Social Quest Task
//!
//! Submits every entry of [`SOCIAL_QUESTS`] once, in catalogue order, whatever
//! the individual outcome.

use crate::quests::SOCIAL_QUESTS;
use crate::session::QuestSubmission;
use crate::tasks::{ScriptContext, Task, TaskResult, SOCIAL_QUEST_DELAY};
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, Default)]
pub struct SocialQuestTask;

impl SocialQuestTask {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Task<ScriptContext> for SocialQuestTask {
    fn name(&self) -> &str {
        "social_quests"
    }

    async fn run(&self, mut ctx: ScriptContext) -> Result<TaskResult> {
        ctx.portal.resolve_identity().await;
        let wallet = ctx.portal.wallet_label();
        info!("🎮 Account {} starting social quests", wallet);

        let mut accepted = 0;
        for quest in SOCIAL_QUESTS.iter() {
            info!("📝 Account {} working on: {}", wallet, quest.label);
            debug!("Submitting {} quest {}", quest.key, quest.quest_id);

            match ctx
                .portal
                .submit_quest_action(quest.quest_id, quest.metadata_json())
                .await
            {
                submission @ QuestSubmission::Accepted(_) => {
                    accepted += 1;
                    info!(
                        "✅ Account {} {} SUCCESS, credits earned: {}",
                        wallet,
                        quest.label,
                        submission.credits()
                    );
                }
                QuestSubmission::Rejected(reason) => {
                    error!("❌ Account {} {} FAILED: {}", wallet, quest.label, reason);
                }
            }

            ctx.pacer.pause(SOCIAL_QUEST_DELAY).await;
        }

        let total = ctx.portal.fetch_total_credits().await;
        info!(
            "✨ Account {} social quests done! Total credits: {}",
            wallet, total
        );

        let message = format!(
            "{}/{} social quests accepted, total credits {}",
            accepted,
            SOCIAL_QUESTS.len(),
            total
        );
        Ok(if accepted == SOCIAL_QUESTS.len() {
            TaskResult::completed(message, total)
        } else {
            TaskResult::partial(message, total)
        })
    }
}
