use anyhow::Result;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskResult {
    pub success: bool,
    pub message: String,
    /// Authoritative credit total read back after the task, if it got that far.
    pub total_credits: Option<i64>,
}

impl TaskResult {
    pub fn completed(message: impl Into<String>, total_credits: i64) -> Self {
        Self {
            success: true,
            message: message.into(),
            total_credits: Some(total_credits),
        }
    }

    pub fn partial(message: impl Into<String>, total_credits: i64) -> Self {
        Self {
            success: false,
            message: message.into(),
            total_credits: Some(total_credits),
        }
    }
}

#[async_trait]
pub trait Task<Ctx>: Send + Sync {
    /// Returns the name of the task
    fn name(&self) -> &str;

    /// Executes the task
    async fn run(&self, ctx: Ctx) -> Result<TaskResult>;
}
