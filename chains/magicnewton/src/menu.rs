use crate::batch::{run_batch_until, run_daily_schedule, Script};
use crate::config::NewtonConfig;
use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Select};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    SocialQuests,
    DailyRoll,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 3] = [
        MenuChoice::SocialQuests,
        MenuChoice::DailyRoll,
        MenuChoice::Exit,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MenuChoice::SocialQuests => "📝 Complete social quests",
            MenuChoice::DailyRoll => "🎲 Daily dice roll (scheduled)",
            MenuChoice::Exit => "🚪 Exit",
        }
    }
}

fn prompt() -> Result<MenuChoice> {
    let items: Vec<&str> = MenuChoice::ALL.iter().map(|c| c.label()).collect();
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Magic Newton - choose an action")
        .default(0)
        .items(&items)
        .interact()
        .context("Cannot show the menu (not a terminal?). Use --mode roll or --mode social")?;

    Ok(MenuChoice::ALL[selection])
}

/// Interactive loop. Social runs return to the menu; the daily roll never
/// returns until `shutdown` fires. `shutdown` also ends a social run early
/// and leaves the menu.
pub async fn run_menu(config: Arc<NewtonConfig>, shutdown: CancellationToken) -> Result<()> {
    loop {
        if shutdown.is_cancelled() {
            return Ok(());
        }
        match prompt()? {
            MenuChoice::SocialQuests => {
                let run = run_batch_until(config.clone(), Script::SocialQuests, &shutdown).await;
                if run.is_none() {
                    return Ok(());
                }
            }
            MenuChoice::DailyRoll => {
                run_daily_schedule(config.clone(), shutdown.clone()).await;
                return Ok(());
            }
            MenuChoice::Exit => {
                info!("👋 Bye!");
                return Ok(());
            }
        }
    }
}
