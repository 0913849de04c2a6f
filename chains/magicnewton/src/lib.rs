//! Magic Newton portal bot.
//!
//! Runs the daily dice quest and the one-shot social quests for every account
//! in a flat file, optionally through per-account proxies.
//!
//! # Architecture
//!
//! - [`client::PortalClient`]: reqwest wrapper with the portal's fixed headers
//! - [`session::AccountSession`]: the three portal operations for one account
//! - [`tasks`]: the daily roll and social quest scripts
//! - [`batch`]: loads accounts/proxies and fans scripts out over the worker runner
//! - [`menu`]: interactive entry point
//!
//! Shared infrastructure (logger, loaders, runner, scheduler) lives in
//! `core-logic`.

pub mod batch;
pub mod client;
pub mod config;
pub mod menu;
pub mod quests;
pub mod session;
pub mod tasks;

pub use batch::{run_batch, run_batch_until, run_daily_schedule, BatchReport, Script};
pub use config::NewtonConfig;
pub use session::{AccountSession, QuestPortal, QuestSubmission, RollOutcome};
