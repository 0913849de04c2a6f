//! # Core Logic - Shared Utilities for Portal Bots
//!
//! This crate provides the pieces every bot in the workspace shares: flat-file
//! account and proxy loading, logger setup, a bounded worker runner and an
//! interval scheduler.
//!
//! ## Modules
//!
//! - [`config`] - Proxy entries and dispatch mode
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Core trait definitions
//! - [`utils`] - Utility modules (accounts, proxies, logger, runner, scheduler)

pub mod config;
pub mod error;
pub mod traits;
pub(crate) mod utils;

pub use config::{DispatchMode, ProxyConfig};
pub use error::{ConfigError, NetworkError};
pub use traits::{Task, TaskResult};

// Utils are pub(crate) - only export specific public utilities
pub use utils::{
    parse_level, setup_logger, AccountManager, DispatchStats, FileFormatter, IntervalScheduler,
    ProxyManager, ScheduleState, SessionToken, TerminalFormatter, WorkerRunner,
};
