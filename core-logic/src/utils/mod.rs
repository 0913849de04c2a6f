//! # Utilities Module
//!
//! Internal utility modules for the core-logic crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

pub(crate) mod account_manager;
pub(crate) mod logger;
pub(crate) mod proxy_manager;
pub(crate) mod runner;
pub(crate) mod scheduler;

// Selective exports - only public utilities
pub use account_manager::{AccountManager, SessionToken};
pub use logger::{parse_level, setup_logger, FileFormatter, TerminalFormatter};
pub use proxy_manager::ProxyManager;
pub use runner::{DispatchStats, WorkerRunner};
pub use scheduler::{IntervalScheduler, ScheduleState};
