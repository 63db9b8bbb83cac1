//! Scheduler for notification display
//!
//! Hands queued notifications to the display surface one at a time and
//! detects completion by polling once per host tick.

mod config;
mod core;
mod queue;

pub use config::SchedulerConfig;
pub use self::core::{ResetReport, Scheduler, SchedulerState, SchedulerStats, TickOutcome};
pub use queue::{Notifier, RequestQueue};
