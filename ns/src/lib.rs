//! notifysched - transient notification display scheduler
//!
//! Takes notification requests from any number of producers and presents them
//! one at a time on a host-owned display surface that can only be polled for
//! completion.
//!
//! # Modules
//!
//! - [`request`] - notification request and color types
//! - [`scheduler`] - request queue and the two-state display machine
//! - [`surface`] - the display surface contract consumed from the host
//! - [`lifecycle`] - start/stop and session-boundary handling
//!
//! # Example
//!
//! ```ignore
//! use notifysched::{Lifecycle, SchedulerConfig};
//!
//! let mut lifecycle = Lifecycle::new(surface, SchedulerConfig::default());
//! let notifier = lifecycle.notifier();
//! lifecycle.start();
//!
//! notifier.enqueue("Level milestone", "Gained level 50 in Agility!", None);
//! // once per host tick:
//! lifecycle.on_tick();
//! ```

pub mod lifecycle;
pub mod request;
pub mod scheduler;
pub mod surface;

pub use lifecycle::{Lifecycle, SessionState};
pub use request::{NotificationRequest, Rgb};
pub use scheduler::{
    Notifier, RequestQueue, ResetReport, Scheduler, SchedulerConfig, SchedulerState, SchedulerStats, TickOutcome,
};
pub use surface::{DisplaySurface, SurfaceError};
