//! Scheduler configuration

use serde::{Deserialize, Serialize};

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Try to open immediately when a request is enqueued from the tick context
    #[serde(rename = "open-on-enqueue", default = "default_open_on_enqueue")]
    pub open_on_enqueue: bool,

    /// Open the next request on the same tick that closed the previous one
    #[serde(rename = "advance-on-close", default)]
    pub advance_on_close: bool,
}

fn default_open_on_enqueue() -> bool {
    true
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            open_on_enqueue: true,
            advance_on_close: false,
        }
    }
}
