//! Scheduler implementation

use tracing::{debug, error, info, warn};

use crate::request::NotificationRequest;
use crate::surface::DisplaySurface;

use super::config::SchedulerConfig;
use super::queue::{Notifier, RequestQueue};

/// Observable state of the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Nothing open; the next tick may open a request
    Idle,

    /// One request open, waiting for the host to collapse it
    Showing,
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Idle with nothing pending
    Idle,

    /// Dequeued and opened the next request
    Opened,

    /// The open request is still on screen
    Showing,

    /// The open request finished and was closed
    Closed,

    /// Closed the finished request and opened the next one on the same tick
    ClosedAndOpened,

    /// The surface refused the request; it was dropped
    Skipped,

    /// The surface reported an invariant violation and the scheduler reset itself
    Recovered,
}

/// Result of a reset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResetReport {
    /// An in-flight presentation was closed without waiting for the host
    pub abandoned: bool,

    /// Pending requests that were discarded
    pub discarded: usize,
}

/// Statistics for the scheduler
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SchedulerStats {
    pub total_opened: u64,
    pub total_closed: u64,
    pub total_abandoned: u64,
    pub total_dropped: u64,
    pub total_resets: u64,
    pub peak_queue_depth: usize,
}

/// The presentation currently owned by the scheduler
struct Showing<H> {
    handle: H,
    title: String,
    polls: u32,
}

/// The Scheduler hands queued notifications to the display surface one at a
/// time and detects completion by polling once per tick.
///
/// Owning the handle in `current` is the busy flag: a handle is held exactly
/// while a notification is open.
pub struct Scheduler<S: DisplaySurface> {
    config: SchedulerConfig,
    queue: RequestQueue,
    surface: S,
    current: Option<Showing<S::Handle>>,
    stats: SchedulerStats,
}

impl<S: DisplaySurface> Scheduler<S> {
    /// Create a new scheduler presenting on `surface`
    pub fn new(surface: S, config: SchedulerConfig) -> Self {
        debug!(?config, "Scheduler::new: called");
        Self {
            config,
            queue: RequestQueue::new(),
            surface,
            current: None,
            stats: SchedulerStats::default(),
        }
    }

    /// Producer handle that can be moved to other tasks or threads
    pub fn notifier(&self) -> Notifier {
        self.queue.notifier()
    }

    /// Enqueue from the tick context
    ///
    /// With `open_on_enqueue` set, an idle scheduler opens the request right
    /// away instead of waiting for the next tick. This never polls or closes.
    pub fn enqueue(&mut self, request: NotificationRequest) {
        debug!(title = %request.title(), "Scheduler::enqueue: called");
        self.queue.enqueue(request);
        self.note_queue_depth();

        if self.config.open_on_enqueue && self.current.is_none() {
            debug!("Scheduler::enqueue: idle, opening immediately");
            self.open_next();
        }
    }

    /// Advance the state machine by one host tick
    pub fn tick(&mut self) -> TickOutcome {
        self.step(true)
    }

    /// Tick that never opens a request
    ///
    /// An owned presentation is still polled and closed; pending requests
    /// stay queued.
    pub fn tick_without_open(&mut self) -> TickOutcome {
        self.step(false)
    }

    fn step(&mut self, may_open: bool) -> TickOutcome {
        self.note_queue_depth();

        let Some(mut showing) = self.current.take() else {
            if !may_open {
                return TickOutcome::Idle;
            }
            return self.open_next();
        };

        showing.polls += 1;
        match self.surface.is_still_showing(&showing.handle) {
            Ok(true) => {
                self.current = Some(showing);
                TickOutcome::Showing
            }
            Ok(false) => {
                debug!(title = %showing.title, polls = showing.polls, "Scheduler::tick: presentation collapsed");
                self.close(showing);
                self.after_close(may_open)
            }
            Err(e) if e.means_closed() => {
                warn!(title = %showing.title, error = %e, "Display handle vanished, treating as closed");
                self.stats.total_abandoned += 1;
                self.after_close(may_open)
            }
            Err(e) => {
                warn!(title = %showing.title, error = %e, "Poll failed, closing presentation");
                self.close(showing);
                self.after_close(may_open)
            }
        }
    }

    /// Force the scheduler back to idle and discard everything pending
    pub fn reset(&mut self) -> ResetReport {
        debug!("Scheduler::reset: called");
        let mut report = ResetReport::default();

        if let Some(showing) = self.current.take() {
            info!(title = %showing.title, "Abandoning notification on reset");
            if let Err(e) = self.surface.close(showing.handle) {
                warn!(error = %e, "Best-effort close failed during reset");
            }
            self.stats.total_abandoned += 1;
            report.abandoned = true;
        }

        report.discarded = self.queue.clear();
        self.stats.total_resets += 1;

        if report.abandoned || report.discarded > 0 {
            info!(abandoned = report.abandoned, discarded = report.discarded, "Scheduler reset");
        }
        report
    }

    pub fn state(&self) -> SchedulerState {
        if self.current.is_some() {
            SchedulerState::Showing
        } else {
            SchedulerState::Idle
        }
    }

    pub fn is_busy(&self) -> bool {
        self.current.is_some()
    }

    /// Number of requests waiting behind the current one
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn stats(&self) -> &SchedulerStats {
        &self.stats
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    fn open_next(&mut self) -> TickOutcome {
        let Some(request) = self.queue.dequeue() else {
            return TickOutcome::Idle;
        };

        match self.surface.open(&request) {
            Ok(handle) => {
                debug!(title = %request.title(), pending = self.queue.len(), "Scheduler::open_next: opened");
                self.current = Some(Showing {
                    handle,
                    title: request.title().to_string(),
                    polls: 0,
                });
                self.stats.total_opened += 1;
                TickOutcome::Opened
            }
            Err(e) if e.is_invariant_violation() => {
                error!(title = %request.title(), error = %e, "Surface already open while idle, resetting");
                self.reset();
                TickOutcome::Recovered
            }
            Err(e) => {
                warn!(title = %request.title(), error = %e, "Surface refused notification, dropping it");
                self.stats.total_dropped += 1;
                TickOutcome::Skipped
            }
        }
    }

    fn close(&mut self, showing: Showing<S::Handle>) {
        if let Err(e) = self.surface.close(showing.handle) {
            warn!(title = %showing.title, error = %e, "Close failed, releasing handle anyway");
        }
        self.stats.total_closed += 1;
    }

    fn after_close(&mut self, may_open: bool) -> TickOutcome {
        if !may_open || !self.config.advance_on_close {
            return TickOutcome::Closed;
        }
        match self.open_next() {
            TickOutcome::Opened => TickOutcome::ClosedAndOpened,
            TickOutcome::Idle => TickOutcome::Closed,
            other => other,
        }
    }

    fn note_queue_depth(&mut self) {
        self.stats.peak_queue_depth = self.stats.peak_queue_depth.max(self.queue.len());
    }
}
