//! Lifecycle controller
//!
//! Attaches the scheduler to the host tick and resets it on session
//! boundaries. The host delivers every tick to [`Lifecycle::on_tick`]; only a
//! started controller forwards it to the scheduler, and nothing new is opened
//! outside an active session.

use std::fmt;

use tracing::{debug, info};

use crate::request::NotificationRequest;
use crate::scheduler::{Notifier, ResetReport, Scheduler, SchedulerConfig, TickOutcome};
use crate::surface::DisplaySurface;

/// Host session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Starting,
    LoginScreen,
    WorldSelect,
    Hopping,
    ConnectionLost,
    Loading,
    LoggedIn,
}

impl SessionState {
    /// States in which notifications may be shown
    ///
    /// `Loading` happens while crossing map regions inside a live session, so
    /// it does not end the session.
    pub fn is_active(self) -> bool {
        matches!(self, SessionState::LoggedIn | SessionState::Loading)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Starting => write!(f, "starting"),
            Self::LoginScreen => write!(f, "login-screen"),
            Self::WorldSelect => write!(f, "world-select"),
            Self::Hopping => write!(f, "hopping"),
            Self::ConnectionLost => write!(f, "connection-lost"),
            Self::Loading => write!(f, "loading"),
            Self::LoggedIn => write!(f, "logged-in"),
        }
    }
}

/// Owns the scheduler and its attachment to the host
pub struct Lifecycle<S: DisplaySurface> {
    scheduler: Scheduler<S>,
    subscribed: bool,
    session: SessionState,
}

impl<S: DisplaySurface> Lifecycle<S> {
    pub fn new(surface: S, config: SchedulerConfig) -> Self {
        Self {
            scheduler: Scheduler::new(surface, config),
            subscribed: false,
            session: SessionState::Starting,
        }
    }

    /// Subscribe to host ticks; returns false if already subscribed
    pub fn start(&mut self) -> bool {
        if self.subscribed {
            debug!("Lifecycle::start: already subscribed");
            return false;
        }
        self.subscribed = true;
        info!("Notification scheduler started");
        true
    }

    /// Unsubscribe from host ticks and reset
    pub fn stop(&mut self) -> ResetReport {
        if self.subscribed {
            self.subscribed = false;
            info!("Notification scheduler stopped");
        } else {
            debug!("Lifecycle::stop: not subscribed");
        }
        self.scheduler.reset()
    }

    /// Host tick callback
    pub fn on_tick(&mut self) -> Option<TickOutcome> {
        if !self.subscribed {
            return None;
        }
        debug!(
            pending = self.scheduler.pending(),
            busy = self.scheduler.is_busy(),
            session = %self.session,
            "Lifecycle::on_tick"
        );
        if self.session.is_active() {
            Some(self.scheduler.tick())
        } else {
            Some(self.scheduler.tick_without_open())
        }
    }

    /// Session boundary hook; leaving an active session resets but stays armed
    pub fn on_session_state(&mut self, state: SessionState) -> Option<ResetReport> {
        debug!(from = %self.session, to = %state, "Lifecycle::on_session_state: called");
        self.session = state;
        if state.is_active() {
            return None;
        }
        Some(self.scheduler.reset())
    }

    /// Force a reset without touching the subscription
    pub fn reset(&mut self) -> ResetReport {
        self.scheduler.reset()
    }

    /// Enqueue from the tick context
    ///
    /// Outside a started controller with an active session this only queues:
    /// opening without ticks to poll it would leave the surface stuck.
    pub fn enqueue(&mut self, request: NotificationRequest) {
        if self.subscribed && self.session.is_active() {
            self.scheduler.enqueue(request);
        } else {
            self.scheduler.notifier().submit(request);
        }
    }

    pub fn notifier(&self) -> Notifier {
        self.scheduler.notifier()
    }

    pub fn is_started(&self) -> bool {
        self.subscribed
    }

    pub fn session(&self) -> SessionState {
        self.session
    }

    pub fn scheduler(&self) -> &Scheduler<S> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler<S> {
        &mut self.scheduler
    }
}
