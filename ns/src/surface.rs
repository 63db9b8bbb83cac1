//! Display surface contract
//!
//! The surface is owned by the host. The scheduler only asks it to open a
//! request, polls whether the presentation is still visible, and closes it.

use thiserror::Error;

use crate::request::NotificationRequest;

/// Errors reported by a display surface
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// A presentation is already open on the surface
    #[error("Display surface already open")]
    AlreadyOpen,

    /// The handle no longer refers to a live presentation
    #[error("Display handle is gone")]
    HandleGone,

    /// The host surface is not available right now
    #[error("Display surface unavailable: {0}")]
    Unavailable(String),
}

impl SurfaceError {
    /// Violations of the one-open-at-a-time rule
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, SurfaceError::AlreadyOpen)
    }

    /// Errors that mean the presentation is no longer on screen
    pub fn means_closed(&self) -> bool {
        matches!(self, SurfaceError::HandleGone)
    }
}

/// Host-owned presentation mechanism for one notification at a time
pub trait DisplaySurface {
    /// Token for an open presentation, consumed by [`DisplaySurface::close`]
    type Handle;

    /// Begin presenting a request
    fn open(&mut self, request: &NotificationRequest) -> Result<Self::Handle, SurfaceError>;

    /// Point-in-time poll; must have no side effects
    fn is_still_showing(&self, handle: &Self::Handle) -> Result<bool, SurfaceError>;

    /// Tear the presentation down; safe to call after the host auto-closed
    fn close(&mut self, handle: Self::Handle) -> Result<(), SurfaceError>;
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for Box<S> {
    type Handle = S::Handle;

    fn open(&mut self, request: &NotificationRequest) -> Result<Self::Handle, SurfaceError> {
        (**self).open(request)
    }

    fn is_still_showing(&self, handle: &Self::Handle) -> Result<bool, SurfaceError> {
        (**self).is_still_showing(handle)
    }

    fn close(&mut self, handle: Self::Handle) -> Result<(), SurfaceError> {
        (**self).close(handle)
    }
}

/// Scriptable surface that records every call, for tests in this and
/// downstream crates (`test-util` feature)
#[cfg(any(test, feature = "test-util"))]
pub mod mock {
    use super::*;
    use tracing::debug;

    /// A recorded surface call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        /// `open(title, body)`
        Open(String, String),
        /// `close(handle)`
        Close(u64),
    }

    /// Surface whose poll result is set by the test
    #[derive(Debug)]
    pub struct ScriptedSurface {
        calls: Vec<Call>,
        next_id: u64,
        open: Option<u64>,
        showing: bool,
        fail_polls: bool,
        occupied: bool,
        refuse_next: bool,
    }

    impl ScriptedSurface {
        pub fn new() -> Self {
            Self {
                calls: Vec::new(),
                next_id: 0,
                open: None,
                showing: true,
                fail_polls: false,
                occupied: false,
                refuse_next: false,
            }
        }

        /// Value returned by the next polls
        pub fn set_showing(&mut self, showing: bool) {
            self.showing = showing;
        }

        /// Host tears the presentation down behind the scheduler's back
        pub fn vanish(&mut self) {
            debug!(open = ?self.open, "ScriptedSurface::vanish: called");
            self.open = None;
        }

        /// Make polls fail with [`SurfaceError::Unavailable`]
        pub fn fail_polls(&mut self, fail: bool) {
            self.fail_polls = fail;
        }

        /// Pretend something else holds the surface
        pub fn occupy(&mut self) {
            self.occupied = true;
        }

        /// Refuse the next open with [`SurfaceError::Unavailable`]
        pub fn refuse_next_open(&mut self) {
            self.refuse_next = true;
        }

        pub fn calls(&self) -> &[Call] {
            &self.calls
        }

        pub fn opened_titles(&self) -> Vec<String> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Open(title, _) => Some(title.clone()),
                    Call::Close(_) => None,
                })
                .collect()
        }

        pub fn open_count(&self) -> usize {
            self.calls.iter().filter(|c| matches!(c, Call::Open(..))).count()
        }

        pub fn close_count(&self) -> usize {
            self.calls.iter().filter(|c| matches!(c, Call::Close(_))).count()
        }

        pub fn is_open(&self) -> bool {
            self.open.is_some()
        }
    }

    impl Default for ScriptedSurface {
        fn default() -> Self {
            Self::new()
        }
    }

    impl DisplaySurface for ScriptedSurface {
        type Handle = u64;

        fn open(&mut self, request: &NotificationRequest) -> Result<u64, SurfaceError> {
            if self.occupied || self.open.is_some() {
                return Err(SurfaceError::AlreadyOpen);
            }
            if self.refuse_next {
                self.refuse_next = false;
                return Err(SurfaceError::Unavailable("refused".to_string()));
            }
            let id = self.next_id;
            self.next_id += 1;
            self.open = Some(id);
            self.calls
                .push(Call::Open(request.title().to_string(), request.body().to_string()));
            Ok(id)
        }

        fn is_still_showing(&self, handle: &u64) -> Result<bool, SurfaceError> {
            if self.fail_polls {
                return Err(SurfaceError::Unavailable("poll failed".to_string()));
            }
            if self.open != Some(*handle) {
                return Err(SurfaceError::HandleGone);
            }
            Ok(self.showing)
        }

        fn close(&mut self, handle: u64) -> Result<(), SurfaceError> {
            self.calls.push(Call::Close(handle));
            if self.open == Some(handle) {
                self.open = None;
            }
            Ok(())
        }
    }
}
