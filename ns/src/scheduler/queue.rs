//! Request queue for the scheduler
//!
//! Unbounded multi-producer, single-consumer FIFO. Producers hold a
//! [`Notifier`] and never block; the scheduler is the only consumer.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tracing::{debug, warn};

use crate::request::{NotificationRequest, Rgb};

/// Cloneable producer handle for submitting notifications
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: UnboundedSender<NotificationRequest>,
}

impl Notifier {
    /// Submit a notification; fire-and-forget
    pub fn enqueue(&self, title: impl Into<String>, body: impl Into<String>, color: Option<Rgb>) {
        let request = match color {
            Some(color) => NotificationRequest::with_color(title, body, color),
            None => NotificationRequest::new(title, body),
        };
        self.submit(request);
    }

    /// Submit an already built request
    pub fn submit(&self, request: NotificationRequest) {
        debug!(title = %request.title(), "Notifier::submit: called");
        // Only fails once the scheduler (and its receiver) is gone
        if self.tx.send(request).is_err() {
            warn!("Notifier::submit: scheduler dropped, discarding notification");
        }
    }

    /// True once the owning scheduler has been dropped
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// FIFO of pending notification requests
#[derive(Debug)]
pub struct RequestQueue {
    tx: UnboundedSender<NotificationRequest>,
    rx: UnboundedReceiver<NotificationRequest>,
}

impl RequestQueue {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    /// Create a producer handle feeding this queue
    pub fn notifier(&self) -> Notifier {
        Notifier { tx: self.tx.clone() }
    }

    /// Append to the tail
    pub fn enqueue(&self, request: NotificationRequest) {
        // The queue holds its own sender and receiver, so this cannot fail
        let _ = self.tx.send(request);
    }

    /// Remove and return the head, or `None` when nothing is pending
    pub fn dequeue(&mut self) -> Option<NotificationRequest> {
        match self.rx.try_recv() {
            Ok(request) => Some(request),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Drop every request pending at the time of the call, returning how many
    /// were discarded
    ///
    /// Requests that producers add while this runs are kept.
    pub fn clear(&mut self) -> usize {
        let pending = self.rx.len();
        let mut dropped = 0;
        while dropped < pending && self.rx.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!(dropped, "RequestQueue::clear: discarded pending requests");
        }
        dropped
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new()
    }
}
