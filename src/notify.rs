//! Transient user notifications
//!
//! Backend failures surface to the hosting UI as short-lived banner notices.
//! A notice stays active for a fixed window (5 seconds by default) and then
//! dismisses itself; hosts either poll [`NoticeBoard::active`] or receive
//! pushed copies through [`NoticeBoard::subscribe`].

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::debug;

/// Default auto-dismiss window for a notice
pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_secs(5);

/// A single transient notification
#[derive(Debug, Clone)]
pub struct Notice {
    pub message: String,
    raised_at: Instant,
}

impl Notice {
    fn new(message: String) -> Self {
        Self {
            message,
            raised_at: Instant::now(),
        }
    }

    /// Whether the notice has outlived the given dismiss window
    pub fn is_expired(&self, dismiss_after: Duration) -> bool {
        self.raised_at.elapsed() >= dismiss_after
    }
}

/// Holds raised notices, prunes expired ones on read, and fans each notice
/// out to subscribers.
pub struct NoticeBoard {
    notices: Vec<Notice>,
    subscribers: Vec<mpsc::UnboundedSender<Notice>>,
    dismiss_after: Duration,
}

impl NoticeBoard {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            notices: Vec::new(),
            subscribers: Vec::new(),
            dismiss_after,
        }
    }

    /// Raise a notice and push a copy to every live subscriber
    pub fn push(&mut self, message: impl Into<String>) {
        let notice = Notice::new(message.into());
        debug!("Raised notice: {}", notice.message);

        // Drop subscribers whose receiving end has gone away
        self.subscribers
            .retain(|sender| sender.send(notice.clone()).is_ok());
        self.notices.push(notice);
    }

    /// Currently active (not yet dismissed) notices, oldest first
    pub fn active(&mut self) -> Vec<Notice> {
        let dismiss_after = self.dismiss_after;
        self.notices.retain(|n| !n.is_expired(dismiss_after));
        self.notices.clone()
    }

    /// Receive a copy of every notice raised from now on
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<Notice> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.push(sender);
        receiver
    }
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_AFTER)
    }
}
