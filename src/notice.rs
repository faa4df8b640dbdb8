//! Transient, non-fatal notices surfaced to the user

use serde::Serialize;
use std::fmt;
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 64;

/// Category of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Encoder rejected the payload; the previous image stays on display
    EncodeFailure,
    /// Clipboard write denied or unsupported
    ClipboardFailure,
    /// Share surface rejected the request or the user cancelled it
    ShareFailure,
}

/// A recoverable problem reported to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// What went wrong
    pub kind: NoticeKind,
    /// Human-readable detail
    pub message: String,
}

impl Notice {
    /// Build a notice of the given kind.
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.kind {
            NoticeKind::EncodeFailure => "Could not generate QR code",
            NoticeKind::ClipboardFailure => "Could not copy QR code",
            NoticeKind::ShareFailure => "Could not share QR code",
        };
        write!(f, "{prefix}: {}", self.message)
    }
}

/// Fan-out of notices to any number of listeners. Publishing never fails.
#[derive(Debug, Clone)]
pub struct Notices {
    sender: broadcast::Sender<Notice>,
}

impl Notices {
    /// Create an empty notice channel.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Log and broadcast a notice.
    pub fn publish(&self, notice: Notice) {
        tracing::warn!(kind = ?notice.kind, "{}", notice.message);
        // No listeners is fine; the notice is still logged.
        let _ = self.sender.send(notice);
    }

    /// Subscribe to notices published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notice> {
        self.sender.subscribe()
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new()
    }
}
