//! Session lifecycle notifications.
//!
//! The client never navigates anywhere itself. When a session starts, is
//! renewed, or can no longer be recovered it publishes a `SessionEvent`;
//! front ends subscribe and route to their login screen on `Terminated`.

use tokio::sync::broadcast;
use tracing::debug;

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// A 401 arrived and no refresh token was stored.
    MissingRefreshToken,
    /// The refresh endpoint failed or rejected the refresh token.
    RefreshFailed,
    /// The user logged out.
    LoggedOut,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminationReason::MissingRefreshToken => write!(f, "no refresh token available"),
            TerminationReason::RefreshFailed => write!(f, "session could not be renewed"),
            TerminationReason::LoggedOut => write!(f, "logged out"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Login stored a fresh token pair.
    Established,
    /// The refresh endpoint issued a new token pair.
    Renewed,
    /// Credentials were cleared; the user must log in again.
    Terminated(TerminationReason),
}

impl SessionEvent {
    pub fn is_terminated(&self) -> bool {
        matches!(self, SessionEvent::Terminated(_))
    }
}

/// Fan-out of session events to any number of subscribers.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn emit(&self, event: SessionEvent) {
        let delivered = self.sender.send(event).unwrap_or(0);
        debug!(?event, subscribers = delivered, "Session event published");
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new()
    }
}
