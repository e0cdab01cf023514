//! Connection state machine.

use std::fmt;

/// Lifecycle state of a connection handle.
///
/// `Disconnected` → `Connecting` → `Connected` or `Errored`. Only the
/// background connection task moves a handle between states.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    /// The attempt failed; `message` is the driver's description.
    Errored { message: String },
}

impl ConnectionState {
    /// Returns true once the attempt has either succeeded or failed.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Connected | Self::Errored { .. })
    }

    /// Returns the state name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Errored { .. } => "errored",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Errored { message } => write!(f, "errored ({message})"),
            other => f.write_str(other.as_str()),
        }
    }
}
