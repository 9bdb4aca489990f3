//! Unified error type for the Basalt light controller.
//!
//! Every fallible path in the crate funnels into [`Error`], so the command
//! surface and the binary see one error type.  Only [`Error::InvalidState`]
//! and [`Error::UnknownCommand`] ever reach a caller: render and publish
//! failures are logged at the coordinator boundary and swallowed.

use core::fmt;

use crate::app::ports::{DisplayError, PublishError};

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A state change was requested with a control-state or unknown name.
    InvalidState(String),
    /// The pixel display failed to flush a frame.
    Render(DisplayError),
    /// The publisher could not deliver a state notification.
    Publish(PublishError),
    /// A console line did not parse as a command.
    UnknownCommand(String),
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidState(name) => write!(f, "invalid state: '{name}'"),
            Self::Render(e) => write!(f, "render: {e}"),
            Self::Publish(e) => write!(f, "publish: {e}"),
            Self::UnknownCommand(line) => write!(f, "unknown command: '{line}'"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<DisplayError> for Error {
    fn from(e: DisplayError) -> Self {
        Self::Render(e)
    }
}

impl From<PublishError> for Error {
    fn from(e: PublishError) -> Self {
        Self::Publish(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
