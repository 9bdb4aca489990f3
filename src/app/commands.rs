//! Inbound commands to the light coordinator.
//!
//! One command per console line.  Keywords are case-insensitive; the state
//! name after `set` is passed through untouched and validated by the
//! coordinator.
//!
//! | Line                    | Command                    |
//! |-------------------------|----------------------------|
//! | `motion` / `rising`     | `Motion(Rising)`           |
//! | `clear` / `falling`     | `Motion(Falling)`          |
//! | `set <State>`           | `SetState(name)`           |
//! | `state`                 | `Query`                    |
//! | `list`                  | `ListStates`               |
//! | `fault [reason...]`     | `Fault(reason)`            |
//! | `shutdown` / `quit`     | `Shutdown`                 |

use core::fmt;
use core::str::FromStr;

use crate::error::Error;
use crate::fsm::LightState;

use super::events::MotionEdge;

/// Commands that external callers can send into the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LightCommand {
    /// Simulated PIR edge.
    Motion(MotionEdge),

    /// Force a display state by name.
    SetState(String),

    /// Report the current state.
    Query,

    /// Report the user-settable state names.
    ListStates,

    /// Enter the error state.
    Fault(String),

    /// Play the shutdown sequence and go inert.
    Shutdown,
}

impl FromStr for LightCommand {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let unknown = || Error::UnknownCommand(line.trim().to_string());
        let mut words = line.split_whitespace();
        let keyword = words.next().ok_or_else(unknown)?.to_ascii_lowercase();

        let cmd = match keyword.as_str() {
            "motion" | "rising" => Self::Motion(MotionEdge::Rising),
            "clear" | "falling" => Self::Motion(MotionEdge::Falling),
            "set" => {
                let name = words.next().ok_or_else(unknown)?;
                Self::SetState(name.to_string())
            }
            "state" => Self::Query,
            "list" => Self::ListStates,
            "fault" => {
                let reason = words.by_ref().collect::<Vec<_>>().join(" ");
                let reason = if reason.is_empty() { "operator".to_string() } else { reason };
                return Ok(Self::Fault(reason));
            }
            "shutdown" | "quit" => Self::Shutdown,
            _ => return Err(unknown()),
        };

        // Trailing words are a typo, not a command.
        if words.next().is_some() {
            return Err(unknown());
        }
        Ok(cmd)
    }
}

/// What a command produced, for the caller to print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    Ack,
    State(LightState),
    States(Vec<&'static str>),
    Stopped,
}

impl fmt::Display for CommandReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ack => write!(f, "ok"),
            Self::State(s) => write!(f, "{s}"),
            Self::States(names) => write!(f, "{}", names.join(" ")),
            Self::Stopped => write!(f, "shut down"),
        }
    }
}
