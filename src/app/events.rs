//! Inbound motion events.
//!
//! Produced by an [`EdgeSource`](super::ports::EdgeSource) on its own
//! delivery context and pushed into
//! [`LightCoordinator::on_motion_edge`](super::service::LightCoordinator::on_motion_edge).

use core::fmt;

/// Level change on the PIR output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionEdge {
    /// Motion started (pin went high).
    Rising,
    /// Motion stopped (pin went low).
    Falling,
}

impl MotionEdge {
    /// Edge implied by a freshly sampled pin level.
    pub fn from_level(high: bool) -> Self {
        if high { Self::Rising } else { Self::Falling }
    }
}

impl fmt::Display for MotionEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rising => write!(f, "rising"),
            Self::Falling => write!(f, "falling"),
        }
    }
}
