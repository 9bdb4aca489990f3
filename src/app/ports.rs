//! Port traits: the hexagonal boundary between the light coordinator and
//! the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LightCoordinator (domain)
//! ```
//!
//! Adapters (pixel strip, publisher, PIR sensor) implement
//! these traits.  The [`LightCoordinator`](super::service::LightCoordinator)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::app::events::MotionEdge;
use crate::fsm::patterns::Rgbw;

// ───────────────────────────────────────────────────────────────
// Pixel display port (driven adapter: domain → LED hardware)
// ───────────────────────────────────────────────────────────────

/// Buffered addressable-pixel display.
///
/// `set_pixel` and `fill` only touch the buffer; nothing reaches the LEDs
/// until [`show`](PixelDisplay::show).  The coordinator calls `show` once
/// per frame, never per pixel.
pub trait PixelDisplay {
    /// Set one pixel in the buffer.  Out-of-range indices are ignored.
    fn set_pixel(&mut self, index: u16, color: Rgbw);

    /// Set every pixel in the buffer.
    fn fill(&mut self, color: Rgbw);

    /// Flush the buffer to hardware.  The only call with observable latency.
    fn show(&mut self) -> Result<(), DisplayError>;
}

// ───────────────────────────────────────────────────────────────
// Publisher port (driven adapter: domain → pub/sub transport)
// ───────────────────────────────────────────────────────────────

/// Best-effort state notification sink.
///
/// Implementations must not block: queue, drop, or fail fast.  The
/// coordinator logs failures and carries on.
pub trait Publisher {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), PublishError>;
}

// ───────────────────────────────────────────────────────────────
// Edge source port (driving adapter: PIR interrupt → domain)
// ───────────────────────────────────────────────────────────────

/// Handler invoked for every motion edge.
pub type EdgeHandler = Box<dyn FnMut(MotionEdge) + Send + 'static>;

/// A source of motion edges.  Debouncing and delivery context are the
/// source's business; it registers exactly one handler.
pub trait EdgeSource {
    /// Register the edge handler, replacing any previous one.
    fn subscribe(&mut self, handler: EdgeHandler);
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`PixelDisplay::show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError {
    /// The LED writer rejected the frame.
    WriteFailed,
    /// The flush did not complete in time.
    Timeout,
}

/// Errors from [`Publisher::publish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishError {
    /// The transport has no broker connection.
    NotConnected,
    /// The outbound queue is full; the message was dropped.
    QueueFull,
    /// Topic or payload was rejected by the transport.
    Rejected,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "LED write failed"),
            Self::Timeout => write!(f, "LED flush timed out"),
        }
    }
}

impl core::fmt::Display for PublishError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::QueueFull => write!(f, "queue full"),
            Self::Rejected => write!(f, "rejected by transport"),
        }
    }
}
