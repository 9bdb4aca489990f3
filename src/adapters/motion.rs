//! PIR motion sensor adapter.
//!
//! The PIR output is wired to a GPIO configured for any-edge interrupts.
//! The interrupt only tells us *something* changed, so
//! [`PirMotionSensor::on_interrupt`] samples the pin and reports the level
//! as an edge: high is motion, low is quiet.  Every interrupt is reported;
//! a repeated `Falling` just restarts the coordinator's countdown.

use core::convert::Infallible;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use embedded_hal::digital::{ErrorType, InputPin};
use log::{debug, warn};

use crate::app::events::MotionEdge;
use crate::app::ports::{EdgeHandler, EdgeSource};

pub struct PirMotionSensor<P> {
    pin: P,
    handler: Option<EdgeHandler>,
}

impl<P: InputPin> PirMotionSensor<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, handler: None }
    }

    /// Sample the pin and dispatch the implied edge.  Returns the edge, or
    /// `None` if the pin could not be read.
    pub fn on_interrupt(&mut self) -> Option<MotionEdge> {
        let high = match self.pin.is_high() {
            Ok(level) => level,
            Err(e) => {
                warn!(target: "motion", "PIR read failed: {:?}", e);
                return None;
            }
        };
        let edge = MotionEdge::from_level(high);
        match self.handler.as_mut() {
            Some(handler) => {
                debug!(target: "motion", "{} edge", edge);
                handler(edge);
            }
            None => debug!(target: "motion", "{} edge with no subscriber", edge),
        }
        Some(edge)
    }
}

impl<P: InputPin> EdgeSource for PirMotionSensor<P> {
    fn subscribe(&mut self, handler: EdgeHandler) {
        self.handler = Some(handler);
    }
}

// ───────────────────────────────────────────────────────────────
// Simulated pin
// ───────────────────────────────────────────────────────────────

/// Input pin whose level is set from software.  Stands in for the PIR
/// GPIO on a host; clones share one level.
#[derive(Debug, Clone, Default)]
pub struct SimulatedPin {
    level: Arc<AtomicBool>,
}

impl SimulatedPin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_high(&self, high: bool) {
        self.level.store(high, Ordering::Release);
    }
}

impl ErrorType for SimulatedPin {
    type Error = Infallible;
}

impl InputPin for SimulatedPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level.load(Ordering::Acquire))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level.load(Ordering::Acquire))
    }
}
