//! Basalt light controller library.
//!
//! A PIR motion sensor lights the walkway half of an RGBW strip, an
//! auto-off timer darkens it after a quiet period, and commands can force
//! any display pattern.  Every state change is published.
//!
//! The domain core in [`app`] talks to hardware only through the port
//! traits in [`app::ports`]; [`adapters`] and [`drivers`] hold the host
//! implementations used by the binary and the integration tests.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod fsm;
pub mod timer;

pub mod adapters;
pub mod drivers;

pub use error::{Error, Result};
