//! Application core: pure domain logic, zero I/O.
//!
//! The light coordinator and the render step live here.  All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer testable without a real strip, sensor or broker.

pub mod commands;
pub mod events;
pub mod ports;
pub mod render;
pub mod service;
