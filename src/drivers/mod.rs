//! Pixel output drivers.

pub mod pixel_strip;
