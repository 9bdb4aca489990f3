//! Host stand-in for the SK6812 strip.
//!
//! A `smart-leds` writer that logs a one-line summary of every frame
//! instead of clocking it out, so the binary can drive a
//! [`PixelStrip`](crate::drivers::pixel_strip::PixelStrip) without hardware.

use core::convert::Infallible;

use log::info;
use smart_leds::{SmartLedsWrite, RGBW};

#[derive(Debug, Default)]
pub struct ConsoleLeds {
    frames: u64,
    last: Vec<RGBW<u8>>,
}

impl ConsoleLeds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames written so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// The most recent frame.
    pub fn last_frame(&self) -> &[RGBW<u8>] {
        &self.last
    }
}

impl SmartLedsWrite for ConsoleLeds {
    type Error = Infallible;
    type Color = RGBW<u8>;

    fn write<T, I>(&mut self, iterator: T) -> Result<(), Self::Error>
    where
        T: IntoIterator<Item = I>,
        I: Into<Self::Color>,
    {
        self.last.clear();
        self.last.extend(iterator.into_iter().map(Into::into));
        self.frames += 1;

        let lit: Vec<_> = self.last.iter().filter(|c| is_lit(c)).collect();
        match lit.first() {
            Some(c) => info!(
                target: "light",
                "LEDS | frame {} | {}/{} lit | first r={} g={} b={} w={}",
                self.frames,
                lit.len(),
                self.last.len(),
                c.r,
                c.g,
                c.b,
                c.a.0
            ),
            None => info!(target: "light", "LEDS | frame {} | dark", self.frames),
        }
        Ok(())
    }
}

fn is_lit(c: &RGBW<u8>) -> bool {
    c.r != 0 || c.g != 0 || c.b != 0 || c.a.0 != 0
}
