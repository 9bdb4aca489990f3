//! Addressable RGBW strip driver.
//!
//! Keeps a frame buffer sized to the fixture and streams it through any
//! `smart-leds` writer on [`show`](PixelDisplay::show).  The writer is the
//! only hardware-specific piece: an RMT/SPI SK6812 driver on the node, or
//! [`ConsoleLeds`](crate::adapters::console_leds::ConsoleLeds) on a host.

use core::fmt::Debug;

use heapless::Vec;
use log::warn;
use smart_leds::{SmartLedsWrite, RGBW};

use crate::app::ports::{DisplayError, PixelDisplay};
use crate::config::MAX_PIXELS;
use crate::error::{Error, Result};
use crate::fsm::patterns::{Rgbw, BLACK};

const CAPACITY: usize = MAX_PIXELS as usize;

pub struct PixelStrip<W> {
    writer: W,
    buffer: Vec<Rgbw, CAPACITY>,
}

impl<W> PixelStrip<W>
where
    W: SmartLedsWrite<Color = RGBW<u8>>,
{
    /// Strip of `pixel_count` pixels, all black.
    pub fn new(writer: W, pixel_count: u16) -> Result<Self> {
        if pixel_count == 0 || pixel_count > MAX_PIXELS {
            return Err(Error::Config("pixel_count out of range for strip"));
        }
        let mut buffer = Vec::new();
        buffer
            .resize(usize::from(pixel_count), BLACK)
            .map_err(|_| Error::Config("pixel_count out of range for strip"))?;
        Ok(Self { writer, buffer })
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Buffered colours, not necessarily shown yet.
    pub fn pixels(&self) -> &[Rgbw] {
        &self.buffer
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

impl<W> PixelDisplay for PixelStrip<W>
where
    W: SmartLedsWrite<Color = RGBW<u8>>,
    W::Error: Debug,
{
    fn set_pixel(&mut self, index: u16, color: Rgbw) {
        if let Some(px) = self.buffer.get_mut(usize::from(index)) {
            *px = color;
        }
    }

    fn fill(&mut self, color: Rgbw) {
        self.buffer.iter_mut().for_each(|px| *px = color);
    }

    fn show(&mut self) -> core::result::Result<(), DisplayError> {
        self.writer.write(self.buffer.iter().copied()).map_err(|e| {
            warn!(target: "light", "strip write failed: {:?}", e);
            DisplayError::WriteFailed
        })
    }
}
