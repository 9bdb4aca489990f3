//! Render step: play a [`PixelPattern`] on a [`PixelDisplay`].
//!
//! Each frame's directives go into the display buffer, then the frame is
//! flushed with exactly one `show()`.  The hold between frames uses the
//! injected `DelayNs`; the final frame is left on the fixture without a hold.

use embedded_hal::delay::DelayNs;

use crate::fsm::patterns::{Directive, PixelPattern};

use super::ports::{DisplayError, PixelDisplay};

/// Play `pattern` to completion.  A failed flush aborts the remaining frames.
pub fn render_pattern<D, W>(
    display: &mut D,
    delay: &mut W,
    pattern: &PixelPattern,
    pixel_count: u16,
) -> Result<(), DisplayError>
where
    D: PixelDisplay + ?Sized,
    W: DelayNs + ?Sized,
{
    let frames = pattern.frames();
    for (i, frame) in frames.iter().enumerate() {
        for directive in frame.directives() {
            apply(display, directive, pixel_count);
        }
        display.show()?;

        let last = i + 1 == frames.len();
        if !last && frame.hold_ms() > 0 {
            delay.delay_ms(frame.hold_ms());
        }
    }
    Ok(())
}

fn apply<D: PixelDisplay + ?Sized>(display: &mut D, directive: &Directive, pixel_count: u16) {
    let Directive { pixels, color } = directive;
    if pixels.start == 0 && pixels.end >= pixel_count {
        display.fill(*color);
    } else {
        for index in pixels.clone() {
            display.set_pixel(index, *color);
        }
    }
}
