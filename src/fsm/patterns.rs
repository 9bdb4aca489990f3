//! Pattern table: state → abstract pixel pattern.
//!
//! Pure data, no hardware access.  The coordinator looks up the pattern for
//! a new state here and hands it to the render step.
//!
//! | State      | Pattern                                        |
//! |------------|------------------------------------------------|
//! | Unknown    | black                                          |
//! | Startup    | green flash (1 s), then black                  |
//! | Shutdown   | amber path → dim amber path → black (300 ms)   |
//! | Error      | red ping-pong on pixels 0/1, ends on pixel 0   |
//! | Off        | black                                          |
//! | NightLight | dim amber on the path segment                  |
//! | ShowPath   | white channel on the path segment              |
//! | FullBright | full white channel everywhere                  |
//! | Test1/2    | solid red / solid green                        |
//! | Test3      | red, green, blue, purple quarters              |
//!
//! The "path segment" is the first `path_pixels` pixels of the fixture,
//! the half that faces the walkway.

use core::ops::Range;

use heapless::Vec;
use serde::{Deserialize, Serialize};

use super::LightState;
use crate::config::LightConfig;

/// Maximum frames in one pattern.
pub const MAX_FRAMES: usize = 8;

/// Maximum directives in one frame.
pub const MAX_DIRECTIVES: usize = 6;

// ═══════════════════════════════════════════════════════════════
//  Colour
// ═══════════════════════════════════════════════════════════════

/// Colour of one RGBW pixel, each channel 0–255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgbw {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub w: u8,
}

impl Rgbw {
    pub const fn new(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self { r, g, b, w }
    }

    pub const fn is_black(self) -> bool {
        self.r == 0 && self.g == 0 && self.b == 0 && self.w == 0
    }
}

impl From<Rgbw> for smart_leds::RGBW<u8> {
    fn from(c: Rgbw) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: smart_leds::White(c.w),
        }
    }
}

pub const BLACK: Rgbw = Rgbw::new(0, 0, 0, 0);
pub const RED: Rgbw = Rgbw::new(255, 0, 0, 0);
pub const YELLOW: Rgbw = Rgbw::new(255, 200, 0, 0);
pub const GREEN: Rgbw = Rgbw::new(0, 255, 0, 0);
pub const AQUA: Rgbw = Rgbw::new(0, 255, 255, 0);
pub const BLUE: Rgbw = Rgbw::new(0, 0, 255, 0);
pub const PURPLE: Rgbw = Rgbw::new(255, 0, 255, 0);
pub const WHITE: Rgbw = Rgbw::new(0, 0, 0, 255);
pub const DIM_AMBER: Rgbw = Rgbw::new(2, 1, 0, 0);
pub const PATH_WHITE: Rgbw = Rgbw::new(0, 0, 0, 96);
pub const STARTUP_GREEN: Rgbw = Rgbw::new(0, 128, 0, 0);
pub const SHUTDOWN_AMBER: Rgbw = Rgbw::new(64, 32, 0, 0);

// ═══════════════════════════════════════════════════════════════
//  Pattern data
// ═══════════════════════════════════════════════════════════════

/// Paint `pixels` with `color`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub pixels: Range<u16>,
    pub color: Rgbw,
}

/// One displayed frame: directives applied in order, then held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    directives: Vec<Directive, MAX_DIRECTIVES>,
    hold_ms: u32,
}

impl Frame {
    fn new(hold_ms: u32) -> Self {
        Self {
            directives: Vec::new(),
            hold_ms,
        }
    }

    /// Append a directive; empty ranges are skipped.
    fn span(mut self, pixels: Range<u16>, color: Rgbw) -> Self {
        if !pixels.is_empty() && self.directives.push(Directive { pixels, color }).is_err() {
            debug_assert!(false, "frame directive capacity exceeded");
        }
        self
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// How long the frame stays up before the next one is drawn.
    pub fn hold_ms(&self) -> u32 {
        self.hold_ms
    }

    /// Colour this frame assigns to pixel `index` (last directive wins).
    pub fn color_at(&self, index: u16) -> Option<Rgbw> {
        self.directives
            .iter()
            .rev()
            .find(|d| d.pixels.contains(&index))
            .map(|d| d.color)
    }

    /// True if the directives tile `0..pixel_count` exactly: contiguous,
    /// non-overlapping, in order.
    pub fn covers(&self, pixel_count: u16) -> bool {
        let mut next = 0;
        for d in &self.directives {
            if d.pixels.start != next {
                return false;
            }
            next = d.pixels.end;
        }
        next == pixel_count
    }
}

/// Ordered frames for one state.  Static states have exactly one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelPattern {
    frames: Vec<Frame, MAX_FRAMES>,
}

impl PixelPattern {
    fn from_frames<const N: usize>(frames: [Frame; N]) -> Self {
        let mut out = Vec::new();
        for frame in frames {
            if out.push(frame).is_err() {
                debug_assert!(false, "pattern frame capacity exceeded");
                break;
            }
        }
        Self { frames: out }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The frame left on the fixture once the pattern has played.
    pub fn final_frame(&self) -> Option<&Frame> {
        self.frames.last()
    }

    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }
}

// ═══════════════════════════════════════════════════════════════
//  Pattern table
// ═══════════════════════════════════════════════════════════════

const STARTUP_HOLD_MS: u32 = 1000;
const SHUTDOWN_STEP_MS: u32 = 300;
const ERROR_STEP_MS: u32 = 200;
const ERROR_CYCLES: usize = 3;

/// Fixture geometry captured from config; maps states to patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternTable {
    pixel_count: u16,
    path_pixels: u16,
}

impl PatternTable {
    pub fn new(config: &LightConfig) -> Self {
        Self {
            pixel_count: config.pixel_count,
            path_pixels: config.path_pixels.min(config.pixel_count),
        }
    }

    pub fn pixel_count(&self) -> u16 {
        self.pixel_count
    }

    /// Pattern for `state`.  Total over every variant.
    pub fn pattern_for(&self, state: LightState) -> PixelPattern {
        match state {
            LightState::Unknown | LightState::Off => self.solid(BLACK),
            LightState::Startup => PixelPattern::from_frames([
                self.fill_frame(STARTUP_GREEN, STARTUP_HOLD_MS),
                self.fill_frame(BLACK, 0),
            ]),
            LightState::Shutdown => PixelPattern::from_frames([
                self.path_frame(SHUTDOWN_AMBER, SHUTDOWN_STEP_MS),
                self.path_frame(DIM_AMBER, SHUTDOWN_STEP_MS),
                self.fill_frame(BLACK, 0),
            ]),
            LightState::Error => self.error_sequence(),
            LightState::NightLight => PixelPattern::from_frames([self.path_frame(DIM_AMBER, 0)]),
            LightState::ShowPath => PixelPattern::from_frames([self.path_frame(PATH_WHITE, 0)]),
            LightState::FullBright => self.solid(WHITE),
            LightState::Test1 => self.solid(RED),
            LightState::Test2 => self.solid(GREEN),
            LightState::Test3 => self.quarters([RED, GREEN, BLUE, PURPLE]),
        }
    }

    // ── Frame builders ────────────────────────────────────────

    fn solid(&self, color: Rgbw) -> PixelPattern {
        PixelPattern::from_frames([self.fill_frame(color, 0)])
    }

    fn fill_frame(&self, color: Rgbw, hold_ms: u32) -> Frame {
        Frame::new(hold_ms).span(0..self.pixel_count, color)
    }

    /// `color` on the path segment, black on the rest.
    fn path_frame(&self, color: Rgbw, hold_ms: u32) -> Frame {
        Frame::new(hold_ms)
            .span(0..self.path_pixels, color)
            .span(self.path_pixels..self.pixel_count, BLACK)
    }

    /// `color` on pixel `index` only, black elsewhere.
    fn single_pixel_frame(&self, index: u16, color: Rgbw, hold_ms: u32) -> Frame {
        Frame::new(hold_ms)
            .span(0..index, BLACK)
            .span(index..index + 1, color)
            .span(index + 1..self.pixel_count, BLACK)
    }

    fn error_sequence(&self) -> PixelPattern {
        // Ping-pong needs two pixels; a one-pixel fixture just blinks.
        let second = if self.pixel_count > 1 { 1 } else { 0 };
        let mut frames: Vec<Frame, MAX_FRAMES> = Vec::new();
        for _ in 0..ERROR_CYCLES {
            let _ = frames.push(self.single_pixel_frame(0, RED, ERROR_STEP_MS));
            let second_frame = if second == 0 {
                self.fill_frame(BLACK, ERROR_STEP_MS)
            } else {
                self.single_pixel_frame(second, RED, ERROR_STEP_MS)
            };
            let _ = frames.push(second_frame);
        }
        let _ = frames.push(self.single_pixel_frame(0, RED, 0));
        PixelPattern { frames }
    }

    fn quarters(&self, colors: [Rgbw; 4]) -> PixelPattern {
        let n = self.pixel_count;
        let bounds = [0, n / 4, n / 2, n - n / 4, n];
        let mut frame = Frame::new(0);
        for (i, color) in colors.into_iter().enumerate() {
            frame = frame.span(bounds[i]..bounds[i + 1], color);
        }
        PixelPattern::from_frames([frame])
    }
}
