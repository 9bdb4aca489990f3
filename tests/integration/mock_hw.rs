//! Mock adapters for integration tests.
//!
//! Every mock is `Clone` and shares its record behind an `Arc<Mutex<_>>`, so
//! a test keeps one copy for assertions while the coordinator owns the
//! other.  [`ManualTimer`] is a virtual clock: nothing fires until the test
//! calls [`ManualTimer::advance`].

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use basalt_light::app::ports::{DisplayError, PixelDisplay, PublishError, Publisher};
use basalt_light::app::service::LightCoordinator;
use basalt_light::config::LightConfig;
use basalt_light::fsm::patterns::Rgbw;
use basalt_light::timer::{TimerCallback, TimerHandle, TimerService};
use embedded_hal::delay::DelayNs;

// ── RecordingDisplay ──────────────────────────────────────────

#[derive(Debug, Default)]
pub struct DisplayLog {
    pub buffer: Vec<Rgbw>,
    /// Buffer contents at every successful `show()`.
    pub frames: Vec<Vec<Rgbw>>,
    pub show_calls: usize,
    pub fills: usize,
    pub sets: usize,
}

#[derive(Clone)]
pub struct RecordingDisplay {
    log: Arc<Mutex<DisplayLog>>,
    fail: Arc<AtomicBool>,
}

impl RecordingDisplay {
    pub fn new(pixel_count: u16) -> Self {
        let log = DisplayLog {
            buffer: vec![Rgbw::default(); usize::from(pixel_count)],
            ..DisplayLog::default()
        };
        Self {
            log: Arc::new(Mutex::new(log)),
            fail: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn frames(&self) -> usize {
        self.log.lock().unwrap().frames.len()
    }

    pub fn show_calls(&self) -> usize {
        self.log.lock().unwrap().show_calls
    }

    pub fn last_frame(&self) -> Vec<Rgbw> {
        self.log.lock().unwrap().frames.last().cloned().unwrap_or_default()
    }

    pub fn fills(&self) -> usize {
        self.log.lock().unwrap().fills
    }

    pub fn sets(&self) -> usize {
        self.log.lock().unwrap().sets
    }
}

impl PixelDisplay for RecordingDisplay {
    fn set_pixel(&mut self, index: u16, color: Rgbw) {
        let mut log = self.log.lock().unwrap();
        log.sets += 1;
        if let Some(px) = log.buffer.get_mut(usize::from(index)) {
            *px = color;
        }
    }

    fn fill(&mut self, color: Rgbw) {
        let mut log = self.log.lock().unwrap();
        log.fills += 1;
        log.buffer.iter_mut().for_each(|px| *px = color);
    }

    fn show(&mut self) -> Result<(), DisplayError> {
        let mut log = self.log.lock().unwrap();
        log.show_calls += 1;
        if self.fail.load(Ordering::SeqCst) {
            return Err(DisplayError::WriteFailed);
        }
        let frame = log.buffer.clone();
        log.frames.push(frame);
        Ok(())
    }
}

// ── RecordingPublisher ────────────────────────────────────────

#[derive(Clone, Default)]
pub struct RecordingPublisher {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    attempts: Arc<Mutex<usize>>,
    fail: Arc<AtomicBool>,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Payloads that were delivered, oldest first.
    pub fn payloads(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, p)| p.clone()).collect()
    }

    pub fn topics(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(t, _)| t.clone()).collect()
    }

    pub fn last_payload(&self) -> Option<String> {
        self.sent.lock().unwrap().last().map(|(_, p)| p.clone())
    }

    pub fn count(&self, payload: &str) -> usize {
        self.sent.lock().unwrap().iter().filter(|(_, p)| p == payload).count()
    }

    pub fn len(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

impl Publisher for RecordingPublisher {
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), PublishError> {
        *self.attempts.lock().unwrap() += 1;
        if self.fail.load(Ordering::SeqCst) {
            return Err(PublishError::NotConnected);
        }
        self.sent.lock().unwrap().push((topic.to_string(), payload.to_string()));
        Ok(())
    }
}

// ── ManualTimer ───────────────────────────────────────────────

#[derive(Default)]
struct Clock {
    now: Duration,
    armed: Vec<(Duration, TimerHandle)>,
}

/// Virtual-clock timer service.
#[derive(Clone, Default)]
pub struct ManualTimer {
    clock: Arc<Mutex<Clock>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.clock.lock().unwrap().now
    }

    /// Move the clock forward, firing every due handle in deadline order.
    /// Callbacks run with the clock unlocked.
    pub fn advance(&self, dt: Duration) {
        let target = self.now() + dt;
        loop {
            let due = {
                let mut clock = self.clock.lock().unwrap();
                let next = clock
                    .armed
                    .iter()
                    .enumerate()
                    .filter(|(_, (deadline, h))| *deadline <= target && h.is_pending())
                    .min_by_key(|(_, (deadline, h))| (*deadline, h.id()))
                    .map(|(i, _)| i);
                match next {
                    Some(i) => {
                        let (deadline, handle) = clock.armed.remove(i);
                        clock.now = deadline;
                        Some(handle)
                    }
                    None => {
                        clock.now = target;
                        None
                    }
                }
            };
            match due {
                Some(handle) => {
                    handle.fire();
                }
                None => break,
            }
        }
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }

    /// Handles armed and neither fired nor canceled.
    pub fn pending_count(&self) -> usize {
        self.clock.lock().unwrap().armed.iter().filter(|(_, h)| h.is_pending()).count()
    }

    /// Every handle still tracked, fired ones excluded.
    pub fn handles(&self) -> Vec<TimerHandle> {
        self.clock.lock().unwrap().armed.iter().map(|(_, h)| h.clone()).collect()
    }
}

impl TimerService for ManualTimer {
    fn arm(&self, after: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = TimerHandle::new(callback);
        let mut clock = self.clock.lock().unwrap();
        let deadline = clock.now + after;
        clock.armed.push((deadline, handle.clone()));
        handle
    }
}

// ── NoDelay ───────────────────────────────────────────────────

/// Frame holds cost nothing in tests.
#[derive(Clone, Copy, Default)]
pub struct NoDelay;

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

// ── Rig ───────────────────────────────────────────────────────

pub type TestCoordinator = LightCoordinator<RecordingDisplay, RecordingPublisher, ManualTimer, NoDelay>;

/// A coordinator wired to mocks, plus the test's copies of them.
pub struct Rig {
    pub light: Arc<TestCoordinator>,
    pub display: RecordingDisplay,
    pub publisher: RecordingPublisher,
    pub timer: ManualTimer,
}

impl Rig {
    /// Built with `config`, not yet started.
    pub fn with_config(config: &LightConfig) -> Self {
        let display = RecordingDisplay::new(config.pixel_count);
        let publisher = RecordingPublisher::new();
        let timer = ManualTimer::new();
        let light = LightCoordinator::new(
            config,
            display.clone(),
            publisher.clone(),
            timer.clone(),
            NoDelay,
        )
        .unwrap();
        Self {
            light,
            display,
            publisher,
            timer,
        }
    }

    /// Default config, started and settled in `Off`.
    pub fn started() -> Self {
        let rig = Self::with_config(&LightConfig::default());
        rig.light.start();
        rig
    }
}
