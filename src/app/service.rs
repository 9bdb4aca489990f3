//! Light coordinator: the hexagonal core.
//!
//! [`LightCoordinator`] owns the current [`LightState`] and the single
//! outstanding auto-off timer.  Motion edges, timer expiries and commands
//! arrive on different threads and serialize on one mutex, so "cancel old
//! timer, transition, render, publish" is atomic to every caller.
//!
//! ```text
//!  EdgeSource ──▶ ┌──────────────────────────┐ ──▶ PixelDisplay
//!  TimerService ─▶│     LightCoordinator     │
//!  Commands ─────▶│ state · pending timer    │ ──▶ Publisher
//!                 └──────────────────────────┘
//! ```
//!
//! Timer callbacks hold only a `Weak` back-reference and carry their
//! [`TimerId`]; a delivery whose id is not the pending one is stale and
//! ignored, which closes the race between a cancel and an already-running
//! expiry.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use embedded_hal::delay::DelayNs;
use log::{debug, info, warn};

use crate::config::{LightConfig, Topic};
use crate::error::{Error, Result};
use crate::fsm::LightState;
use crate::fsm::patterns::PatternTable;
use crate::timer::{TimerHandle, TimerId, TimerService};

use super::commands::{CommandReply, LightCommand};
use super::events::MotionEdge;
use super::ports::{PixelDisplay, Publisher};
use super::render::render_pattern;

// ───────────────────────────────────────────────────────────────
// Critical-section state
// ───────────────────────────────────────────────────────────────

struct Inner<D, P, W> {
    state: LightState,
    pending: Option<TimerHandle>,
    /// Set by `shutdown()`; every later call is a no-op.
    inert: bool,
    display: D,
    publisher: P,
    delay: W,
}

// ───────────────────────────────────────────────────────────────
// LightCoordinator
// ───────────────────────────────────────────────────────────────

/// Serializes every state change for one fixture.
pub struct LightCoordinator<D, P, T, W> {
    me: Weak<Self>,
    table: PatternTable,
    topic: Topic,
    auto_off: Duration,
    timer: T,
    /// Lock-free copy of `Inner::state`, stored after the frame is issued.
    snapshot: AtomicU8,
    inner: Mutex<Inner<D, P, W>>,
}

impl<D, P, T, W> LightCoordinator<D, P, T, W>
where
    D: PixelDisplay + Send + 'static,
    P: Publisher + Send + 'static,
    T: TimerService + 'static,
    W: DelayNs + Send + 'static,
{
    /// Build a coordinator in `Unknown`.  Nothing is rendered until
    /// [`start`](Self::start).
    pub fn new(config: &LightConfig, display: D, publisher: P, timer: T, delay: W) -> Result<Arc<Self>> {
        config.validate()?;
        let topic = config.status_topic()?;
        let table = PatternTable::new(config);
        let auto_off = config.auto_off();

        Ok(Arc::new_cyclic(|me| Self {
            me: me.clone(),
            table,
            topic,
            auto_off,
            timer,
            snapshot: AtomicU8::new(LightState::Unknown as u8),
            inner: Mutex::new(Inner {
                state: LightState::Unknown,
                pending: None,
                inert: false,
                display,
                publisher,
                delay,
            }),
        }))
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Play the startup sequence and settle in `Off`.  Only valid once,
    /// from `Unknown`.
    pub fn start(&self) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if inner.inert || inner.state != LightState::Unknown {
            debug!(target: "light", "start ignored in {}", inner.state);
            return;
        }
        self.transition(inner, LightState::Startup);
        self.transition(inner, LightState::Off);
        info!(target: "light", "started, publishing to {}", self.topic);
    }

    /// Enter `Error` and play the error sequence.  Motion or `set_state`
    /// leave it again.
    pub fn fault(&self, reason: &str) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if inner.inert {
            debug!(target: "light", "fault after shutdown ignored: {}", reason);
            return;
        }
        warn!(target: "light", "fault: {}", reason);
        self.cancel_pending(inner);
        self.transition(inner, LightState::Error);
    }

    /// Cancel any pending timer, play the shutdown sequence, settle in
    /// `Off`, and go inert.
    pub fn shutdown(&self) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if inner.inert {
            debug!(target: "light", "already shut down");
            return;
        }
        self.cancel_pending(inner);
        self.transition(inner, LightState::Shutdown);
        self.transition(inner, LightState::Off);
        inner.inert = true;
        info!(target: "light", "shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.lock().inert
    }

    // ── Event entry points ────────────────────────────────────

    /// Rising: light the path now, forget any countdown.  Falling: restart
    /// the quiet-period countdown without changing state.
    pub fn on_motion_edge(&self, edge: MotionEdge) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if inner.inert {
            debug!(target: "light", "{} edge after shutdown ignored", edge);
            return;
        }
        match edge {
            MotionEdge::Rising => {
                self.cancel_pending(inner);
                self.transition(inner, LightState::NightLight);
            }
            MotionEdge::Falling => self.arm_auto_off(inner),
        }
    }

    /// Auto-off delivery.  Acts only if `timer_id` is the pending timer.
    pub fn on_auto_off_timer_expired(&self, timer_id: TimerId) {
        let mut guard = self.lock();
        let inner = &mut *guard;
        if inner.inert {
            debug!(target: "light", "timer {} after shutdown ignored", timer_id);
            return;
        }
        let current = inner.pending.as_ref().is_some_and(|h| h.id() == timer_id);
        if !current {
            debug!(target: "light", "stale timer {} ignored", timer_id);
            return;
        }
        inner.pending = None;
        info!(target: "light", "quiet for {:?}, turning off", self.auto_off);
        self.transition(inner, LightState::Off);
    }

    // ── Commands ──────────────────────────────────────────────

    /// Force a display state by name.  Control-state and unknown names are
    /// rejected without touching the light.
    pub fn set_state(&self, name: &str) -> Result<()> {
        let target = LightState::display_from_name(name)
            .ok_or_else(|| Error::InvalidState(name.to_string()))?;

        let mut guard = self.lock();
        let inner = &mut *guard;
        if inner.inert {
            debug!(target: "light", "set {} after shutdown ignored", target);
            return Ok(());
        }
        self.cancel_pending(inner);
        self.transition(inner, target);
        Ok(())
    }

    /// Dispatch a parsed console command.
    pub fn handle_command(&self, cmd: LightCommand) -> Result<CommandReply> {
        let reply = match cmd {
            LightCommand::Motion(edge) => {
                self.on_motion_edge(edge);
                CommandReply::Ack
            }
            LightCommand::SetState(name) => {
                self.set_state(&name)?;
                CommandReply::Ack
            }
            LightCommand::Query => CommandReply::State(self.current_state()),
            LightCommand::ListStates => CommandReply::States(self.list_user_settable_states().collect()),
            LightCommand::Fault(reason) => {
                self.fault(&reason);
                CommandReply::Ack
            }
            LightCommand::Shutdown => {
                self.shutdown();
                CommandReply::Stopped
            }
        };
        Ok(reply)
    }

    // ── Queries ───────────────────────────────────────────────

    /// Last state whose frame was issued.  Never blocks.
    pub fn current_state(&self) -> LightState {
        LightState::from_u8(self.snapshot.load(Ordering::Acquire))
    }

    /// Names a command may pass to [`set_state`](Self::set_state).
    pub fn list_user_settable_states(&self) -> impl Iterator<Item = &'static str> {
        LightState::DISPLAY.into_iter().map(LightState::name)
    }

    /// Id of the armed auto-off timer, if it has not fired yet.
    pub fn pending_timer(&self) -> Option<TimerId> {
        self.lock()
            .pending
            .as_ref()
            .filter(|h| h.is_pending())
            .map(TimerHandle::id)
    }

    pub fn status_topic(&self) -> &str {
        &self.topic
    }

    // ── Internals (lock held) ─────────────────────────────────

    fn lock(&self) -> MutexGuard<'_, Inner<D, P, W>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel_pending(&self, inner: &mut Inner<D, P, W>) {
        if let Some(handle) = inner.pending.take() {
            if self.timer.cancel(&handle) {
                debug!(target: "light", "auto-off {} canceled", handle.id());
            }
        }
    }

    fn arm_auto_off(&self, inner: &mut Inner<D, P, W>) {
        self.cancel_pending(inner);
        let me = self.me.clone();
        let handle = self.timer.arm(
            self.auto_off,
            Box::new(move |id| {
                if let Some(coordinator) = me.upgrade() {
                    coordinator.on_auto_off_timer_expired(id);
                }
            }),
        );
        debug!(target: "light", "auto-off {} armed for {:?}", handle.id(), self.auto_off);
        inner.pending = Some(handle);
    }

    /// Render, snapshot, publish.  Failures are logged, never rolled back.
    fn transition(&self, inner: &mut Inner<D, P, W>, to: LightState) {
        let from = inner.state;
        let pattern = self.table.pattern_for(to);
        if let Err(e) = render_pattern(&mut inner.display, &mut inner.delay, &pattern, self.table.pixel_count()) {
            warn!(target: "light", "{} -> {}: {}", from, to, Error::from(e));
        }

        inner.state = to;
        self.snapshot.store(to as u8, Ordering::Release);

        if from == to {
            debug!(target: "light", "{} re-rendered", to);
            return;
        }
        info!(target: "light", "{} -> {}", from, to);
        if let Err(e) = inner.publisher.publish(&self.topic, to.name()) {
            warn!(target: "light", "{} not announced: {}", to, Error::from(e));
        }
    }
}
