//! One-shot cancelable timers.
//!
//! A [`TimerHandle`] owns a slot holding the pending callback.  Whichever of
//! [`TimerHandle::fire`] and [`TimerHandle::cancel`] takes the callback out of
//! the slot first wins; the loser sees an empty slot.  That gives:
//!
//! - at most one firing per arm,
//! - `cancel() == true` ⇒ the callback never runs,
//! - cancel is idempotent and safe against a concurrent firing.
//!
//! The callback is invoked *after* the slot lock is released, so a callback
//! that re-enters its owner (which may itself cancel this handle) cannot
//! deadlock.
//!
//! [`ThreadTimer`] is the host implementation: one named `std::thread` per
//! arm, parked on a condvar so a cancel wakes it immediately.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use log::{debug, error};

/// Unique identity of one `arm` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for TimerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Callback run on expiry.  Receives its own id so the consumer can discard
/// superseded deliveries.
pub type TimerCallback = Box<dyn FnOnce(TimerId) + Send + 'static>;

struct Slot {
    callback: Mutex<Option<TimerCallback>>,
    wake: Condvar,
}

/// Handle to one pending (or spent) one-shot.
#[derive(Clone)]
pub struct TimerHandle {
    id: TimerId,
    slot: Arc<Slot>,
}

impl TimerHandle {
    /// Wrap `callback` in a fresh pending handle.  Scheduling is the
    /// [`TimerService`]'s job; this only creates the slot.
    pub fn new(callback: TimerCallback) -> Self {
        Self {
            id: TimerId::next(),
            slot: Arc::new(Slot {
                callback: Mutex::new(Some(callback)),
                wake: Condvar::new(),
            }),
        }
    }

    pub fn id(&self) -> TimerId {
        self.id
    }

    /// True until the handle fires or is canceled.
    pub fn is_pending(&self) -> bool {
        self.lock().is_some()
    }

    /// Run the callback if still pending.  Returns whether it ran.
    pub fn fire(&self) -> bool {
        let callback = self.lock().take();
        match callback {
            Some(cb) => {
                cb(self.id);
                true
            }
            None => false,
        }
    }

    /// Prevent the callback from running.  Returns `true` only if this call
    /// is the one that stopped it.
    pub fn cancel(&self) -> bool {
        let taken = self.lock().take();
        self.slot.wake.notify_all();
        taken.is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<TimerCallback>> {
        self.slot.callback.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("id", &self.id)
            .field("pending", &self.is_pending())
            .finish()
    }
}

/// Scheduler for one-shot callbacks.
pub trait TimerService: Send + Sync {
    /// Schedule `callback` to run once, `after` from now, on a context other
    /// than the caller's.
    fn arm(&self, after: Duration, callback: TimerCallback) -> TimerHandle;

    /// Cancel a handle returned by [`arm`](Self::arm).
    fn cancel(&self, handle: &TimerHandle) -> bool {
        handle.cancel()
    }
}

/// Thread-per-timer implementation for hosted targets.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadTimer;

impl ThreadTimer {
    pub fn new() -> Self {
        Self
    }
}

impl TimerService for ThreadTimer {
    fn arm(&self, after: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = TimerHandle::new(callback);
        let worker = handle.clone();
        let spawned = thread::Builder::new()
            .name(format!("auto-off{}", handle.id()))
            .spawn(move || {
                let guard = worker.lock();
                let (guard, wait) = worker
                    .slot
                    .wake
                    .wait_timeout_while(guard, after, |cb| cb.is_some())
                    .unwrap_or_else(PoisonError::into_inner);
                drop(guard);
                if wait.timed_out() {
                    worker.fire();
                } else {
                    debug!(target: "timer", "timer {} canceled before expiry", worker.id());
                }
            });
        if let Err(e) = spawned {
            error!(target: "timer", "timer {}: thread spawn failed: {}", handle.id(), e);
            handle.cancel();
        }
        handle
    }
}
