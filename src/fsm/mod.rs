//! Light state identity and the pattern table.
//!
//! ```text
//!  ┌──────────────────── control ────────────────────┐
//!  │  Unknown ──start()──▶ Startup ──▶ Off            │
//!  │  any ──fault()──▶ Error     any ──shutdown()──▶ Shutdown ──▶ Off (inert)
//!  └──────────────────────────────────────────────────┘
//!  ┌──────────────────── display ────────────────────┐
//!  │  Off · NightLight · ShowPath · FullBright        │
//!  │  Test1 · Test2 · Test3                           │
//!  │  rising edge ──▶ NightLight                      │
//!  │  auto-off expiry ──▶ Off                         │
//!  │  set_state(name) ──▶ any display state           │
//!  └──────────────────────────────────────────────────┘
//! ```
//!
//! Control states are reachable only through lifecycle calls on the
//! coordinator.  Display states are the only ones a command may name.

pub mod patterns;

use core::fmt;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Every state the light can be in.
///
/// `#[repr(u8)]` so the coordinator can publish a lock-free snapshot in an
/// `AtomicU8`.  Control states sit below [`LightState::FIRST_DISPLAY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LightState {
    // ── Control ───────────────────────────────────────────
    Unknown = 0,
    Startup = 1,
    Shutdown = 2,
    Error = 3,

    // ── Display ───────────────────────────────────────────
    Off = 4,
    NightLight = 5,
    ShowPath = 6,
    FullBright = 7,
    Test1 = 8,
    Test2 = 9,
    Test3 = 10,
}

impl LightState {
    /// Total number of states.
    pub const COUNT: usize = 11;

    /// Discriminant of the first display state; the partition boundary.
    pub const FIRST_DISPLAY: u8 = Self::Off as u8;

    /// All states in discriminant order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Unknown,
        Self::Startup,
        Self::Shutdown,
        Self::Error,
        Self::Off,
        Self::NightLight,
        Self::ShowPath,
        Self::FullBright,
        Self::Test1,
        Self::Test2,
        Self::Test3,
    ];

    /// The user-settable partition.
    pub const DISPLAY: [Self; 7] = [
        Self::Off,
        Self::NightLight,
        Self::ShowPath,
        Self::FullBright,
        Self::Test1,
        Self::Test2,
        Self::Test3,
    ];

    /// Canonical name, used as the published payload.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Unknown => "Unknown",
            Self::Startup => "Startup",
            Self::Shutdown => "Shutdown",
            Self::Error => "Error",
            Self::Off => "Off",
            Self::NightLight => "NightLight",
            Self::ShowPath => "ShowPath",
            Self::FullBright => "FullBright",
            Self::Test1 => "Test1",
            Self::Test2 => "Test2",
            Self::Test3 => "Test3",
        }
    }

    /// Whether a command may request this state.
    pub const fn is_display(self) -> bool {
        self as u8 >= Self::FIRST_DISPLAY
    }

    /// Whether this state is lifecycle-only.
    pub const fn is_control(self) -> bool {
        !self.is_display()
    }

    /// Look up a state by name, ASCII case-insensitive.  Matches either
    /// partition; callers filter with [`is_display`](Self::is_display).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.name().eq_ignore_ascii_case(name))
    }

    /// Look up a display state by name.  Control states and unknown names
    /// both yield `None`.
    pub fn display_from_name(name: &str) -> Option<Self> {
        Self::from_name(name).filter(|s| s.is_display())
    }

    /// Convert a snapshot byte back to `LightState`.  Panics on out-of-range
    /// in debug builds; returns `Unknown` in release.
    pub fn from_u8(raw: u8) -> Self {
        match Self::ALL.get(raw as usize) {
            Some(state) => *state,
            None => {
                debug_assert!(false, "invalid light state byte: {raw}");
                Self::Unknown
            }
        }
    }
}

impl fmt::Display for LightState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
