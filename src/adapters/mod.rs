//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter         | Implements        | Connects to                 |
//! |-----------------|-------------------|-----------------------------|
//! | `console_leds`  | SmartLedsWrite    | Log output (host strip)     |
//! | `log_publisher` | Publisher         | Log output (host pub/sub)   |
//! | `motion`        | EdgeSource        | PIR `InputPin`              |
//! | `time`          | DelayNs           | `std::thread::sleep`        |
//!
//! The timer service lives in [`crate::timer`]; it is a port and its host
//! implementation together.

pub mod console_leds;
pub mod log_publisher;
pub mod motion;
pub mod time;
