//! Basalt light: host console entry point.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  PixelStrip<ConsoleLeds>  LogPublisher  ThreadTimer StdDelay │
//! │  (PixelDisplay)           (Publisher)   (TimerService)       │
//! │  PirMotionSensor<SimulatedPin>  ◀── stdin `motion`/`clear`   │
//! │                                                              │
//! │  ──────────────── Port Trait Boundary ──────────────────     │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │          LightCoordinator (pure logic)             │      │
//! │  │  state · auto-off timer · pattern table            │      │
//! │  └────────────────────────────────────────────────────┘      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `basalt-light [config.json]`, then one command per line on
//! stdin.  `RUST_LOG` controls verbosity (default `info`).

use std::io::{self, BufRead};
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use tracing_subscriber::EnvFilter;

use basalt_light::adapters::console_leds::ConsoleLeds;
use basalt_light::adapters::log_publisher::LogPublisher;
use basalt_light::adapters::motion::{PirMotionSensor, SimulatedPin};
use basalt_light::adapters::time::StdDelay;
use basalt_light::app::commands::LightCommand;
use basalt_light::app::events::MotionEdge;
use basalt_light::app::ports::EdgeSource;
use basalt_light::app::service::LightCoordinator;
use basalt_light::config::LightConfig;
use basalt_light::drivers::pixel_strip::PixelStrip;
use basalt_light::timer::ThreadTimer;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;
    info!(
        "Basalt light: {} pixels, path {}, auto-off {}s",
        config.pixel_count, config.path_pixels, config.auto_off_secs
    );

    // ── Wiring ────────────────────────────────────────────────
    let strip = PixelStrip::new(ConsoleLeds::new(), config.pixel_count)?;
    let coordinator = LightCoordinator::new(
        &config,
        strip,
        LogPublisher::new(),
        ThreadTimer::new(),
        StdDelay::new(),
    )?;

    let pin = SimulatedPin::new();
    let mut pir = PirMotionSensor::new(pin.clone());
    let target = Arc::clone(&coordinator);
    pir.subscribe(Box::new(move |edge| target.on_motion_edge(edge)));

    coordinator.start();

    // ── Console loop ──────────────────────────────────────────
    for line in io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<LightCommand>() {
            // Motion goes through the PIR adapter, same path as the interrupt.
            Ok(LightCommand::Motion(edge)) => {
                pin.set_high(edge == MotionEdge::Rising);
                pir.on_interrupt();
                println!("ok");
            }
            Ok(cmd) => match coordinator.handle_command(cmd) {
                Ok(reply) => println!("{reply}"),
                Err(e) => println!("error: {e}"),
            },
            Err(e) => println!("error: {e}"),
        }
        if coordinator.is_shut_down() {
            break;
        }
    }

    coordinator.shutdown();
    Ok(())
}

fn load_config() -> Result<LightConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(LightConfig::default());
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config = LightConfig::from_json(&text).with_context(|| format!("loading {path}"))?;
    Ok(config)
}
