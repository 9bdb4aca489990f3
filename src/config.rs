//! Node configuration
//!
//! Fixture geometry, the auto-off quiet period, and the topic hierarchy the
//! node publishes under.  Loaded from a JSON file at startup; every field has
//! a default so a partial file is fine.

use core::fmt::Write as _;
use core::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Largest fixture the pixel buffer supports.
pub const MAX_PIXELS: u16 = 256;

/// One segment of the topic hierarchy.
pub type Label = heapless::String<24>;

/// A fully rendered topic.
pub type Topic = heapless::String<160>;

/// Core node configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    // --- Fixture ---
    /// Number of addressable pixels on the strip
    pub pixel_count: u16,
    /// Pixels in the path segment (lit by the night light)
    pub path_pixels: u16,

    // --- Motion ---
    /// Quiet period after the last motion before the light turns off (seconds)
    pub auto_off_secs: u32,

    // --- Topics ---
    pub namespace: Label,
    pub type_name: Label,
    pub location: Label,
    pub node_name: Label,
    pub device_name: Label,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            // Fixture: 56 GRBW pixels, walkway half first
            pixel_count: 56,
            path_pixels: 28,

            // Motion
            auto_off_secs: 5,

            // Topics: yukon/device/basalt/driveway/basalt1/light/status
            namespace: label("yukon"),
            type_name: label("basalt"),
            location: label("driveway"),
            node_name: label("basalt1"),
            device_name: label("light"),
        }
    }
}

impl LightConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| {
            warn!("config: parse failed: {}", e);
            Error::Config("malformed JSON")
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the coordinator cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.pixel_count == 0 {
            return Err(Error::Config("pixel_count must be at least 1"));
        }
        if self.pixel_count > MAX_PIXELS {
            return Err(Error::Config("pixel_count exceeds MAX_PIXELS"));
        }
        if self.path_pixels > self.pixel_count {
            return Err(Error::Config("path_pixels exceeds pixel_count"));
        }
        if self.auto_off_secs == 0 {
            return Err(Error::Config("auto_off_secs must be positive"));
        }
        let labels = [
            &self.namespace,
            &self.type_name,
            &self.location,
            &self.node_name,
            &self.device_name,
        ];
        if labels.iter().any(|l| l.is_empty() || l.contains('/')) {
            return Err(Error::Config("topic labels must be non-empty and contain no '/'"));
        }
        Ok(())
    }

    /// Quiet period as a `Duration`.
    pub fn auto_off(&self) -> Duration {
        Duration::from_secs(u64::from(self.auto_off_secs))
    }

    /// Device status topic, e.g. `yukon/device/basalt/driveway/basalt1/light/status`.
    pub fn status_topic(&self) -> Result<Topic> {
        let mut topic = Topic::new();
        write!(
            topic,
            "{}/device/{}/{}/{}/{}/status",
            self.namespace, self.type_name, self.location, self.node_name, self.device_name
        )
        .map_err(|_| Error::Config("status topic too long"))?;
        Ok(topic)
    }
}

fn label(s: &str) -> Label {
    let mut out = Label::new();
    let _ = out.push_str(s);
    out
}
