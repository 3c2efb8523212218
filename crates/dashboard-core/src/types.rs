// File: crates/dashboard-core/src/types.rs
// Summary: Shared constants (image size, delays, default names) and the session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::format::NumberFormat;

/// Default capture width in pixels.
pub const IMAGE_WIDTH: u32 = 1200;
/// Default capture height in pixels.
pub const IMAGE_HEIGHT: u32 = 800;

/// Delay before a download's object URL is released.
pub const REVOKE_DELAY: Duration = Duration::from_millis(500);
/// Delay before a chart is resized after entering fullscreen.
pub const RESIZE_DELAY: Duration = Duration::from_millis(100);

/// Header used when there are no rows to take keys from.
pub const DEFAULT_HEADER: [&str; 5] = ["trace", "x", "y", "text", "customdata"];

/// Base name for image downloads when the caller gives none.
pub const DEFAULT_IMAGE_PREFIX: &str = "grafico";
/// Base name for data downloads (CSV/XLS).
pub const DEFAULT_DATA_NAME: &str = "datos_grafico";

/// Settings shared by every chart rendered in one session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(deserialize_with = "crate::format::preset_or_inline")]
    pub number_format: NumberFormat,
    pub image_width: u32,
    pub image_height: u32,
    pub revoke_delay_ms: u64,
    pub resize_delay_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            number_format: NumberFormat::default(),
            image_width: IMAGE_WIDTH,
            image_height: IMAGE_HEIGHT,
            revoke_delay_ms: REVOKE_DELAY.as_millis() as u64,
            resize_delay_ms: RESIZE_DELAY.as_millis() as u64,
        }
    }
}

impl SessionConfig {
    pub fn revoke_delay(&self) -> Duration {
        Duration::from_millis(self.revoke_delay_ms)
    }

    pub fn resize_delay(&self) -> Duration {
        Duration::from_millis(self.resize_delay_ms)
    }
}
