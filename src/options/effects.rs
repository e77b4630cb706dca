use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::effects::{DragScrollConfig, MagneticConfig};

/// Pointer and scroll effect tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Effects", inline)]
#[serde(default)]
pub struct EffectsOptions {
    /// Default pull of magnetic elements towards the pointer.
    #[schemars(title = "Magnetic Strength", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub magnetic_strength: f64,
    /// Pointer travel (px) before a press on a pill row becomes a drag.
    #[schemars(title = "Drag Threshold", range(min = 1.0, max = 30.0))]
    pub drag_threshold: f64,
    /// Milliseconds the post-drag click guard stays up.
    #[schemars(skip)]
    pub drag_flag_reset_ms: u64,
    /// Window scroll (px) after which the header counts as scrolled.
    #[schemars(title = "Header Scroll Threshold", range(min = 0.0, max = 400.0))]
    pub header_scroll_threshold: f64,
}

impl Default for EffectsOptions {
    fn default() -> Self {
        Self {
            magnetic_strength: 0.3,
            drag_threshold: 5.0,
            drag_flag_reset_ms: 50,
            header_scroll_threshold: 40.0,
        }
    }
}

impl EffectsOptions {
    /// Magnetic cursor configuration.
    #[must_use]
    pub fn magnetic(&self) -> MagneticConfig {
        MagneticConfig {
            strength: self.magnetic_strength,
            ..MagneticConfig::default()
        }
    }

    /// Drag scroll configuration.
    #[must_use]
    pub fn drag_scroll(&self) -> DragScrollConfig {
        DragScrollConfig {
            threshold: self.drag_threshold,
            flag_reset: Duration::from_millis(self.drag_flag_reset_ms),
            ..DragScrollConfig::default()
        }
    }
}
