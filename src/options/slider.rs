use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::slider::SliderConfig;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Slider", inline)]
#[serde(default)]
/// Slider timing.
pub struct SliderOptions {
    /// Minimum milliseconds between native scroll recomputations.
    #[schemars(title = "Scroll Throttle (ms)", range(min = 16, max = 500))]
    pub scroll_throttle_ms: u64,
    /// Milliseconds to wait for the track to settle on engines without
    /// `scrollend`.
    #[schemars(title = "Settle Fallback (ms)", range(min = 100, max = 2000))]
    pub settle_fallback_ms: u64,
}

impl Default for SliderOptions {
    fn default() -> Self {
        Self {
            scroll_throttle_ms: 100,
            settle_fallback_ms: 500,
        }
    }
}

impl SliderOptions {
    /// Runtime configuration for [`crate::slider::Slider`].
    #[must_use]
    pub fn config(&self) -> SliderConfig {
        SliderConfig {
            scroll_throttle: Duration::from_millis(self.scroll_throttle_ms),
            settle_fallback: Duration::from_millis(self.settle_fallback_ms),
        }
    }
}
