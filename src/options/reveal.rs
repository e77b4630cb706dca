use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::effects::{RevealConfig, RevealTrigger};

/// When split text is revealed.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum RevealMode {
    /// Right after splitting.
    Immediate,
    /// On a custom document event.
    External,
    /// When scrolled into view.
    #[default]
    InView,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Text Reveal", inline)]
#[serde(default)]
/// Text reveal parameters.
pub struct RevealOptions {
    /// Trigger mode.
    #[schemars(title = "Trigger")]
    pub mode: RevealMode,
    /// Document event name for the `external` mode.
    #[schemars(title = "External Event")]
    pub external_event: String,
    /// Visible fraction that counts as in view.
    #[schemars(title = "Threshold", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub threshold: f64,
    /// Max vertical gap (px) between words on one line.
    #[schemars(skip)]
    pub line_tolerance: f64,
    /// Quiet period after a resize before lines are rebuilt.
    #[schemars(skip)]
    pub resize_debounce_ms: u64,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            mode: RevealMode::InView,
            external_event: "preloader:complete".to_owned(),
            threshold: 0.2,
            line_tolerance: 2.0,
            resize_debounce_ms: 150,
        }
    }
}

impl RevealOptions {
    /// Runtime configuration for [`crate::effects::text_reveal`].
    #[must_use]
    pub fn config(&self) -> RevealConfig {
        let trigger = match self.mode {
            RevealMode::Immediate => RevealTrigger::Immediate,
            RevealMode::External => RevealTrigger::External(self.external_event.clone()),
            RevealMode::InView => RevealTrigger::InView(self.threshold),
        };
        RevealConfig {
            trigger,
            line_tolerance: self.line_tolerance,
            resize_debounce: Duration::from_millis(self.resize_debounce_ms),
            ..RevealConfig::default()
        }
    }
}
