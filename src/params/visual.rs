//! Visualizer selection and tuning.

use serde::{Deserialize, Serialize};

use crate::visualizer::VisualizerKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerParams {
    /// Strategy active at startup
    pub active: VisualizerKind,

    /// Peak tracker step toward each new peak (fraction, (0, 1]).
    /// 1.0 follows the raw peak; lower values trade lag for less flicker.
    pub peak_smoothing: f64,

    /// Bass meter hue (degrees). 30° = 360/12, orange.
    pub bass_hue_deg: f64,
}

impl Default for VisualizerParams {
    fn default() -> Self {
        Self {
            active: VisualizerKind::Rainbow,
            peak_smoothing: 0.3,
            bass_hue_deg: 30.0,
        }
    }
}

impl VisualizerParams {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.peak_smoothing > 0.0 && self.peak_smoothing <= 1.0) {
            return Err(format!(
                "Peak smoothing must be in (0, 1], got {}",
                self.peak_smoothing
            ));
        }
        if !self.bass_hue_deg.is_finite() {
            return Err("Bass hue must be finite".to_string());
        }
        Ok(())
    }
}
