//! Top-level configuration and TOML loading.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{AnalyzerConfig, CaptureConfig, StripConfig, VisualizerParams};
use crate::error::{Error, Result};

/// Everything the process needs, fixed for its lifetime.
///
/// File layout:
///
/// ```toml
/// stats_interval_secs = 10
///
/// [strip]
/// led_count = 150
/// bar_count = 75
/// sink = "192.168.0.122:1337"
///
/// [audio]
/// sample_rate_hz = 44100
/// frames_per_buffer = 1470
/// channels = 2
///
/// [analyzer]
/// noise_reduction = 0.2
/// low_cutoff_hz = 50.0
/// high_cutoff_hz = 10000.0
///
/// [visualizer]
/// active = "rainbow"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub strip: StripConfig,

    #[serde(rename = "audio")]
    pub capture: CaptureConfig,

    pub analyzer: AnalyzerConfig,

    pub visualizer: VisualizerParams,

    /// Interval between pipeline stats reports (seconds, 0 = off)
    pub stats_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            strip: StripConfig::default(),
            capture: CaptureConfig::default(),
            analyzer: AnalyzerConfig::default(),
            visualizer: VisualizerParams::default(),
            stats_interval_secs: 10,
        }
    }
}

impl AppConfig {
    /// Read a TOML file; keys it leaves out keep their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn stats_interval(&self) -> Option<Duration> {
        (self.stats_interval_secs > 0).then(|| Duration::from_secs(self.stats_interval_secs))
    }

    /// Check every section; any failure is fatal before audio starts
    pub fn validate(&self) -> Result<()> {
        self.strip.validate().map_err(Error::Config)?;
        self.capture.validate().map_err(Error::Config)?;
        self.analyzer
            .validate(self.capture.sample_rate_hz)
            .map_err(Error::Config)?;
        self.visualizer.validate().map_err(Error::Config)?;

        if self.strip.bar_count < self.capture.channels as usize {
            return Err(Error::Config(format!(
                "Bar count ({}) must be at least the channel count ({})",
                self.strip.bar_count, self.capture.channels
            )));
        }
        Ok(())
    }
}
