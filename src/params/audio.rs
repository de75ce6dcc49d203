//! Audio capture and spectrum analysis configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Capture stream parameters handed to the audio engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Sample rate (Hz)
    pub sample_rate_hz: u32,

    /// Frames delivered per callback.
    /// 1470 = 44100 / 30, i.e. one LED frame every ~33 ms.
    pub frames_per_buffer: u32,

    /// Interleaved channels per frame (1 or 2)
    pub channels: u16,

    /// Input device name; `None` picks the host default
    pub device: Option<String>,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            frames_per_buffer: 44100 / 30,
            channels: 2,
            device: None,
        }
    }
}

impl CaptureConfig {
    /// Interleaved samples per buffer
    pub fn samples_per_buffer(&self) -> usize {
        self.frames_per_buffer as usize * self.channels as usize
    }

    /// Time budget for one cycle
    pub fn buffer_period(&self) -> Duration {
        buffer_period(self.frames_per_buffer as usize, self.sample_rate_hz)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        if self.frames_per_buffer == 0 {
            return Err("Frames per buffer must be > 0".to_string());
        }
        if !(1..=2).contains(&self.channels) {
            return Err(format!(
                "Channel count must be 1 or 2, got {}",
                self.channels
            ));
        }
        Ok(())
    }
}

/// Duration of `frames` frames at `sample_rate_hz`
pub(crate) fn buffer_period(frames: usize, sample_rate_hz: u32) -> Duration {
    if sample_rate_hz == 0 {
        return Duration::ZERO;
    }
    Duration::from_secs_f64(frames as f64 / sample_rate_hz as f64)
}

/// Spectral analysis tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// FFT window size per channel (power of 2).
    /// 4096 @ 44.1 kHz ≈ 10.8 Hz per bin, enough to split the bass bars.
    pub fft_size: usize,

    /// Weight of the previous bar value (0 = no smoothing, < 1)
    pub noise_reduction: f64,

    /// Band magnitudes below this are zeroed
    pub noise_gate: f64,

    /// Lowest frequency mapped to a bar (Hz)
    pub low_cutoff_hz: f64,

    /// Highest frequency mapped to a bar (Hz)
    pub high_cutoff_hz: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: 4096,
            noise_reduction: 0.2,
            noise_gate: 1e-4,
            low_cutoff_hz: 50.0,
            high_cutoff_hz: 10_000.0,
        }
    }
}

impl AnalyzerConfig {
    /// Convert frequency (Hz) to FFT bin index
    pub fn hz_to_bin(&self, hz: f64, sample_rate_hz: u32) -> usize {
        ((hz * self.fft_size as f64) / sample_rate_hz as f64) as usize
    }

    /// Number of usable (positive-frequency) bins
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate against the capture sample rate
    pub fn validate(&self, sample_rate_hz: u32) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() || self.fft_size < 64 {
            return Err(format!(
                "FFT size must be a power of 2 and >= 64, got {}",
                self.fft_size
            ));
        }
        if !(0.0..1.0).contains(&self.noise_reduction) {
            return Err(format!(
                "Noise reduction must be in [0, 1), got {}",
                self.noise_reduction
            ));
        }
        if self.noise_gate.is_nan() || self.noise_gate < 0.0 {
            return Err(format!("Noise gate must be >= 0, got {}", self.noise_gate));
        }
        let nyquist = sample_rate_hz as f64 / 2.0;
        if !(self.low_cutoff_hz > 0.0
            && self.low_cutoff_hz < self.high_cutoff_hz
            && self.high_cutoff_hz <= nyquist)
        {
            return Err(format!(
                "Cutoffs must satisfy 0 < low < high <= {} Hz, got {}..{}",
                nyquist, self.low_cutoff_hz, self.high_cutoff_hz
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hz_to_bin() {
        let config = AnalyzerConfig::default();

        // 44100 / 4096 ≈ 10.77 Hz per bin
        assert_eq!(config.hz_to_bin(0.0, 44100), 0);
        assert_eq!(config.hz_to_bin(10.7, 44100), 0);
        assert_eq!(config.hz_to_bin(10.8, 44100), 1);
        assert_eq!(config.hz_to_bin(50.0, 44100), 4);
    }

    #[test]
    fn test_buffer_period() {
        let config = CaptureConfig::default();
        let period = config.buffer_period();
        assert!((period.as_secs_f64() - 1.0 / 30.0).abs() < 1e-9);
        assert_eq!(config.samples_per_buffer(), 2940);
    }

    #[test]
    fn test_capture_validation() {
        let mut config = CaptureConfig::default();
        assert!(config.validate().is_ok());

        config.channels = 6;
        assert!(config.validate().is_err());

        config.channels = 1;
        config.frames_per_buffer = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_analyzer_validation() {
        let mut config = AnalyzerConfig::default();
        assert!(config.validate(44100).is_ok());

        config.fft_size = 1000;
        assert!(config.validate(44100).is_err());

        config.fft_size = 1024;
        config.high_cutoff_hz = 30_000.0;
        assert!(config.validate(44100).is_err());

        config.high_cutoff_hz = 10_000.0;
        config.noise_reduction = 1.0;
        assert!(config.validate(44100).is_err());

        config.noise_reduction = 0.2;
        config.noise_gate = -1e-3;
        assert!(config.validate(44100).is_err());
        config.noise_gate = f64::NAN;
        assert!(config.validate(44100).is_err());
        config.noise_gate = 0.0;
        assert!(config.validate(44100).is_ok());
    }
}
