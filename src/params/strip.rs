//! LED strip and sink parameters.

use serde::{Deserialize, Serialize};

use crate::led::BYTES_PER_LED;

/// Largest UDP payload over IPv4
pub const MAX_DATAGRAM_BYTES: usize = 65_507;

/// Strip geometry and where frames go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StripConfig {
    /// LED slots on the strip
    pub led_count: usize,

    /// Frequency bars requested from the analyzer.
    /// Defaults to half the LED count; any value ≥ the channel
    /// count works, each visualizer maps bars onto LEDs itself.
    pub bar_count: usize,

    /// Sink address, `host:port`
    pub sink: String,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            led_count: 150,
            bar_count: 75,
            sink: "192.168.0.122:1337".to_string(),
        }
    }
}

impl StripConfig {
    /// Size of one wire frame (bytes)
    pub fn frame_len(&self) -> usize {
        self.led_count * BYTES_PER_LED
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.led_count < 2 {
            return Err(format!("LED count must be >= 2, got {}", self.led_count));
        }
        if self.frame_len() > MAX_DATAGRAM_BYTES {
            return Err(format!(
                "{} LEDs need {} bytes per frame, more than one datagram ({} bytes)",
                self.led_count,
                self.frame_len(),
                MAX_DATAGRAM_BYTES
            ));
        }
        if self.bar_count == 0 {
            return Err("Bar count must be > 0".to_string());
        }
        if self.sink.trim().is_empty() {
            return Err("Sink address must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = StripConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.frame_len(), 450);
    }

    #[test]
    fn test_rejects_degenerate_strips() {
        let mut config = StripConfig {
            led_count: 1,
            ..StripConfig::default()
        };
        assert!(config.validate().is_err());

        config.led_count = 30_000;
        assert!(config.validate().unwrap_err().contains("datagram"));

        config.led_count = 10;
        config.bar_count = 0;
        assert!(config.validate().is_err());
    }
}
