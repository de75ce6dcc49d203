//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::params::AppConfig;
use crate::visualizer::VisualizerKind;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "stripwave")]
#[command(about = "Audio-reactive LED strip driver (UDP)", long_about = None)]
pub struct Args {
    /// TOML config file; flags below override its values
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Number of LEDs on the strip
    #[arg(long, value_name = "COUNT")]
    pub leds: Option<usize>,

    /// Number of spectrum bars
    #[arg(long, value_name = "COUNT")]
    pub bars: Option<usize>,

    /// Strip controller address (host:port)
    #[arg(long, value_name = "ADDR")]
    pub sink: Option<String>,

    /// Visualizer active at startup
    #[arg(long, value_enum, value_name = "NAME")]
    pub visualizer: Option<VisualizerKind>,

    /// Input device name (default: host default input)
    #[arg(long, value_name = "NAME")]
    pub device: Option<String>,

    /// Capture sample rate (Hz)
    #[arg(long, value_name = "HZ")]
    pub sample_rate: Option<u32>,

    /// Frames per audio buffer (one LED frame each)
    #[arg(long, value_name = "FRAMES")]
    pub frames: Option<u32>,

    /// Replay a WAV file instead of capturing live audio
    #[arg(long, value_name = "PATH")]
    pub replay: Option<PathBuf>,

    /// List input devices and exit
    #[arg(long)]
    pub list_devices: bool,

    /// Default log level (RUST_LOG overrides)
    #[arg(long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Load the config file (or defaults) and apply flag overrides
    pub fn load_config(&self) -> crate::Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Overwrite config values with any flags that were given
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(leds) = self.leds {
            config.strip.led_count = leds;
        }
        if let Some(bars) = self.bars {
            config.strip.bar_count = bars;
        }
        if let Some(sink) = &self.sink {
            config.strip.sink = sink.clone();
        }
        if let Some(kind) = self.visualizer {
            config.visualizer.active = kind;
        }
        if let Some(device) = &self.device {
            config.capture.device = Some(device.clone());
        }
        if let Some(rate) = self.sample_rate {
            config.capture.sample_rate_hz = rate;
        }
        if let Some(frames) = self.frames {
            config.capture.frames_per_buffer = frames;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_no_flags_keeps_defaults() {
        let args = Args::parse_from(["stripwave"]);
        let config = args.load_config().unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(args.log_level, "info");
        assert!(!args.list_devices);
    }

    #[test]
    fn test_flags_override() {
        let args = Args::parse_from([
            "stripwave",
            "--leds",
            "60",
            "--sink",
            "127.0.0.1:9000",
            "--visualizer",
            "bass",
            "--frames",
            "735",
        ]);
        let config = args.load_config().unwrap();

        assert_eq!(config.strip.led_count, 60);
        assert_eq!(config.strip.sink, "127.0.0.1:9000");
        assert_eq!(config.visualizer.active, VisualizerKind::BassIntensity);
        assert_eq!(config.capture.frames_per_buffer, 735);
        assert_eq!(config.strip.bar_count, 75);
    }

    #[test]
    fn test_flags_win_over_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[strip]\nled_count = 30\nbar_count = 20").unwrap();

        let path = file.path().to_str().unwrap();
        let args = Args::parse_from(["stripwave", "--config", path, "--leds", "90"]);
        let config = args.load_config().unwrap();

        assert_eq!(config.strip.led_count, 90);
        assert_eq!(config.strip.bar_count, 20);
    }

    #[test]
    fn test_unknown_visualizer_rejected() {
        assert!(Args::try_parse_from(["stripwave", "--visualizer", "strobe"]).is_err());
    }
}
