//! Parameter definitions with units and documented defaults.
//!
//! Everything is loaded once at startup and never mutated afterwards.
//! Defaults reproduce the reference rig: a 150-LED strip fed over UDP
//! from 44.1 kHz stereo capture at 30 buffers per second.

mod app;
mod audio;
mod strip;
mod visual;

// Re-export all types
pub use app::AppConfig;
pub use audio::{AnalyzerConfig, CaptureConfig};
pub(crate) use audio::buffer_period;
pub use strip::{StripConfig, MAX_DATAGRAM_BYTES};
pub use visual::VisualizerParams;
