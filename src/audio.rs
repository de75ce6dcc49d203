//! Audio collaborators: capture, file replay and spectrum analysis.
//!
//! Capture and replay both play the role of the audio engine: they own
//! the [`FramePipeline`](crate::pipeline::FramePipeline) and call it once
//! per buffer from their own thread.

mod fft;
mod system;
mod wav;

// Re-export public types
pub use fft::{hann_window, BarAnalyzer, SpectrumAnalyzer};
pub use system::AudioCapture;
pub use wav::WavReplay;
