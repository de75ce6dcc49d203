//! Stripwave library - audio-reactive LED strip driver
//!
//! Captured audio is turned into frequency bars, the bars into one RGB
//! frame for the whole strip, and the frame into a single UDP datagram,
//! once per audio buffer.

pub mod audio;
pub mod cli;
pub mod color;
pub mod control;
pub mod error;
pub mod led;
pub mod logging;
pub mod params;
pub mod pipeline;
pub mod spectrum;
pub mod transport;
pub mod visualizer;

pub use error::{Error, Result};
pub use pipeline::{CycleOutcome, FramePipeline, PipelineState, PipelineStats, StatsSnapshot};
pub use visualizer::{ActiveVisualizer, Visualizer, VisualizerKind};
