//! Error types.
//!
//! Only startup can fail loudly. Errors raised inside a cycle are absorbed
//! by the pipeline and surface as counters and log events.

use thiserror::Error;

/// Startup and I/O errors
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid parameter value or unusable sink address
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Audio device or stream failure
    #[error("Audio error: {0}")]
    Audio(String),

    /// WAV replay input could not be read
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Spectral transform failure; the cycle is skipped
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("malformed input: {len} samples for {channels} channel(s)")]
    MalformedInput { len: usize, channels: usize },
}

/// Frame delivery failure; the strip keeps its previous frame
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("send failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("short send: {sent} of {expected} bytes")]
    Truncated { sent: usize, expected: usize },
}

/// Result type for startup operations
pub type Result<T> = std::result::Result<T, Error>;
