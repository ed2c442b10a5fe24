//! Error types for the reverb engine.
//!
//! Only construction, reconfiguration and control-message parsing can fail.
//! Nothing on the audio path returns an error.

use thiserror::Error;

/// Engine error type
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid sample rate: {0} Hz (must be > 0 and <= 768000)")]
    InvalidSampleRate(f32),

    #[error("max sample rate {max} Hz is below the sample rate {rate} Hz")]
    MaxSampleRateBelowRate { rate: f32, max: f32 },

    #[error("sample rate {rate} Hz exceeds the pre-sized maximum of {max} Hz")]
    SampleRateAboveMax { rate: f32, max: f32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed control message: {0}")]
    Message(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = core::result::Result<T, EngineError>;
