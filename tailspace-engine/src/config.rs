//! Construction-time configuration.
//!
//! Everything here is fixed for the lifetime of an engine instance: it decides
//! how large the internal buffers are. Runtime-tweakable values live in
//! [`ReverbParams`](crate::params::ReverbParams).
//!
//! The config deserializes from the same camelCase keys the host uses for
//! control messages, so it can arrive in the processor options object:
//!
//! ```
//! let cfg: tailspace_engine::EngineConfig =
//!     serde_json::from_str(r#"{ "sampleRate": 48000, "maxSampleRate": 96000 }"#).unwrap();
//! assert_eq!(cfg.effective_max_sample_rate(), 96000.0);
//! ```

use serde::Deserialize;

use crate::error::{EngineError, Result};

/// Upper bound for the pre-delay range (ms) unless overridden.
pub const DEFAULT_MAX_PREDELAY_MS: f32 = 500.0;

/// Gain slew time used for `mix` and `width` changes.
pub const DEFAULT_SMOOTHING_MS: f32 = 10.0;

/// Slots in the real-time diagnostics ring.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Highest sample rate any buffer is ever sized for.
pub const MAX_SAMPLE_RATE: f32 = 768_000.0;

/// Ceiling for `maxPredelayMs`.
pub const MAX_PREDELAY_LIMIT_MS: f32 = 10_000.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineConfig {
    /// Initial sample rate in Hz.
    pub sample_rate: f32,
    /// Largest sample rate the buffers are sized for; `None` means `sample_rate`.
    #[serde(default)]
    pub max_sample_rate: Option<f32>,
    #[serde(default = "default_max_predelay_ms")]
    pub max_predelay_ms: f32,
    #[serde(default = "default_smoothing_ms")]
    pub smoothing_ms: f32,
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_max_predelay_ms() -> f32 { DEFAULT_MAX_PREDELAY_MS }
fn default_smoothing_ms() -> f32 { DEFAULT_SMOOTHING_MS }
fn default_event_capacity() -> usize { DEFAULT_EVENT_CAPACITY }

impl EngineConfig {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            max_sample_rate: None,
            max_predelay_ms: DEFAULT_MAX_PREDELAY_MS,
            smoothing_ms: DEFAULT_SMOOTHING_MS,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    pub fn with_max_sample_rate(mut self, max: f32) -> Self {
        self.max_sample_rate = Some(max);
        self
    }

    pub fn with_max_predelay_ms(mut self, ms: f32) -> Self {
        self.max_predelay_ms = ms;
        self
    }

    pub fn with_smoothing_ms(mut self, ms: f32) -> Self {
        self.smoothing_ms = ms;
        self
    }

    pub fn with_event_capacity(mut self, slots: usize) -> Self {
        self.event_capacity = slots;
        self
    }

    #[inline]
    pub fn effective_max_sample_rate(&self) -> f32 {
        self.max_sample_rate.unwrap_or(self.sample_rate)
    }

    /// Check every field; the engine is only ever built from a validated config.
    pub fn validate(&self) -> Result<()> {
        check_sample_rate(self.sample_rate)?;
        let max = self.effective_max_sample_rate();
        check_sample_rate(max)?;
        if max < self.sample_rate {
            return Err(EngineError::MaxSampleRateBelowRate { rate: self.sample_rate, max });
        }
        if !(0.0..=MAX_PREDELAY_LIMIT_MS).contains(&self.max_predelay_ms) {
            return Err(EngineError::InvalidConfig(format!(
                "maxPredelayMs must be within 0..={MAX_PREDELAY_LIMIT_MS}, got {}",
                self.max_predelay_ms
            )));
        }
        if !self.smoothing_ms.is_finite() || self.smoothing_ms < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "smoothingMs must be finite and >= 0, got {}",
                self.smoothing_ms
            )));
        }
        if self.event_capacity == 0 {
            return Err(EngineError::InvalidConfig("eventCapacity must be at least 1".into()));
        }
        Ok(())
    }
}

/// A usable sample rate is strictly positive and at most [`MAX_SAMPLE_RATE`].
pub(crate) fn check_sample_rate(rate: f32) -> Result<()> {
    if rate > 0.0 && rate <= MAX_SAMPLE_RATE {
        Ok(())
    } else {
        Err(EngineError::InvalidSampleRate(rate))
    }
}
