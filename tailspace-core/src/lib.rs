#![cfg_attr(not(feature = "std"), no_std)]
//! Tailspace Core: no_std-ready DSP primitives for the reverb engine.
//!
//! Features
//! - `std`      : (default) use the Rust standard library
//! - `no-std`   : build with `#![no_std]` + `alloc` and use `libm`/`micromath` math backends
//! - `fast-math`: Padé approximation of `exp` in one-pole coefficient maths
//! - `simd`     : enable `wide` code paths for block scans
//!
//! Modules
//! - [`dsp`]       : math backend, clamping, denormal flushing, coefficient helpers, block scans
//! - [`filters`]   : one-pole LP/HP
//! - [`delay`]     : delay lines, damped combs, all-passes, pre-delay tap
//! - [`smoothing`] : slew limiter for per-sample gain ramps
//!
//! Design
//! - Buffers are allocated once at construction and never resized afterwards
//! - Per-sample `process`/`tick` calls never allocate, lock, or branch on I/O
//! - Feedback states are flushed to exact zero before they go subnormal

extern crate alloc;

pub mod delay;
pub mod dsp;
pub mod filters;
pub mod smoothing;

/// Commonly used types/functions for convenience:
pub mod prelude {
    pub use crate::delay::{Allpass, CombLp, DelayLine, PreDelay};
    pub use crate::dsp::{
        all_finite, clamp, energy, kill_denormals, ms_to_samples, one_pole_coeff_hz,
        one_pole_coeff_ms, DENORMAL_FLOOR,
    };
    pub use crate::filters::{OnePoleHP, OnePoleLP};
    pub use crate::smoothing::SlewLimiter;
}
