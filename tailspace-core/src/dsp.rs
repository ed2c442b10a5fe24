//! Generic DSP utilities and math helpers.
//!
//! Design goals:
//! - `no_std` ready (guarded by the crate feature `no-std`)
//! - Math backend selection that works in both `std` and `no_std` contexts
//! - Optional `fast-math` approximation for coefficient maths
//! - Side-effect free helpers that are easy to test
//!
//! Conventions:
//! - All functions are `#[inline]` where useful to help the optimizer.
//! - Argument and return domains are documented per function.

#![allow(clippy::excessive_precision)]

use core::f32::consts::PI;

use cfg_if::cfg_if;

// ----------------------------- Math backend selection -----------------------------

cfg_if! {
    // micromath preferred if explicitly requested (works in no_std)
    if #[cfg(feature = "micromath")] {
        use micromath::F32Ext as _;
        #[inline] fn m_exp(x: f32) -> f32 { x.exp() }
        #[inline] fn m_ln(x: f32) -> f32 { x.ln() }
    // libm (C math) in no_std
    } else if #[cfg(feature = "no-std")] {
        #[inline] fn m_exp(x: f32) -> f32 { libm::expf(x) }
        #[inline] fn m_ln(x: f32) -> f32 { libm::logf(x) }
    // std backend
    } else {
        #[inline] fn m_exp(x: f32) -> f32 { x.exp() }
        #[inline] fn m_ln(x: f32) -> f32 { x.ln() }
    }
}

// --------------------------------- Constants -------------------------------------

/// Magnitude below which feedback state is flushed to exact zero (~ -300 dBFS).
pub const DENORMAL_FLOOR: f32 = 1.0e-15;

// --------------------------------- Utilities -------------------------------------

/// Clamp `x` into `[lo, hi]`. NaN passes through unchanged; callers that must
/// reject NaN check `is_nan()` first.
#[inline]
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    if x < lo { lo } else if x > hi { hi } else { x }
}

#[inline]
pub fn abs(x: f32) -> f32 {
    if x < 0.0 { -x } else { x }
}

/// Flush subnormal-range values to zero. Returns 0.0 if |x| < [`DENORMAL_FLOOR`].
#[inline]
pub fn kill_denormals(x: f32) -> f32 {
    if abs(x) < DENORMAL_FLOOR { 0.0 } else { x }
}

/// Exponential interpolation between two positive values:
/// `lo * (hi / lo)^t`, with `t` clamped to [0, 1].
///
/// Used for perceptually even frequency sweeps (e.g. damping cutoff).
#[inline]
pub fn log_interp(lo: f32, hi: f32, t: f32) -> f32 {
    let lo = lo.max(1.0e-6);
    let hi = hi.max(lo);
    lo * m_exp(clamp(t, 0.0, 1.0) * m_ln(hi / lo))
}

/// Convert a time in milliseconds to a whole number of samples (rounded down).
/// Negative or NaN times map to zero.
#[inline]
pub fn ms_to_samples(ms: f32, sr: f32) -> usize {
    let n = ms * sr / 1000.0;
    if n > 0.0 { n as usize } else { 0 }
}

// --------------------------------- Exponentials / coefficients --------------------

/// One-pole smoothing coefficient for a time constant `t_ms` (milliseconds).
///
/// The discrete one-pole form: `y[n] += (1 - a) * (x[n] - y[n])`
/// where `a = exp(-1/(tau * sr))` for first-order lag with time constant `tau`.
#[inline]
pub fn one_pole_coeff_ms(t_ms: f32, sr: f32) -> f32 {
    if t_ms <= 0.0 || t_ms.is_nan() { return 0.0; }
    let tau = t_ms * 0.001;
    m_exp(-1.0 / (tau * sr))
}

/// Pole position `exp(-2π fc / sr)` for an "RC" style one-pole.
/// `cut_hz` is clamped to `[0, 0.499 * sr]`.
#[inline]
pub fn one_pole_coeff_hz(cut_hz: f32, sr: f32) -> f32 {
    let fc = clamp(cut_hz, 0.0, 0.499 * sr);
    let x = 2.0 * PI * fc / sr;
    cfg_if! {
        if #[cfg(feature = "fast-math")] {
            // (2,2) Padé approximant of exp(-x); error < 1e-3 for x <= 1.5
            let x2 = x * x;
            (12.0 - 6.0 * x + x2) / (12.0 + 6.0 * x + x2)
        } else {
            m_exp(-x)
        }
    }
}

// --------------------------------- Block scans -----------------------------------

/// `true` if every sample of `buf` is finite (no NaN, no ±∞).
#[inline]
pub fn all_finite(buf: &[f32]) -> bool {
    cfg_if! {
        if #[cfg(feature = "simd")] {
            use wide::f32x4;
            // x - x is 0 for finite x and NaN otherwise; NaN survives the sum.
            let mut acc = f32x4::ZERO;
            let mut chunks = buf.chunks_exact(4);
            for c in &mut chunks {
                let v = f32x4::from([c[0], c[1], c[2], c[3]]);
                acc += v - v;
            }
            let tail_ok = chunks.remainder().iter().all(|x| x.is_finite());
            tail_ok && acc.reduce_add() == 0.0
        } else {
            buf.iter().all(|x| x.is_finite())
        }
    }
}

/// Sum of squares of `buf` (signal energy).
#[inline]
pub fn energy(buf: &[f32]) -> f32 {
    cfg_if! {
        if #[cfg(feature = "simd")] {
            use wide::f32x4;
            let mut acc = f32x4::ZERO;
            let mut chunks = buf.chunks_exact(4);
            for c in &mut chunks {
                let v = f32x4::from([c[0], c[1], c[2], c[3]]);
                acc += v * v;
            }
            acc.reduce_add() + chunks.remainder().iter().map(|x| x * x).sum::<f32>()
        } else {
            buf.iter().map(|x| x * x).sum()
        }
    }
}

// --------------------------------- Tests (std only) ------------------------------
