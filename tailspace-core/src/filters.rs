//! Filters: lightweight one-poles for damping and low-cut duties.
//!
//! Contents
//! - `OnePoleLP`  : "RC-style" one-pole low-pass (comb feedback damping)
//! - `OnePoleHP`  : leaky-integrator one-pole high-pass (reverb input low-cut)
//!
//! Notes
//! - Both use the pole `b = exp(-2π fc / sr)` from [`one_pole_coeff_hz`].
//! - Cutoff changes only recompute the coefficient; filter state is preserved,
//!   so parameter sweeps do not click.

use crate::dsp::{kill_denormals, one_pole_coeff_hz};
use core::fmt::Debug;

/// One-pole low-pass `y += a * (x - y)`.
///
/// `a` is derived from cutoff (Hz) and sample rate:
/// `a = 1 - exp(-2π * fc / sr)`.
#[derive(Copy, Clone, Debug)]
pub struct OnePoleLP {
    a: f32,
    y: f32,
    sr: f32,
    fc: f32,
}

impl OnePoleLP {
    /// Create a low-pass with cutoff `cut_hz` and sample rate `sr`.
    #[inline]
    pub fn new(cut_hz: f32, sr: f32) -> Self {
        let mut s = Self {
            a: 0.0,
            y: 0.0,
            sr: sr.max(1.0),
            fc: cut_hz.max(0.0),
        };
        s.update_coeffs();
        s
    }

    #[inline]
    pub fn set_sample_rate(&mut self, sr: f32) {
        self.sr = sr.max(1.0);
        self.update_coeffs();
    }

    #[inline]
    pub fn set_cutoff_hz(&mut self, cut_hz: f32) {
        self.fc = cut_hz.max(0.0);
        self.update_coeffs();
    }

    #[inline]
    fn update_coeffs(&mut self) {
        self.a = 1.0 - one_pole_coeff_hz(self.fc, self.sr);
    }

    /// Process one sample.
    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        self.y += self.a * (x - self.y);
        self.y = kill_denormals(self.y);
        self.y
    }

    #[inline] pub fn reset(&mut self) { self.y = 0.0; }
    #[inline] pub fn value(&self) -> f32 { self.y }
    #[inline] pub fn cutoff_hz(&self) -> f32 { self.fc }
}

/// One-pole high-pass using the "leaky integrator" form:
///
/// Difference equation:
/// `y[n] = x[n] - x[n-1] + b * y[n-1]`, with `b = exp(-2π fc / sr)`.
#[derive(Copy, Clone, Debug)]
pub struct OnePoleHP {
    b: f32,
    x1: f32,
    y1: f32,
    sr: f32,
    fc: f32,
}

impl OnePoleHP {
    #[inline]
    pub fn new(cut_hz: f32, sr: f32) -> Self {
        let mut s = Self {
            b: 0.0,
            x1: 0.0,
            y1: 0.0,
            sr: sr.max(1.0),
            fc: cut_hz.max(0.0),
        };
        s.update_coeffs();
        s
    }

    #[inline] pub fn set_sample_rate(&mut self, sr: f32) { self.sr = sr.max(1.0); self.update_coeffs(); }
    #[inline] pub fn set_cutoff_hz(&mut self, cut_hz: f32) { self.fc = cut_hz.max(0.0); self.update_coeffs(); }

    #[inline]
    fn update_coeffs(&mut self) {
        self.b = one_pole_coeff_hz(self.fc, self.sr);
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let y = kill_denormals(x - self.x1 + self.b * self.y1);
        self.x1 = x;
        self.y1 = y;
        y
    }

    #[inline] pub fn reset(&mut self) { self.x1 = 0.0; self.y1 = 0.0; }
    #[inline] pub fn value(&self) -> f32 { self.y1 }
    #[inline] pub fn cutoff_hz(&self) -> f32 { self.fc }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_pole_lp_moves_towards_input() {
        let sr = 48000.0;
        let mut lp = OnePoleLP::new(1000.0, sr);
        let mut y = 0.0;
        for _ in 0..(sr as usize) {
            y = lp.process(1.0);
        }
        assert!(y > 0.9, "y={}", y);
    }

    #[test]
    fn one_pole_hp_blocks_dc() {
        let sr = 48000.0;
        let mut hp = OnePoleHP::new(20.0, sr);
        let mut y = 0.0;
        for _ in 0..(sr as usize) {
            y = hp.process(1.0);
        }
        assert!(y.abs() < 1e-2, "y={}", y);
    }

    #[test]
    fn higher_low_cut_removes_more_lows() {
        let sr = 48000.0;
        let mut gentle = OnePoleHP::new(20.0, sr);
        let mut steep = OnePoleHP::new(2000.0, sr);
        // 50 Hz square-ish test tone, summed energy after settling
        let (mut e_gentle, mut e_steep) = (0.0f32, 0.0f32);
        for n in 0..(sr as usize / 2) {
            let x = if (n / 480) % 2 == 0 { 0.5 } else { -0.5 };
            let a = gentle.process(x);
            let b = steep.process(x);
            if n > 4800 {
                e_gentle += a * a;
                e_steep += b * b;
            }
        }
        assert!(e_steep < e_gentle, "steep={e_steep} gentle={e_gentle}");
    }

    #[test]
    fn reset_clears_state() {
        let mut lp = OnePoleLP::new(500.0, 44100.0);
        for _ in 0..100 { lp.process(1.0); }
        lp.reset();
        assert_eq!(lp.value(), 0.0);

        let mut hp = OnePoleHP::new(500.0, 44100.0);
        for _ in 0..100 { hp.process(1.0); }
        hp.reset();
        assert_eq!(hp.value(), 0.0);
    }
}
