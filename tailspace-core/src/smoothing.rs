//! Parameter slewing.
//!
//! Control values arrive once per block; gains applied per sample are slewed
//! towards them so a jump in `mix` or `width` does not produce zipper noise.

use core::fmt::Debug;

use crate::dsp::one_pole_coeff_ms;

/// One-pole slew/smoother: `y += (target - y) * (1 - a)`
///
/// with `a = one_pole_coeff_ms(t_ms, sr)`.
#[derive(Copy, Clone, Debug)]
pub struct SlewLimiter {
    alpha: f32,
    target: f32,
    y: f32,
}

impl SlewLimiter {
    #[inline]
    pub fn new(t_ms: f32, sr: f32) -> Self {
        Self { alpha: one_pole_coeff_ms(t_ms, sr), target: 0.0, y: 0.0 }
    }

    #[inline]
    pub fn set_time_ms(&mut self, t_ms: f32, sr: f32) {
        self.alpha = one_pole_coeff_ms(t_ms, sr);
    }

    #[inline] pub fn set_target(&mut self, target: f32) { self.target = target; }

    /// Jump straight to the current target.
    #[inline] pub fn snap(&mut self) { self.y = self.target; }

    #[inline]
    pub fn reset(&mut self, y0: f32) {
        self.target = y0;
        self.y = y0;
    }

    /// Advance one sample towards the target.
    #[inline]
    pub fn next(&mut self) -> f32 {
        self.y += (self.target - self.y) * (1.0 - self.alpha);
        self.y
    }

    #[inline] pub fn value(&self) -> f32 { self.y }
    #[inline] pub fn target(&self) -> f32 { self.target }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slew_moves_towards_target() {
        let sr = 48000.0;
        let mut s = SlewLimiter::new(50.0, sr);
        s.set_target(1.0);
        for _ in 0..(sr as usize) { s.next(); }
        assert!(s.value() > 0.9);
    }

    #[test]
    fn snap_jumps_immediately() {
        let mut s = SlewLimiter::new(100.0, 44100.0);
        s.set_target(0.3);
        s.snap();
        assert_eq!(s.value(), 0.3);
        assert_eq!(s.next(), 0.3);
    }

    #[test]
    fn zero_time_is_instant() {
        let mut s = SlewLimiter::new(0.0, 44100.0);
        s.set_target(-0.7);
        assert_eq!(s.next(), -0.7);
    }
}
