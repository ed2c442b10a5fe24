//! Delay-based building blocks: circular delay line, damped feedback comb,
//! Schroeder all-pass and a variable pre-delay tap.
//!
//! Every block allocates its buffer exactly once, in the constructor, sized for
//! the largest length it will ever be asked to hold. `set_len`/`set_delay`
//! afterwards only move indices, so they are safe to call from the audio thread.

use alloc::vec;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::dsp::kill_denormals;
use crate::filters::OnePoleLP;

/// Fixed-capacity circular delay with a movable read tap.
///
/// Writes always cycle through the whole buffer; `set_len` only moves the tap.
/// Every slot is therefore refreshed once per `capacity` samples, so a line
/// that was shortened and later lengthened never reads stale contents.
#[derive(Clone, Debug)]
pub struct DelayLine {
    buf: Vec<f32>,
    w: usize,
    len: usize,
}

impl DelayLine {
    /// Allocate a line able to hold up to `capacity` samples (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = capacity.max(1);
        Self { buf: vec![0.0; cap], w: 0, len: cap }
    }

    /// Set the active length, clamped to `[1, capacity]`.
    #[inline]
    pub fn set_len(&mut self, len: usize) {
        self.len = len.clamp(1, self.buf.len());
    }

    #[inline] pub fn len(&self) -> usize { self.len }
    #[inline] pub fn is_empty(&self) -> bool { self.len == 0 }
    #[inline] pub fn capacity(&self) -> usize { self.buf.len() }

    /// Oldest sample, i.e. the one written `len` samples ago.
    #[inline]
    pub fn read(&self) -> f32 {
        let r = if self.w >= self.len { self.w - self.len } else { self.w + self.buf.len() - self.len };
        self.buf[r]
    }

    #[inline]
    pub fn write_advance(&mut self, x: f32) {
        self.buf[self.w] = x;
        self.w += 1;
        if self.w >= self.buf.len() { self.w = 0; }
    }

    /// Zero the contents without touching the length.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.fill(0.0);
        self.w = 0;
    }
}

/// Schroeder all-pass: `y = z - g*x`, writes `x + g*y`.
#[derive(Clone, Debug)]
pub struct Allpass {
    d: DelayLine,
    g: f32,
}

impl Allpass {
    pub fn with_capacity(capacity: usize, g: f32) -> Self {
        let mut s = Self { d: DelayLine::with_capacity(capacity), g: 0.0 };
        s.set_g(g);
        s
    }

    #[inline] pub fn set_len(&mut self, len: usize) { self.d.set_len(len); }
    #[inline] pub fn set_g(&mut self, g: f32) { self.g = g.clamp(-0.999, 0.999); }
    #[inline] pub fn clear(&mut self) { self.d.clear(); }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let z = self.d.read();
        let y = z - self.g * x;
        self.d.write_advance(kill_denormals(x + self.g * y));
        y
    }
}

/// Feedback comb with a one-pole low-pass inside the feedback path (HF damping).
#[derive(Clone, Debug)]
pub struct CombLp {
    d: DelayLine,
    fb: f32,
    lp: OnePoleLP,
}

impl CombLp {
    pub fn with_capacity(capacity: usize, sr: f32) -> Self {
        Self { d: DelayLine::with_capacity(capacity), fb: 0.7, lp: OnePoleLP::new(8000.0, sr) }
    }

    #[inline] pub fn set_len(&mut self, len: usize) { self.d.set_len(len); }
    #[inline] pub fn len(&self) -> usize { self.d.len() }
    #[inline] pub fn is_empty(&self) -> bool { self.d.is_empty() }

    /// Loop gain, clamped to `[0, 0.99]` so the comb always decays.
    #[inline] pub fn set_feedback(&mut self, fb: f32) { self.fb = fb.clamp(0.0, 0.99); }
    #[inline] pub fn set_damp_cut(&mut self, hz: f32) { self.lp.set_cutoff_hz(hz); }
    #[inline] pub fn set_sample_rate(&mut self, sr: f32) { self.lp.set_sample_rate(sr); }

    #[inline]
    pub fn clear(&mut self) {
        self.d.clear();
        self.lp.reset();
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let z = self.d.read();
        let z_damped = self.lp.process(z);
        self.d.write_advance(kill_denormals(x + self.fb * z_damped));
        z
    }
}

/// Variable-length delay tap. A delay of zero passes the input straight through.
#[derive(Clone, Debug)]
pub struct PreDelay {
    buf: Vec<f32>,
    w: usize,
    delay: usize,
}

impl PreDelay {
    /// Allocate for delays up to `max_delay` samples.
    pub fn with_max_delay(max_delay: usize) -> Self {
        Self { buf: vec![0.0; max_delay + 1], w: 0, delay: 0 }
    }

    #[inline] pub fn max_delay(&self) -> usize { self.buf.len() - 1 }
    #[inline] pub fn delay(&self) -> usize { self.delay }

    /// Set the delay in samples, clamped to [`max_delay`](Self::max_delay).
    #[inline]
    pub fn set_delay(&mut self, samples: usize) {
        self.delay = samples.min(self.max_delay());
    }

    #[inline]
    pub fn clear(&mut self) {
        self.buf.fill(0.0);
        self.w = 0;
    }

    #[inline]
    pub fn process(&mut self, x: f32) -> f32 {
        let cap = self.buf.len();
        self.buf[self.w] = x;
        let r = if self.w >= self.delay { self.w - self.delay } else { self.w + cap - self.delay };
        let y = self.buf[r];
        self.w += 1;
        if self.w >= cap { self.w = 0; }
        y
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_line_delays_by_len() {
        let mut d = DelayLine::with_capacity(16);
        d.set_len(4);
        let mut out = [0.0f32; 8];
        for (n, y) in out.iter_mut().enumerate() {
            *y = d.read();
            d.write_advance(if n == 0 { 1.0 } else { 0.0 });
        }
        assert_eq!(out, [0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn set_len_is_clamped_to_capacity() {
        let mut d = DelayLine::with_capacity(8);
        d.set_len(100);
        assert_eq!(d.len(), 8);
        d.set_len(0);
        assert_eq!(d.len(), 1);
    }

    #[test]
    fn shrinking_then_growing_reads_no_stale_samples() {
        let mut d = DelayLine::with_capacity(8);
        for n in 0..8 {
            d.write_advance(n as f32 + 1.0);
        }
        d.set_len(4);
        for _ in 0..8 {
            d.write_advance(0.0);
        }
        d.set_len(8);
        for _ in 0..8 {
            assert_eq!(d.read(), 0.0);
            d.write_advance(0.0);
        }
    }

    #[test]
    fn comb_regrown_after_decay_stays_silent() {
        let mut c = CombLp::with_capacity(64, 48000.0);
        c.set_len(64);
        c.set_feedback(0.5);
        c.set_damp_cut(20000.0);
        for n in 0..640 {
            c.process(if n % 2 == 0 { 0.8 } else { -0.8 });
        }
        c.set_len(16);
        for _ in 0..20_000 {
            c.process(0.0);
        }
        c.set_len(64);
        for n in 0..2000 {
            assert_eq!(c.process(0.0), 0.0, "n={n}");
        }
    }

    #[test]
    fn allpass_preserves_energy_of_an_impulse() {
        let mut ap = Allpass::with_capacity(64, 0.5);
        ap.set_len(37);
        let mut e = 0.0f32;
        for n in 0..20_000 {
            let y = ap.process(if n == 0 { 1.0 } else { 0.0 });
            e += y * y;
        }
        assert!((e - 1.0).abs() < 1e-3, "energy={e}");
    }

    #[test]
    fn comb_decays_and_clear_silences() {
        let mut c = CombLp::with_capacity(128, 48000.0);
        c.set_len(100);
        c.set_feedback(0.9);
        c.set_damp_cut(4000.0);
        let mut last_peak = 0.0f32;
        for n in 0..50_000 {
            let y = c.process(if n == 0 { 1.0 } else { 0.0 });
            if n > 40_000 { last_peak = last_peak.max(y.abs()); }
        }
        assert!(last_peak < 1e-6, "peak={last_peak}");

        c.process(1.0);
        c.clear();
        for _ in 0..200 {
            assert_eq!(c.process(0.0), 0.0);
        }
    }

    #[test]
    fn comb_feedback_is_clamped_below_unity() {
        let mut c = CombLp::with_capacity(8, 48000.0);
        c.set_len(8);
        c.set_feedback(5.0);
        c.set_damp_cut(24000.0);
        let mut y = 0.0;
        for n in 0..200_000 {
            y = c.process(if n == 0 { 1.0 } else { 0.0 });
        }
        assert!(y.abs() < 1e-3, "y={y}");
    }

    #[test]
    fn pre_delay_taps_the_requested_sample() {
        let mut p = PreDelay::with_max_delay(10);
        p.set_delay(3);
        let out: Vec<f32> = (0..6).map(|n| p.process(n as f32 + 1.0)).collect();
        assert_eq!(out, vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0]);

        p.set_delay(0);
        assert_eq!(p.process(9.0), 9.0);

        p.set_delay(1000);
        assert_eq!(p.delay(), 10);
    }
}
