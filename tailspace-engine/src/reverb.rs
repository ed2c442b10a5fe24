//! Stereo Freeverb-style reverb kernel (no allocation after construction).
//!
//! Design
//! - Topology: input sum → low-cut → pre-delay → 8 parallel damped combs per
//!   channel → 4 series all-passes per channel → width matrix → wet/dry.
//! - Comb and all-pass tunings are the classic 44.1 kHz Freeverb values, scaled
//!   to the running rate; the right channel is offset by a fixed spread so the
//!   two tails decorrelate.
//! - Buffers are sized once for `max_sample_rate` (and the longest room), so
//!   `reset` to any rate up to that maximum only moves indices.
//!
//! ```text
//!  L ─┐                        ┌─ combs L ×8 ─ all-pass L ×4 ─┐   ┌─ wet1·L + wet2·R + dry·inL
//!     ├─ sum·g ─ HP ─ predelay ┤                              ├───┤
//!  R ─┘                        └─ combs R ×8 ─ all-pass R ×4 ─┘   └─ wet1·R + wet2·L + dry·inR
//! ```

use core::array;
use core::fmt::Debug;

use tailspace_core::delay::{Allpass, CombLp, PreDelay};
use tailspace_core::dsp::{log_interp, ms_to_samples};
use tailspace_core::filters::OnePoleHP;
use tailspace_core::smoothing::SlewLimiter;

use crate::engine::StereoKernel;
use crate::params::ParamSnapshot;

const NUM_COMBS: usize = 8;
const NUM_ALLPASSES: usize = 4;

/// Comb lengths at 44.1 kHz (mutually prime-ish).
const COMB_TUNINGS_44K: [usize; NUM_COMBS] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
/// All-pass lengths at 44.1 kHz.
const ALLPASS_TUNINGS_44K: [usize; NUM_ALLPASSES] = [556, 441, 341, 225];
/// Right-channel length offset at 44.1 kHz.
const STEREO_SPREAD_44K: usize = 23;
const REFERENCE_RATE: f32 = 44100.0;

/// Input attenuation before the 8-way comb sum.
const FIXED_GAIN: f32 = 0.015;
/// Restores level after `FIXED_GAIN`.
const WET_SCALE: f32 = 3.0;

/// `feedback = ROOM_OFFSET + ROOM_SCALE * roomSize` → 0.70 ..= 0.98
const ROOM_OFFSET: f32 = 0.7;
const ROOM_SCALE: f32 = 0.28;
/// `comb length = tuning * (LEN_OFFSET + LEN_SCALE * roomSize)` → 60 % ..= 100 %
const LEN_OFFSET: f32 = 0.6;
const LEN_SCALE: f32 = 0.4;

const ALLPASS_G: f32 = 0.5;

/// Damping sweeps the in-loop low-pass between these (log mapped).
const DAMP_MIN_HZ: f32 = 500.0;
const DAMP_MAX_HZ: f32 = 18_000.0;

/// Scale a 44.1 kHz tuning to `sr` (rounded), never below one sample.
#[inline]
fn scale_to_rate(samples: f32, sr: f32) -> usize {
    ((samples * (sr / REFERENCE_RATE) + 0.5) as usize).max(1)
}

/// Damping (0 = bright, 1 = dark) → in-loop low-pass cutoff in Hz.
#[inline]
fn damp_to_hz(damp: f32, sr: f32) -> f32 {
    let top = DAMP_MAX_HZ.min(0.45 * sr).max(DAMP_MIN_HZ);
    log_interp(DAMP_MIN_HZ, top, 1.0 - damp)
}

/// Stereo Freeverb-style kernel.
#[derive(Clone)]
pub struct FreeverbKernel {
    sr: f32,
    max_sr: f32,
    // input conditioning
    low_cut: OnePoleHP,
    pre: PreDelay,
    // tank
    combs_l: [CombLp; NUM_COMBS],
    combs_r: [CombLp; NUM_COMBS],
    allpass_l: [Allpass; NUM_ALLPASSES],
    allpass_r: [Allpass; NUM_ALLPASSES],
    // output gains, slewed per sample
    dry: SlewLimiter,
    wet1: SlewLimiter,
    wet2: SlewLimiter,
    smoothing_ms: f32,
    // last configuration, re-applied after a rate change
    params: ParamSnapshot,
}

impl Debug for FreeverbKernel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FreeverbKernel")
            .field("sr", &self.sr)
            .field("max_sr", &self.max_sr)
            .field("params", &self.params)
            .finish()
    }
}

impl FreeverbKernel {
    /// Allocate every buffer for `max_sample_rate` and start at `sample_rate`.
    ///
    /// Callers validate rates beforehand; here `sample_rate` is simply capped
    /// at `max_sample_rate`.
    pub fn new(sample_rate: f32, max_sample_rate: f32, max_predelay_ms: f32, smoothing_ms: f32) -> Self {
        let max_sr = max_sample_rate.max(sample_rate).max(1.0);
        let sr = sample_rate.clamp(1.0, max_sr);

        let comb_cap = |i: usize| scale_to_rate((COMB_TUNINGS_44K[i] + STEREO_SPREAD_44K) as f32, max_sr) + 1;
        let ap_cap = |i: usize| scale_to_rate((ALLPASS_TUNINGS_44K[i] + STEREO_SPREAD_44K) as f32, max_sr) + 1;

        let mut s = Self {
            sr,
            max_sr,
            low_cut: OnePoleHP::new(20.0, sr),
            pre: PreDelay::with_max_delay(ms_to_samples(max_predelay_ms.max(0.0), max_sr) + 1),
            combs_l: array::from_fn(|i| CombLp::with_capacity(comb_cap(i), sr)),
            combs_r: array::from_fn(|i| CombLp::with_capacity(comb_cap(i), sr)),
            allpass_l: array::from_fn(|i| Allpass::with_capacity(ap_cap(i), ALLPASS_G)),
            allpass_r: array::from_fn(|i| Allpass::with_capacity(ap_cap(i), ALLPASS_G)),
            dry: SlewLimiter::new(smoothing_ms, sr),
            wet1: SlewLimiter::new(smoothing_ms, sr),
            wet2: SlewLimiter::new(smoothing_ms, sr),
            smoothing_ms,
            params: ParamSnapshot::default(),
        };
        s.apply_rate();
        let p = s.params;
        s.configure(&p);
        s.snap();
        s
    }

    #[inline] pub fn sample_rate(&self) -> f32 { self.sr }
    #[inline] pub fn max_sample_rate(&self) -> f32 { self.max_sr }

    /// Current left-channel comb lengths in samples.
    pub fn comb_lengths(&self) -> [usize; NUM_COMBS] {
        array::from_fn(|i| self.combs_l[i].len())
    }

    /// Push the sample rate into every rate-dependent block and size the
    /// all-passes (their length does not depend on any parameter).
    fn apply_rate(&mut self) {
        let sr = self.sr;
        self.low_cut.set_sample_rate(sr);
        for c in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            c.set_sample_rate(sr);
        }
        for (i, (l, r)) in self.allpass_l.iter_mut().zip(self.allpass_r.iter_mut()).enumerate() {
            l.set_len(scale_to_rate(ALLPASS_TUNINGS_44K[i] as f32, sr));
            r.set_len(scale_to_rate((ALLPASS_TUNINGS_44K[i] + STEREO_SPREAD_44K) as f32, sr));
        }
        for g in [&mut self.dry, &mut self.wet1, &mut self.wet2] {
            g.set_time_ms(self.smoothing_ms, sr);
        }
    }
}

impl StereoKernel for FreeverbKernel {
    fn reset(&mut self, sample_rate: f32) {
        self.sr = sample_rate.clamp(1.0, self.max_sr);
        self.apply_rate();
        let p = self.params;
        self.configure(&p);
        self.clear();
        self.snap();
    }

    fn clear(&mut self) {
        self.low_cut.reset();
        self.pre.clear();
        for c in self.combs_l.iter_mut().chain(self.combs_r.iter_mut()) {
            c.clear();
        }
        for a in self.allpass_l.iter_mut().chain(self.allpass_r.iter_mut()) {
            a.clear();
        }
    }

    fn configure(&mut self, p: &ParamSnapshot) {
        let sr = self.sr;

        // tank
        let feedback = ROOM_OFFSET + ROOM_SCALE * p.room_size;
        let len_scale = LEN_OFFSET + LEN_SCALE * p.room_size;
        let damp_hz = damp_to_hz(p.damp, sr);
        for (i, (l, r)) in self.combs_l.iter_mut().zip(self.combs_r.iter_mut()).enumerate() {
            let base = COMB_TUNINGS_44K[i] as f32 * len_scale;
            l.set_len(scale_to_rate(base, sr));
            r.set_len(scale_to_rate(base + STEREO_SPREAD_44K as f32, sr));
            for c in [l, r] {
                c.set_feedback(feedback);
                c.set_damp_cut(damp_hz);
            }
        }

        // input conditioning
        self.low_cut.set_cutoff_hz(p.low_cut_hz);
        self.pre.set_delay(ms_to_samples(p.predelay_ms, sr));

        // output matrix
        let wet = p.mix * WET_SCALE;
        self.wet1.set_target(wet * (0.5 * p.width + 0.5));
        self.wet2.set_target(wet * (0.5 * (1.0 - p.width)));
        self.dry.set_target(1.0 - p.mix);

        self.params = *p;
    }

    fn snap(&mut self) {
        self.dry.snap();
        self.wet1.snap();
        self.wet2.snap();
    }

    #[inline]
    fn tick(&mut self, l: f32, r: f32) -> (f32, f32) {
        let x = self.pre.process(self.low_cut.process((l + r) * FIXED_GAIN));

        let mut out_l = 0.0;
        let mut out_r = 0.0;
        for (cl, cr) in self.combs_l.iter_mut().zip(self.combs_r.iter_mut()) {
            out_l += cl.process(x);
            out_r += cr.process(x);
        }
        for (al, ar) in self.allpass_l.iter_mut().zip(self.allpass_r.iter_mut()) {
            out_l = al.process(out_l);
            out_r = ar.process(out_r);
        }

        let dry = self.dry.next();
        let wet1 = self.wet1.next();
        let wet2 = self.wet2.next();
        (
            out_l * wet1 + out_r * wet2 + l * dry,
            out_r * wet1 + out_l * wet2 + r * dry,
        )
    }
}

// ------------------------------------ Tests --------------------------------------
