//! Real-time block processor.
//!
//! This module defines the [`StereoKernel`] trait (the swappable DSP core) and
//! the generic [`Engine<K>`] that drives it: one parameter snapshot per block,
//! bypass handling, the per-block numeric fault check, and diagnostics.
//!
//! Threading contract
//! - `Engine` lives on the audio thread and is driven through `&mut self`.
//! - Parameters live in an `Arc<ReverbParams>` shared with any number of
//!   control threads; writes are visible from the next block on.
//! - Nothing reachable from `process_block`/`process_planar` allocates, locks,
//!   logs or panics on bad buffer sizes.

use std::sync::Arc;

use tailspace_core::dsp::all_finite;

use crate::config::{check_sample_rate, EngineConfig};
use crate::control::ControlSurface;
use crate::error::{EngineError, Result};
use crate::events::{self, EventLog, EventSink, RtEvent};
use crate::params::{ParamSnapshot, ParamUpdate, ReverbParams};
use crate::reverb::FreeverbKernel;

/// Stereo sample-by-sample DSP core.
///
/// Implementations must not allocate in any of these methods; buffers are
/// expected to have been sized for the largest rate at construction.
pub trait StereoKernel {
    /// Switch to a new sample rate (never above the pre-sized maximum) and
    /// clear all state.
    fn reset(&mut self, sample_rate: f32);

    /// Zero every delay line and filter state.
    fn clear(&mut self);

    /// Recompute coefficients and gain targets for a new parameter set.
    fn configure(&mut self, params: &ParamSnapshot);

    /// Jump slewed gains straight to their targets.
    fn snap(&mut self);

    /// Process one stereo frame.
    fn tick(&mut self, l: f32, r: f32) -> (f32, f32);
}

/// Block-processing engine around a [`StereoKernel`].
pub struct Engine<K: StereoKernel> {
    kernel: K,
    params: Arc<ReverbParams>,
    events: EventSink,
    event_log: Option<EventLog>,
    sample_rate: f32,
    max_sample_rate: f32,
    /// Snapshot the kernel is configured for; `None` forces configure + snap.
    applied: Option<ParamSnapshot>,
    bypassed: bool,
    block_index: u64,
}

/// The engine with the built-in Freeverb-style kernel.
pub type ReverbEngine = Engine<FreeverbKernel>;

impl Engine<FreeverbKernel> {
    /// Create an engine at `sample_rate_hz` with buffers sized for
    /// `max_sample_rate_hz`.
    pub fn create(sample_rate_hz: f32, max_sample_rate_hz: f32) -> Result<Self> {
        Self::from_config(EngineConfig::new(sample_rate_hz).with_max_sample_rate(max_sample_rate_hz))
    }

    pub fn from_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let kernel = FreeverbKernel::new(
            config.sample_rate,
            config.effective_max_sample_rate(),
            config.max_predelay_ms,
            config.smoothing_ms,
        );
        Self::with_kernel(&config, kernel)
    }
}

impl<K: StereoKernel> Engine<K> {
    /// Wrap an already-built kernel. The kernel must have been sized for
    /// `config`; it is reset to `config.sample_rate` here.
    pub fn with_kernel(config: &EngineConfig, mut kernel: K) -> Result<Self> {
        config.validate()?;
        kernel.reset(config.sample_rate);
        let (events, event_log) = events::channel(config.event_capacity);
        log::info!(
            "reverb engine created: {} Hz (max {} Hz, max pre-delay {} ms)",
            config.sample_rate,
            config.effective_max_sample_rate(),
            config.max_predelay_ms
        );
        Ok(Self {
            kernel,
            params: Arc::new(ReverbParams::new(config.sample_rate, config.max_predelay_ms)),
            events,
            event_log: Some(event_log),
            sample_rate: config.sample_rate,
            max_sample_rate: config.effective_max_sample_rate(),
            applied: None,
            bypassed: false,
            block_index: 0,
        })
    }

    // ------------------------------------------------------------ accessors

    #[inline] pub fn sample_rate(&self) -> f32 { self.sample_rate }
    #[inline] pub fn max_sample_rate(&self) -> f32 { self.max_sample_rate }
    #[inline] pub fn blocks_processed(&self) -> u64 { self.block_index }

    /// Diagnostics that could not be queued because the ring was full.
    #[inline] pub fn dropped_events(&self) -> u64 { self.events.dropped() }

    /// Shared parameter store for control threads.
    pub fn params(&self) -> Arc<ReverbParams> {
        Arc::clone(&self.params)
    }

    /// Message-level control surface over the shared parameters.
    pub fn control_surface(&self) -> ControlSurface {
        ControlSurface::new(self.params())
    }

    /// Take the consumer side of the diagnostics ring. Only the first call
    /// returns `Some`.
    pub fn take_event_log(&mut self) -> Option<EventLog> {
        self.event_log.take()
    }

    #[inline] pub fn kernel(&self) -> &K { &self.kernel }

    // ------------------------------------------------------------ setters

    #[inline] pub fn set_mix(&self, v: f32) { self.params.set_mix(v); }
    #[inline] pub fn set_width(&self, v: f32) { self.params.set_width(v); }
    #[inline] pub fn set_damp(&self, v: f32) { self.params.set_damp(v); }
    #[inline] pub fn set_room_size(&self, v: f32) { self.params.set_room_size(v); }
    #[inline] pub fn set_predelay_ms(&self, v: f32) { self.params.set_predelay_ms(v); }
    #[inline] pub fn set_low_cut_hz(&self, v: f32) { self.params.set_low_cut_hz(v); }
    #[inline] pub fn set_enabled(&self, on: bool) { self.params.set_enabled(on); }
    #[inline] pub fn apply(&self, update: ParamUpdate) -> bool { self.params.apply(update) }

    // ------------------------------------------------------------ lifecycle

    /// Change the sample rate without reallocating. Clears the tail.
    /// Not for the audio thread while it is inside `process_block`.
    pub fn reset(&mut self, sample_rate_hz: f32) -> Result<()> {
        check_sample_rate(sample_rate_hz)?;
        if sample_rate_hz > self.max_sample_rate {
            return Err(EngineError::SampleRateAboveMax { rate: sample_rate_hz, max: self.max_sample_rate });
        }
        self.kernel.reset(sample_rate_hz);
        self.params.set_sample_rate(sample_rate_hz);
        self.sample_rate = sample_rate_hz;
        self.applied = None;
        log::info!("reverb engine reset to {sample_rate_hz} Hz");
        Ok(())
    }

    /// Release all DSP state. Consuming `self` makes any later
    /// `process_block` call a compile error.
    pub fn destroy(self) {
        log::info!("reverb engine destroyed after {} blocks", self.block_index);
        drop(self);
    }

    // ------------------------------------------------------------ processing

    /// Process `frame_count` interleaved stereo frames (`[L0, R0, L1, R1, ..]`).
    ///
    /// If either slice holds fewer than `frame_count * 2` samples only the
    /// frames that fit are processed and a [`RtEvent::ShortBuffer`] is queued.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32], frame_count: usize) {
        let frames = frame_count.min(input.len() / 2).min(output.len() / 2);
        if frames < frame_count {
            self.events.push(RtEvent::ShortBuffer { requested: frame_count, processed: frames });
        }
        let input = &input[..frames * 2];
        let output = &mut output[..frames * 2];

        let snapshot = self.params.snapshot();
        if !self.begin_block(&snapshot) {
            output.copy_from_slice(input);
            self.block_index += 1;
            return;
        }

        for (i, o) in input.chunks_exact(2).zip(output.chunks_exact_mut(2)) {
            let (l, r) = self.kernel.tick(i[0], i[1]);
            o[0] = l;
            o[1] = r;
        }

        if !all_finite(output) {
            self.recover();
            output.fill(0.0);
        }
        self.block_index += 1;
    }

    /// Planar variant: separate left/right slices. The frame count is the
    /// shortest of the four slices.
    pub fn process_planar(&mut self, in_l: &[f32], in_r: &[f32], out_l: &mut [f32], out_r: &mut [f32]) {
        let requested = out_l.len().max(out_r.len()).max(in_l.len()).max(in_r.len());
        let frames = out_l.len().min(out_r.len()).min(in_l.len()).min(in_r.len());
        if frames < requested {
            self.events.push(RtEvent::ShortBuffer { requested, processed: frames });
        }
        let (in_l, in_r) = (&in_l[..frames], &in_r[..frames]);
        let (out_l, out_r) = (&mut out_l[..frames], &mut out_r[..frames]);

        let snapshot = self.params.snapshot();
        if !self.begin_block(&snapshot) {
            out_l.copy_from_slice(in_l);
            out_r.copy_from_slice(in_r);
            self.block_index += 1;
            return;
        }

        for n in 0..frames {
            let (l, r) = self.kernel.tick(in_l[n], in_r[n]);
            out_l[n] = l;
            out_r[n] = r;
        }

        if !all_finite(out_l) || !all_finite(out_r) {
            self.recover();
            out_l.fill(0.0);
            out_r.fill(0.0);
        }
        self.block_index += 1;
    }

    /// Per-block parameter handling. Returns `false` when the block must be
    /// passed through untouched.
    #[inline]
    fn begin_block(&mut self, snapshot: &ParamSnapshot) -> bool {
        if !snapshot.enabled {
            if !self.bypassed {
                self.bypassed = true;
                self.kernel.clear();
                self.applied = None;
                self.events.push(RtEvent::Bypassed);
            }
            return false;
        }
        if self.bypassed {
            self.bypassed = false;
            self.events.push(RtEvent::Resumed);
        }

        match self.applied {
            Some(prev) if prev == *snapshot => {}
            Some(_) => {
                self.kernel.configure(snapshot);
                self.applied = Some(*snapshot);
            }
            None => {
                self.kernel.configure(snapshot);
                self.kernel.snap();
                self.applied = Some(*snapshot);
            }
        }
        true
    }

    /// Drop the poisoned state and start over from silence.
    #[inline]
    fn recover(&mut self) {
        self.kernel.clear();
        self.applied = None;
        self.events.push(RtEvent::NumericFault { block_index: self.block_index });
    }
}

impl<K: StereoKernel> core::fmt::Debug for Engine<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Engine")
            .field("sample_rate", &self.sample_rate)
            .field("max_sample_rate", &self.max_sample_rate)
            .field("bypassed", &self.bypassed)
            .field("block_index", &self.block_index)
            .finish()
    }
}

// ------------------------------------ Tests --------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use tailspace_core::dsp::energy;

    const SR: f32 = 48000.0;

    fn engine() -> ReverbEngine {
        ReverbEngine::create(SR, SR).unwrap()
    }

    /// Deterministic broadband test signal.
    fn noise(frames: usize, seed: u32) -> Vec<f32> {
        let mut state = seed.wrapping_mul(747_796_405).wrapping_add(1);
        (0..frames * 2)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                (state >> 8) as f32 / (1u32 << 24) as f32 - 0.5
            })
            .collect()
    }

    fn impulse(frames: usize) -> Vec<f32> {
        let mut v = vec![0.0; frames * 2];
        v[0] = 1.0;
        v[1] = 1.0;
        v
    }

    fn run(e: &mut ReverbEngine, input: &[f32], block: usize) -> Vec<f32> {
        let mut out = vec![0.0; input.len()];
        for (i, o) in input.chunks(block * 2).zip(out.chunks_mut(block * 2)) {
            e.process_block(i, o, i.len() / 2);
        }
        out
    }

    // ---------------------------------------------------------------- construction

    #[test]
    fn create_accepts_valid_rates() {
        for sr in [8000.0, 22050.0, 44100.0, 48000.0, 96000.0, 192000.0] {
            let e = ReverbEngine::create(sr, sr).unwrap();
            assert_eq!(e.sample_rate(), sr);
        }
        assert!(ReverbEngine::create(44100.0, 192000.0).is_ok());
    }

    #[test]
    fn create_rejects_bad_rates() {
        for sr in [0.0, -1.0, -48000.0, f32::NAN, f32::NEG_INFINITY, f32::INFINITY] {
            assert!(
                matches!(ReverbEngine::create(sr, 48000.0), Err(EngineError::InvalidSampleRate(_))),
                "sr={sr}"
            );
        }
        assert!(matches!(
            ReverbEngine::create(96000.0, 48000.0),
            Err(EngineError::MaxSampleRateBelowRate { .. })
        ));
    }

    #[test]
    fn create_rejects_rates_too_large_to_allocate() {
        for sr in [1.0e9, 1.0e30] {
            assert!(matches!(ReverbEngine::create(sr, sr), Err(EngineError::InvalidSampleRate(_))));
            assert!(matches!(ReverbEngine::create(48000.0, sr), Err(EngineError::InvalidSampleRate(_))));
        }
        let cfg = EngineConfig::new(48000.0).with_max_predelay_ms(1.0e9);
        assert!(matches!(ReverbEngine::from_config(cfg), Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn reset_respects_presized_max() {
        let mut e = ReverbEngine::create(44100.0, 96000.0).unwrap();
        assert!(e.reset(96000.0).is_ok());
        assert_eq!(e.sample_rate(), 96000.0);
        assert!(matches!(e.reset(192000.0), Err(EngineError::SampleRateAboveMax { .. })));
        assert!(matches!(e.reset(0.0), Err(EngineError::InvalidSampleRate(_))));
        assert_eq!(e.sample_rate(), 96000.0);
        assert_eq!(e.params().bounds().low_cut_max_hz(), 48000.0);
    }

    // ---------------------------------------------------------------- properties

    #[test]
    fn setting_twice_is_idempotent() {
        let input = noise(2048, 3);
        let mut once = engine();
        let mut twice = engine();
        once.set_room_size(0.65);
        once.set_damp(0.2);
        twice.set_room_size(0.65);
        twice.set_room_size(0.65);
        twice.set_damp(0.2);
        twice.set_damp(0.2);
        assert_eq!(run(&mut once, &input, 256), run(&mut twice, &input, 256));
    }

    #[test]
    fn silence_in_silence_out_after_decay() {
        let combos = [
            (0.0, 0.0, 1.0, 1.0, 0.0),
            (0.5, 0.5, 0.5, 0.5, 120.0),
            (1.0, 0.0, 1.0, 0.0, 0.0),
            (0.8, 1.0, 0.3, 1.0, 500.0),
        ];
        for (room, damp, mix, width, predelay) in combos {
            let mut e = engine();
            e.set_room_size(room);
            e.set_damp(damp);
            e.set_mix(mix);
            e.set_width(width);
            e.set_predelay_ms(predelay);
            run(&mut e, &noise(4096, 11), 512);

            let zeros = vec![0.0f32; 4096 * 2];
            let mut out = vec![0.0f32; zeros.len()];
            let mut decayed = false;
            for _ in 0..600 {
                e.process_block(&zeros, &mut out, 4096);
                if out.iter().all(|x| x.abs() < 1e-6) {
                    decayed = true;
                    break;
                }
            }
            assert!(decayed, "room={room} damp={damp} mix={mix}");
            // and it stays quiet
            e.process_block(&zeros, &mut out, 4096);
            assert!(out.iter().all(|x| x.abs() < 1e-6));
        }
    }

    /// Feed silence until the tail is gone, then long enough for every
    /// internal buffer to have been overwritten with zeros.
    fn decay_fully(e: &mut ReverbEngine) {
        let zeros = vec![0.0f32; 4096 * 2];
        let mut out = vec![0.0f32; zeros.len()];
        let mut quiet = false;
        for _ in 0..200 {
            e.process_block(&zeros, &mut out, 4096);
            if out.iter().all(|x| x.abs() < 1e-6) {
                quiet = true;
                break;
            }
        }
        assert!(quiet, "tail never decayed");
        for _ in 0..64 {
            e.process_block(&zeros, &mut out, 4096);
        }
    }

    fn assert_stays_silent(e: &mut ReverbEngine) {
        let zeros = vec![0.0f32; 4096 * 2];
        let mut out = vec![0.0f32; zeros.len()];
        for _ in 0..8 {
            e.process_block(&zeros, &mut out, 4096);
            let peak = out.iter().fold(0.0f32, |m, x| m.max(x.abs()));
            assert!(peak < 1e-6, "peak={peak}");
        }
    }

    #[test]
    fn growing_the_room_after_decay_stays_silent() {
        let mut e = engine();
        e.set_mix(1.0);
        e.set_room_size(1.0);
        run(&mut e, &noise(8192, 31), 512);

        e.set_room_size(0.0);
        decay_fully(&mut e);

        e.set_room_size(1.0);
        assert_stays_silent(&mut e);
    }

    #[test]
    fn growing_the_predelay_after_decay_stays_silent() {
        let mut e = engine();
        e.set_mix(1.0);
        e.set_room_size(0.0);
        e.set_predelay_ms(500.0);
        run(&mut e, &noise(48_000, 32), 512);

        e.set_predelay_ms(0.0);
        decay_fully(&mut e);

        e.set_predelay_ms(500.0);
        assert_stays_silent(&mut e);
    }

    #[test]
    fn fresh_engine_is_silent_on_silence() {
        let mut e = engine();
        let out = run(&mut e, &vec![0.0; 1024 * 2], 128);
        assert!(out.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn block_size_does_not_change_the_output() {
        let input = noise(512, 5);
        let mut one = engine();
        let mut four = engine();
        for e in [&one, &four] {
            e.set_room_size(0.7);
            e.set_mix(0.5);
            e.set_predelay_ms(3.0);
            e.set_low_cut_hz(150.0);
        }
        let a = run(&mut one, &input, 512);
        let b = run(&mut four, &input, 128);
        for (x, y) in a.iter().zip(b.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-6);
        }
    }

    #[test]
    fn planar_matches_interleaved() {
        let input = noise(1024, 9);
        let mut inter = engine();
        let mut planar = engine();
        let a = run(&mut inter, &input, 256);

        let in_l: Vec<f32> = input.iter().step_by(2).copied().collect();
        let in_r: Vec<f32> = input.iter().skip(1).step_by(2).copied().collect();
        let mut out_l = vec![0.0; 1024];
        let mut out_r = vec![0.0; 1024];
        for start in (0..1024).step_by(256) {
            let end = start + 256;
            planar.process_planar(&in_l[start..end], &in_r[start..end], &mut out_l[start..end], &mut out_r[start..end]);
        }
        for n in 0..1024 {
            assert_eq!(a[2 * n], out_l[n]);
            assert_eq!(a[2 * n + 1], out_r[n]);
        }
    }

    #[test]
    fn zero_mix_passes_input_through() {
        let input = noise(2048, 21);
        let mut e = engine();
        e.set_mix(0.0);
        let out = run(&mut e, &input, 128);
        for (x, y) in input.iter().zip(out.iter()) {
            assert_abs_diff_eq!(x, y, epsilon = 1e-7);
        }
    }

    #[test]
    fn full_mix_has_no_dry_component() {
        let mut e = engine();
        e.set_mix(1.0);
        e.set_predelay_ms(50.0);
        let out = run(&mut e, &impulse(4096), 512);
        // nothing can come out before the pre-delay plus the shortest comb
        assert!(out[..2 * 2400].iter().all(|x| *x == 0.0));
        assert!(out.iter().any(|x| *x != 0.0));
    }

    #[test]
    fn disabled_engine_is_transparent() {
        let input = noise(1024, 4);
        let mut e = engine();
        e.set_mix(1.0);
        e.set_enabled(false);
        let out = run(&mut e, &input, 128);
        assert_eq!(out, input);
    }

    #[test]
    fn disabling_clears_the_tail() {
        let mut e = engine();
        let mut log = e.take_event_log().unwrap();
        e.set_mix(1.0);
        run(&mut e, &impulse(2048), 512);

        e.set_enabled(false);
        run(&mut e, &vec![0.0; 256], 128);
        e.set_enabled(true);
        let out = run(&mut e, &vec![0.0; 4096 * 2], 512);
        assert!(out.iter().all(|x| *x == 0.0));

        let mut seen = Vec::new();
        log.drain_with(|ev| seen.push(ev));
        assert_eq!(seen, vec![RtEvent::Bypassed, RtEvent::Resumed]);
    }

    #[test]
    fn impulse_scenario_decays_and_stays_energy_bounded() {
        let frames = 48_000;
        let mix = 0.3;
        let tail_end = |room: f32| {
            let mut e = engine();
            e.set_room_size(room);
            e.set_damp(0.5);
            e.set_mix(mix);
            let input = impulse(frames);
            let out = run(&mut e, &input, 128);

            let e_in = energy(&input);
            let e_out = energy(&out);
            assert!(e_out < e_in * (mix + (1.0 - mix)), "room={room} in={e_in} out={e_out}");

            // decaying: the last quarter carries less energy than the second
            let q = out.len() / 4;
            assert!(energy(&out[3 * q..]) < energy(&out[q..2 * q]));

            out.iter().rposition(|x| x.abs() > 1e-4).unwrap_or(0)
        };
        let short = tail_end(0.3);
        let long = tail_end(0.8);
        assert!(short > 2, "no tail at all");
        assert!(long > short, "long={long} short={short}");
    }

    // ---------------------------------------------------------------- robustness

    #[test]
    fn nan_input_is_recovered_to_silence() {
        let mut e = engine();
        let mut log = e.take_event_log().unwrap();
        let mut bad = noise(256, 1);
        bad[77] = f32::NAN;
        let mut out = vec![1.0; bad.len()];
        e.process_block(&bad, &mut out, 256);
        assert!(out.iter().all(|x| *x == 0.0));

        let good = noise(256, 2);
        e.process_block(&good, &mut out, 256);
        assert!(out.iter().all(|x| x.is_finite()));
        assert!(out.iter().any(|x| *x != 0.0));

        assert_eq!(log.pop(), Some(RtEvent::NumericFault { block_index: 0 }));
        assert_eq!(log.pop(), None);
    }

    #[test]
    fn short_buffers_never_panic() {
        let mut e = engine();
        let mut log = e.take_event_log().unwrap();
        let input = noise(64, 8);
        let mut out = vec![0.0; 32 * 2];
        e.process_block(&input, &mut out, 128);
        assert_eq!(
            log.pop(),
            Some(RtEvent::ShortBuffer { requested: 128, processed: 32 })
        );
        e.process_block(&[], &mut [], 16);
        assert_eq!(log.pop(), Some(RtEvent::ShortBuffer { requested: 16, processed: 0 }));
    }

    #[test]
    fn event_log_is_handed_out_once() {
        let mut e = engine();
        assert!(e.take_event_log().is_some());
        assert!(e.take_event_log().is_none());
    }

    #[test]
    fn parameter_changes_apply_on_the_next_block() {
        let input = noise(256, 13);
        let mut e = engine();
        let params = e.params();
        let wet = run(&mut e, &input, 256);
        assert!(wet.iter().zip(input.iter()).any(|(w, x)| w != x));

        // mix 0 from another handle: the running engine slews to dry
        params.set_mix(0.0);
        let later = noise(16_384, 14);
        let out = run(&mut e, &later, 4096);
        let settled = 2 * 8192;
        for (y, x) in out[settled..].iter().zip(later[settled..].iter()) {
            assert_abs_diff_eq!(y, x, epsilon = 1e-4);
        }
    }

    // ---------------------------------------------------------------- kernel seam

    /// Kernel that emits NaN on demand, to exercise recovery independently
    /// of the reverb maths.
    struct Faulty {
        poison: bool,
        clears: usize,
        configures: usize,
    }

    impl StereoKernel for Faulty {
        fn reset(&mut self, _sample_rate: f32) {}
        fn clear(&mut self) {
            self.clears += 1;
            self.poison = false;
        }
        fn configure(&mut self, _params: &ParamSnapshot) {
            self.configures += 1;
        }
        fn snap(&mut self) {}
        fn tick(&mut self, l: f32, r: f32) -> (f32, f32) {
            if self.poison { (f32::INFINITY, r) } else { (l, r) }
        }
    }

    #[test]
    fn custom_kernel_plugs_in() {
        let cfg = EngineConfig::new(SR);
        let mut e = Engine::with_kernel(&cfg, Faulty { poison: true, clears: 0, configures: 0 }).unwrap();
        let input = [0.5f32; 64];
        let mut out = [0.0f32; 64];
        e.process_block(&input, &mut out, 32);
        assert_eq!(out, [0.0; 64]);
        assert_eq!(e.kernel().clears, 1);

        e.process_block(&input, &mut out, 32);
        assert_eq!(out, input);
        // configure runs on the first block and again after recovery only
        e.process_block(&input, &mut out, 32);
        assert_eq!(e.kernel().configures, 2);
        assert_eq!(e.blocks_processed(), 3);
    }

    #[test]
    fn destroy_consumes_the_engine() {
        let e = engine();
        let params = e.params();
        e.destroy();
        // the shared store outlives the engine; nothing dangles
        params.set_mix(0.5);
        assert_eq!(params.mix(), 0.5);
    }
}
