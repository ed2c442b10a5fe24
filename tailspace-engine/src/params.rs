//! Lock-free parameter store shared between the control and audio threads.
//!
//! Every parameter is its own atomic. A writer never blocks and never
//! allocates; the audio thread takes one [`ParamSnapshot`] per block. A single
//! parameter can never be observed half-written, but two setters issued back to
//! back may land in different blocks.
//!
//! Range policy: finite values are clamped into range, ±∞ clamps to the nearest
//! bound, NaN is ignored and the previous value stays.

use portable_atomic::{AtomicBool, AtomicF32, Ordering};

use tailspace_core::dsp::clamp;

use crate::schema::{
    self, bool_to_f32, Bounds, ParamId, ParamSpec, DEFAULT_DAMP, DEFAULT_ENABLED,
    DEFAULT_LOW_CUT_HZ, DEFAULT_MIX, DEFAULT_PREDELAY_MS, DEFAULT_ROOM_SIZE, DEFAULT_WIDTH,
    LOW_CUT_MIN_HZ,
};

/// A single typed parameter change. "Unspecified means unchanged" falls out of
/// only ever sending the updates that are present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamUpdate {
    Mix(f32),
    Width(f32),
    Damp(f32),
    RoomSize(f32),
    PredelayMs(f32),
    LowCutHz(f32),
    Enabled(bool),
}

impl ParamUpdate {
    pub fn id(&self) -> ParamId {
        match self {
            ParamUpdate::Mix(_) => ParamId::Mix,
            ParamUpdate::Width(_) => ParamId::Width,
            ParamUpdate::Damp(_) => ParamId::Damp,
            ParamUpdate::RoomSize(_) => ParamId::RoomSize,
            ParamUpdate::PredelayMs(_) => ParamId::PredelayMs,
            ParamUpdate::LowCutHz(_) => ParamId::LowCutHz,
            ParamUpdate::Enabled(_) => ParamId::Enabled,
        }
    }

    /// Build an update from a numeric value. `Enabled` is true for any
    /// non-zero value; NaN yields `None` for it.
    pub fn new(id: ParamId, value: f32) -> Option<Self> {
        Some(match id {
            ParamId::Mix => ParamUpdate::Mix(value),
            ParamId::Width => ParamUpdate::Width(value),
            ParamId::Damp => ParamUpdate::Damp(value),
            ParamId::RoomSize => ParamUpdate::RoomSize(value),
            ParamId::PredelayMs => ParamUpdate::PredelayMs(value),
            ParamId::LowCutHz => ParamUpdate::LowCutHz(value),
            ParamId::Enabled if value.is_nan() => return None,
            ParamId::Enabled => ParamUpdate::Enabled(value != 0.0),
        })
    }

    /// Build an update from a wire `(name, value)` pair; unknown names yield `None`.
    pub fn from_pair(name: &str, value: f32) -> Option<Self> {
        ParamId::from_name(name).and_then(|id| Self::new(id, value))
    }
}

/// Plain copy of every parameter, taken once per block by the audio thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSnapshot {
    pub mix: f32,
    pub width: f32,
    pub damp: f32,
    pub room_size: f32,
    pub predelay_ms: f32,
    pub low_cut_hz: f32,
    pub enabled: bool,
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            mix: DEFAULT_MIX,
            width: DEFAULT_WIDTH,
            damp: DEFAULT_DAMP,
            room_size: DEFAULT_ROOM_SIZE,
            predelay_ms: DEFAULT_PREDELAY_MS,
            low_cut_hz: DEFAULT_LOW_CUT_HZ,
            enabled: DEFAULT_ENABLED,
        }
    }
}

/// Shared parameter store. Hand out clones of the owning `Arc` to any control
/// thread; all setters take `&self`.
#[derive(Debug)]
pub struct ReverbParams {
    mix: AtomicF32,
    width: AtomicF32,
    damp: AtomicF32,
    room_size: AtomicF32,
    predelay_ms: AtomicF32,
    low_cut_hz: AtomicF32,
    enabled: AtomicBool,
    // bounds
    sample_rate: AtomicF32,
    max_predelay_ms: f32,
}

impl ReverbParams {
    pub fn new(sample_rate: f32, max_predelay_ms: f32) -> Self {
        let d = ParamSnapshot::default();
        let s = Self {
            mix: AtomicF32::new(d.mix),
            width: AtomicF32::new(d.width),
            damp: AtomicF32::new(d.damp),
            room_size: AtomicF32::new(d.room_size),
            predelay_ms: AtomicF32::new(d.predelay_ms),
            low_cut_hz: AtomicF32::new(d.low_cut_hz),
            enabled: AtomicBool::new(d.enabled),
            sample_rate: AtomicF32::new(sample_rate),
            max_predelay_ms: max_predelay_ms.max(0.0),
        };
        // a tiny max pre-delay can sit below the default; keep the invariant
        s.set_predelay_ms(d.predelay_ms);
        s
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        Bounds {
            sample_rate: self.sample_rate.load(Ordering::Acquire),
            max_predelay_ms: self.max_predelay_ms,
        }
    }

    /// Current schema, with the low-cut ceiling at this instance's Nyquist.
    pub fn describe(&self) -> Vec<ParamSpec> {
        let b = self.bounds();
        schema::describe(b.sample_rate, b.max_predelay_ms)
    }

    // ---------------------------------------------------------------- setters

    #[inline] pub fn set_mix(&self, v: f32) -> bool { store_clamped(&self.mix, v, 0.0, 1.0) }
    #[inline] pub fn set_width(&self, v: f32) -> bool { store_clamped(&self.width, v, 0.0, 1.0) }
    #[inline] pub fn set_damp(&self, v: f32) -> bool { store_clamped(&self.damp, v, 0.0, 1.0) }
    #[inline] pub fn set_room_size(&self, v: f32) -> bool { store_clamped(&self.room_size, v, 0.0, 1.0) }

    #[inline]
    pub fn set_predelay_ms(&self, v: f32) -> bool {
        store_clamped(&self.predelay_ms, v, 0.0, self.max_predelay_ms)
    }

    #[inline]
    pub fn set_low_cut_hz(&self, v: f32) -> bool {
        let hi = self.bounds().low_cut_max_hz();
        store_clamped(&self.low_cut_hz, v, LOW_CUT_MIN_HZ, hi)
    }

    #[inline]
    pub fn set_enabled(&self, on: bool) {
        self.enabled.store(on, Ordering::Release);
    }

    /// Apply one typed update. Returns `false` when the value was ignored (NaN).
    pub fn apply(&self, update: ParamUpdate) -> bool {
        match update {
            ParamUpdate::Mix(v) => self.set_mix(v),
            ParamUpdate::Width(v) => self.set_width(v),
            ParamUpdate::Damp(v) => self.set_damp(v),
            ParamUpdate::RoomSize(v) => self.set_room_size(v),
            ParamUpdate::PredelayMs(v) => self.set_predelay_ms(v),
            ParamUpdate::LowCutHz(v) => self.set_low_cut_hz(v),
            ParamUpdate::Enabled(on) => {
                self.set_enabled(on);
                true
            }
        }
    }

    /// Set by wire name. Unknown names and NaN values are ignored (`false`).
    pub fn set_by_name(&self, name: &str, value: f32) -> bool {
        ParamUpdate::from_pair(name, value).map_or(false, |u| self.apply(u))
    }

    /// Move the low-cut ceiling after a sample-rate change and re-clamp.
    pub(crate) fn set_sample_rate(&self, sample_rate: f32) {
        self.sample_rate.store(sample_rate, Ordering::Release);
        let current = self.low_cut_hz.load(Ordering::Acquire);
        self.set_low_cut_hz(current);
    }

    // ---------------------------------------------------------------- getters

    #[inline] pub fn mix(&self) -> f32 { self.mix.load(Ordering::Acquire) }
    #[inline] pub fn width(&self) -> f32 { self.width.load(Ordering::Acquire) }
    #[inline] pub fn damp(&self) -> f32 { self.damp.load(Ordering::Acquire) }
    #[inline] pub fn room_size(&self) -> f32 { self.room_size.load(Ordering::Acquire) }
    #[inline] pub fn predelay_ms(&self) -> f32 { self.predelay_ms.load(Ordering::Acquire) }
    #[inline] pub fn low_cut_hz(&self) -> f32 { self.low_cut_hz.load(Ordering::Acquire) }
    #[inline] pub fn enabled(&self) -> bool { self.enabled.load(Ordering::Acquire) }

    /// Value by id, with `enabled` as 1.0 / 0.0.
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::Mix => self.mix(),
            ParamId::Width => self.width(),
            ParamId::Damp => self.damp(),
            ParamId::RoomSize => self.room_size(),
            ParamId::PredelayMs => self.predelay_ms(),
            ParamId::LowCutHz => self.low_cut_hz(),
            ParamId::Enabled => bool_to_f32(self.enabled()),
        }
    }

    /// Wait-free read of every parameter.
    #[inline]
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            mix: self.mix(),
            width: self.width(),
            damp: self.damp(),
            room_size: self.room_size(),
            predelay_ms: self.predelay_ms(),
            low_cut_hz: self.low_cut_hz(),
            enabled: self.enabled(),
        }
    }
}

#[inline]
fn store_clamped(slot: &AtomicF32, v: f32, lo: f32, hi: f32) -> bool {
    if v.is_nan() {
        return false;
    }
    slot.store(clamp(v, lo, hi), Ordering::Release);
    true
}
