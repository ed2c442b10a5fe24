//! Parameter identities, ranges, defaults and the "describe parameters" schema.
//!
//! The schema is what a host-side control surface asks for to build its UI
//! (`requestUiDefinitions`). It is static apart from two bounds that depend on
//! the instance: the low-cut maximum (Nyquist) and the pre-delay maximum.

use serde::Serialize;

/// Bottom of the `lowCutHz` range.
pub const LOW_CUT_MIN_HZ: f32 = 20.0;

pub const DEFAULT_MIX: f32 = 0.4;
pub const DEFAULT_WIDTH: f32 = 1.0;
pub const DEFAULT_DAMP: f32 = 0.5;
pub const DEFAULT_ROOM_SIZE: f32 = 0.8;
pub const DEFAULT_PREDELAY_MS: f32 = 0.0;
pub const DEFAULT_LOW_CUT_HZ: f32 = LOW_CUT_MIN_HZ;
pub const DEFAULT_ENABLED: bool = true;

/// Every externally settable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    Mix,
    Width,
    Damp,
    RoomSize,
    PredelayMs,
    LowCutHz,
    Enabled,
}

impl ParamId {
    pub const ALL: [ParamId; 7] = [
        ParamId::Mix,
        ParamId::Width,
        ParamId::Damp,
        ParamId::RoomSize,
        ParamId::PredelayMs,
        ParamId::LowCutHz,
        ParamId::Enabled,
    ];

    /// Wire name used in control messages.
    pub fn name(self) -> &'static str {
        match self {
            ParamId::Mix => "mix",
            ParamId::Width => "width",
            ParamId::Damp => "damp",
            ParamId::RoomSize => "roomSize",
            ParamId::PredelayMs => "predelayMs",
            ParamId::LowCutHz => "lowCutHz",
            ParamId::Enabled => "enabled",
        }
    }

    /// Inverse of [`name`](Self::name). Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    pub fn kind(self) -> ParamKind {
        match self {
            ParamId::Enabled => ParamKind::Bool,
            _ => ParamKind::Float,
        }
    }

    pub fn units(self) -> &'static str {
        match self {
            ParamId::PredelayMs => "ms",
            ParamId::LowCutHz => "Hz",
            ParamId::Enabled => "",
            _ => "ratio",
        }
    }

    /// Default value as a float (`enabled` maps to 1.0 / 0.0).
    pub fn default_value(self) -> f32 {
        match self {
            ParamId::Mix => DEFAULT_MIX,
            ParamId::Width => DEFAULT_WIDTH,
            ParamId::Damp => DEFAULT_DAMP,
            ParamId::RoomSize => DEFAULT_ROOM_SIZE,
            ParamId::PredelayMs => DEFAULT_PREDELAY_MS,
            ParamId::LowCutHz => DEFAULT_LOW_CUT_HZ,
            ParamId::Enabled => bool_to_f32(DEFAULT_ENABLED),
        }
    }

    /// Inclusive range for an instance with the given bounds.
    pub fn range(self, bounds: &Bounds) -> (f32, f32) {
        match self {
            ParamId::PredelayMs => (0.0, bounds.max_predelay_ms),
            ParamId::LowCutHz => (LOW_CUT_MIN_HZ, bounds.low_cut_max_hz()),
            _ => (0.0, 1.0),
        }
    }

    pub fn spec(self, bounds: &Bounds) -> ParamSpec {
        let (min, max) = self.range(bounds);
        ParamSpec {
            name: self.name(),
            kind: self.kind(),
            min,
            max,
            default: self.default_value(),
            units: self.units(),
        }
    }
}

/// Instance-dependent range limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub sample_rate: f32,
    pub max_predelay_ms: f32,
}

impl Bounds {
    /// Nyquist, but never below the bottom of the low-cut range.
    #[inline]
    pub fn low_cut_max_hz(&self) -> f32 {
        (0.5 * self.sample_rate).max(LOW_CUT_MIN_HZ)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Float,
    Bool,
}

/// One schema entry: `{name, type, min, max, default, units}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamSpec {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: ParamKind,
    pub min: f32,
    pub max: f32,
    pub default: f32,
    pub units: &'static str,
}

/// Full parameter schema for an instance running at `sample_rate`.
pub fn describe(sample_rate: f32, max_predelay_ms: f32) -> Vec<ParamSpec> {
    let bounds = Bounds { sample_rate, max_predelay_ms };
    ParamId::ALL.iter().map(|id| id.spec(&bounds)).collect()
}

#[inline]
pub(crate) fn bool_to_f32(b: bool) -> f32 {
    if b { 1.0 } else { 0.0 }
}
