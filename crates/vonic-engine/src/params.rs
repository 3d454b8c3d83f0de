//! Parameter snapshot adapter.
//!
//! [`ParameterStore`] holds the seven equalizer parameters as atomic `u32`
//! (f32 bit-cast) so any thread can read or write them without locking. A
//! generation counter lets consumers skip recomputation when nothing has
//! changed. [`ParameterStore::snapshot`] turns the current values into the
//! immutable [`ParameterSnapshot`] the coefficient calculator consumes.

use crate::error::{EngineError, Result};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use vonic_core::{ParamDescriptor, ParamId, ParameterSnapshot, Slope};

/// The equalizer's parameters, in snapshot field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EqParam {
    /// Peak band centre frequency (Hz).
    PeakFrequency,
    /// Peak band gain (dB).
    PeakGain,
    /// Peak band quality.
    PeakQuality,
    /// Low-cut cutoff (Hz).
    LowCutFrequency,
    /// High-cut cutoff (Hz).
    HighCutFrequency,
    /// Low-cut slope index (0..=3).
    LowCutSlope,
    /// High-cut slope index (0..=3).
    HighCutSlope,
}

const PARAM_COUNT: usize = 7;

static DESCRIPTORS: [ParamDescriptor; PARAM_COUNT] = [
    ParamDescriptor::frequency_hz("Peak Frequency", "Peak", 750.0)
        .with_id(ParamId(100), "peak_frequency_hz"),
    ParamDescriptor::gain_db("Peak Gain", "Gain", -24.0, 24.0, 0.0)
        .with_id(ParamId(101), "peak_gain_db"),
    ParamDescriptor::quality("Peak Quality", "Quality", 1.0)
        .with_id(ParamId(102), "peak_quality"),
    ParamDescriptor::frequency_hz("Low Cut Frequency", "LowCut", 20.0)
        .with_id(ParamId(103), "low_cut_frequency_hz"),
    ParamDescriptor::frequency_hz("High Cut Frequency", "HighCut", 20000.0)
        .with_id(ParamId(104), "high_cut_frequency_hz"),
    ParamDescriptor::slope("Low Cut Slope", "LCSlope").with_id(ParamId(105), "low_cut_slope"),
    ParamDescriptor::slope("High Cut Slope", "HCSlope").with_id(ParamId(106), "high_cut_slope"),
];

impl EqParam {
    /// Every parameter, in index order.
    pub const ALL: [EqParam; PARAM_COUNT] = [
        EqParam::PeakFrequency,
        EqParam::PeakGain,
        EqParam::PeakQuality,
        EqParam::LowCutFrequency,
        EqParam::HighCutFrequency,
        EqParam::LowCutSlope,
        EqParam::HighCutSlope,
    ];

    /// Position in [`EqParam::ALL`].
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Range, unit and ids.
    pub fn descriptor(self) -> &'static ParamDescriptor {
        &DESCRIPTORS[self as usize]
    }

    /// Parameter with the given stable id.
    pub fn from_id(id: ParamId) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.descriptor().id == id)
    }

    /// Resolves a string id, full name or short name, ignoring ASCII case.
    /// Dashes are accepted in place of underscores.
    pub fn find(name: &str) -> Option<Self> {
        let wanted = name.trim().replace('-', "_");
        Self::ALL.into_iter().find(|p| {
            let d = p.descriptor();
            d.string_id.eq_ignore_ascii_case(&wanted)
                || d.name.eq_ignore_ascii_case(name.trim())
                || d.short_name.eq_ignore_ascii_case(name.trim())
        })
    }

    /// Value of this parameter in `snapshot`, as a host float.
    pub fn read(self, snapshot: &ParameterSnapshot) -> f32 {
        match self {
            EqParam::PeakFrequency => snapshot.peak_frequency_hz,
            EqParam::PeakGain => snapshot.peak_gain_db,
            EqParam::PeakQuality => snapshot.peak_quality,
            EqParam::LowCutFrequency => snapshot.low_cut_frequency_hz,
            EqParam::HighCutFrequency => snapshot.high_cut_frequency_hz,
            EqParam::LowCutSlope => f32::from(snapshot.low_cut_slope.index()),
            EqParam::HighCutSlope => f32::from(snapshot.high_cut_slope.index()),
        }
    }
}

impl fmt::Display for EqParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().string_id)
    }
}

struct StoreData {
    values: [AtomicU32; PARAM_COUNT],
    generation: AtomicU64,
}

/// Lock-free store of the current parameter values.
///
/// Cloning is cheap and every clone sees the same values. Writers clamp to
/// the descriptor range; slopes are rounded to whole steps.
#[derive(Clone)]
pub struct ParameterStore {
    inner: Arc<StoreData>,
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterStore")
            .field("generation", &self.generation())
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

impl ParameterStore {
    /// Store with every parameter at its default.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreData {
                values: std::array::from_fn(|i| AtomicU32::new(DESCRIPTORS[i].default.to_bits())),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Store initialized from a snapshot (values clamped to descriptor ranges).
    pub fn from_snapshot(snapshot: &ParameterSnapshot) -> Self {
        let store = Self::new();
        store.apply_snapshot(snapshot);
        store
    }

    /// Current value (lock-free).
    pub fn get(&self, param: EqParam) -> f32 {
        f32::from_bits(self.inner.values[param.index()].load(Ordering::Acquire))
    }

    /// Writes a value, clamped to the descriptor. Returns the stored value.
    ///
    /// The generation advances only if the stored value actually changed.
    pub fn set(&self, param: EqParam, value: f32) -> f32 {
        let clamped = param.descriptor().clamp(value);
        let bits = clamped.to_bits();
        let previous = self.inner.values[param.index()].swap(bits, Ordering::AcqRel);
        if previous != bits {
            self.inner.generation.fetch_add(1, Ordering::Release);
        }
        clamped
    }

    /// Writes a value addressed by name (see [`EqParam::find`]).
    pub fn set_by_name(&self, name: &str, value: f32) -> Result<f32> {
        let param =
            EqParam::find(name).ok_or_else(|| EngineError::UnknownParameter(name.to_string()))?;
        Ok(self.set(param, value))
    }

    /// Current value mapped to `[0.0, 1.0]`.
    pub fn get_normalized(&self, param: EqParam) -> f32 {
        param.descriptor().normalize(self.get(param))
    }

    /// Writes a host-normalized `[0.0, 1.0]` value.
    pub fn set_normalized(&self, param: EqParam, normalized: f32) -> f32 {
        self.set(param, param.descriptor().denormalize(normalized))
    }

    /// Writes every field of `snapshot`.
    pub fn apply_snapshot(&self, snapshot: &ParameterSnapshot) {
        for param in EqParam::ALL {
            self.set(param, param.read(snapshot));
        }
    }

    /// Restores every default.
    pub fn reset_to_defaults(&self) {
        for param in EqParam::ALL {
            self.set(param, param.descriptor().default);
        }
    }

    /// Counter bumped by every effective write.
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Acquire)
    }

    /// Reads all values into an immutable snapshot.
    pub fn snapshot(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            peak_frequency_hz: self.get(EqParam::PeakFrequency),
            peak_gain_db: self.get(EqParam::PeakGain),
            peak_quality: self.get(EqParam::PeakQuality),
            low_cut_frequency_hz: self.get(EqParam::LowCutFrequency),
            high_cut_frequency_hz: self.get(EqParam::HighCutFrequency),
            low_cut_slope: Slope::from_host_value(self.get(EqParam::LowCutSlope)),
            high_cut_slope: Slope::from_host_value(self.get(EqParam::HighCutSlope)),
        }
    }

    /// `(param, value)` pairs in index order.
    pub fn values(&self) -> impl Iterator<Item = (EqParam, f32)> + '_ {
        EqParam::ALL.into_iter().map(|p| (p, self.get(p)))
    }
}
