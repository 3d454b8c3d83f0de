//! Parameter descriptors.
//!
//! A [`ParamDescriptor`] carries everything a host needs to present and
//! bound one equalizer parameter: display names, unit, range, default,
//! stable identifiers and the normalization curve used for 0..1 host
//! values.
//!
//! ```rust
//! use vonic_core::{ParamDescriptor, ParamId};
//!
//! let cutoff = ParamDescriptor::frequency_hz("Low Cut", "LowCut", 20.0)
//!     .with_id(ParamId(3), "low_cut_frequency_hz");
//!
//! assert_eq!(cutoff.clamp(5.0), 20.0);
//! assert!((cutoff.denormalize(cutoff.normalize(1000.0)) - 1000.0).abs() < 0.5);
//! ```
//!
//! This module is `no_std` and allocation-free.

/// Mapping between plain values and normalized `[0.0, 1.0]`.
///
/// - **Linear**: `(value - min) / (max - min)`
/// - **Logarithmic**: `ln(value/min) / ln(max/min)`, for frequencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamScale {
    /// Equal resolution across the range.
    #[default]
    Linear,
    /// More resolution at low values. Requires `min > 0`.
    Logarithmic,
}

/// Stable numeric parameter identifier.
///
/// Once published an id never changes meaning; hosts record automation and
/// sessions against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParamId(pub u32);

/// Host capability flags.
///
/// ```rust
/// use vonic_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Host may automate the parameter.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Parameter takes integer steps only.
    pub const STEPPED: Self = Self(1 << 1);

    /// True if every bit of `other` is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of both flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Unit of a parameter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels.
    Decibels,
    /// Hertz.
    Hertz,
    /// Dimensionless (quality, slope index).
    None,
}

impl ParamUnit {
    /// Display suffix, including the leading space.
    ///
    /// ```rust
    /// use vonic_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Hertz.suffix(), " Hz");
    /// assert_eq!(ParamUnit::None.suffix(), "");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Hertz => " Hz",
            ParamUnit::None => "",
        }
    }
}

/// Metadata for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full display name.
    pub name: &'static str,
    /// Name for narrow displays, at most 8 characters.
    pub short_name: &'static str,
    /// Value unit.
    pub unit: ParamUnit,
    /// Lowest accepted value.
    pub min: f32,
    /// Highest accepted value.
    pub max: f32,
    /// Value on construction and after a reset to defaults.
    pub default: f32,
    /// Suggested increment for encoders and CLI help.
    pub step: f32,
    /// Stable numeric id.
    pub id: ParamId,
    /// Stable string id, also the snapshot field name.
    pub string_id: &'static str,
    /// Normalization curve.
    pub scale: ParamScale,
    /// Host capability flags.
    pub flags: ParamFlags,
}

impl ParamDescriptor {
    /// Audible-band frequency, 20 Hz to 20 kHz, logarithmic.
    pub const fn frequency_hz(name: &'static str, short_name: &'static str, default: f32) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Hertz,
            min: 20.0,
            max: 20000.0,
            default,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Logarithmic,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Gain in dB with a custom range.
    pub const fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Decibels,
            min,
            max,
            default,
            step: 0.5,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Filter quality, 0.1 to 10.
    pub const fn quality(name: &'static str, short_name: &'static str, default: f32) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min: 0.1,
            max: 10.0,
            default,
            step: 0.05,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
        }
    }

    /// Cut-filter slope index, 0 (12 dB/oct) to 3 (48 dB/oct).
    pub const fn slope(name: &'static str, short_name: &'static str) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min: 0.0,
            max: 3.0,
            default: 0.0,
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
        }
    }

    /// Sets the numeric and string ids.
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Whether the parameter only takes whole steps.
    pub const fn is_stepped(&self) -> bool {
        self.flags.contains(ParamFlags::STEPPED)
    }

    /// Clamps into `[min, max]`, rounding stepped parameters.
    ///
    /// NaN maps to the default.
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default;
        }
        let value = value.clamp(self.min, self.max);
        if self.is_stepped() {
            libm::roundf(value)
        } else {
            value
        }
    }

    /// Plain value to `[0.0, 1.0]`.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        let range = self.max - self.min;
        if range == 0.0 {
            return 0.0;
        }
        let n = match self.scale {
            ParamScale::Linear => (value - self.min) / range,
            ParamScale::Logarithmic => {
                if self.min <= 0.0 || value <= 0.0 {
                    return 0.0;
                }
                libm::logf(value / self.min) / libm::logf(self.max / self.min)
            }
        };
        n.clamp(0.0, 1.0)
    }

    /// `[0.0, 1.0]` back to a plain value. Inverse of [`normalize`](Self::normalize).
    #[inline]
    pub fn denormalize(&self, normalized: f32) -> f32 {
        let n = normalized.clamp(0.0, 1.0);
        match self.scale {
            ParamScale::Linear => self.min + n * (self.max - self.min),
            ParamScale::Logarithmic => self.min * libm::powf(self.max / self.min, n),
        }
    }
}
