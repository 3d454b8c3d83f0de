//! Parameter snapshot and cut-filter slope.
//!
//! A [`ParameterSnapshot`] is the immutable set of user-facing values the
//! coefficient calculator consumes. It is created fresh for every recompute
//! and never mutated afterwards.

use crate::error::{EqError, InvalidReason, Result};
use crate::math::nyquist;
use core::fmt;

/// Roll-off steepness of a cut filter.
///
/// Each step adds one cascaded second-order section (12 dB/octave):
///
/// | Slope | Sections | Butterworth order |
/// |-------|----------|-------------------|
/// | `Db12` | 1 | 2 |
/// | `Db24` | 2 | 4 |
/// | `Db36` | 3 | 6 |
/// | `Db48` | 4 | 8 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Slope {
    /// 12 dB per octave.
    #[default]
    Db12,
    /// 24 dB per octave.
    Db24,
    /// 36 dB per octave.
    Db36,
    /// 48 dB per octave.
    Db48,
}

impl Slope {
    /// All slopes in ascending steepness.
    pub const ALL: [Slope; 4] = [Slope::Db12, Slope::Db24, Slope::Db36, Slope::Db48];

    /// Zero-based ordinal (`Db12` = 0 ... `Db48` = 3).
    pub const fn index(self) -> u8 {
        match self {
            Slope::Db12 => 0,
            Slope::Db24 => 1,
            Slope::Db36 => 2,
            Slope::Db48 => 3,
        }
    }

    /// Number of active cascade sections, `index + 1`.
    pub const fn sections(self) -> usize {
        self.index() as usize + 1
    }

    /// Butterworth filter order, twice the section count.
    pub const fn order(self) -> usize {
        2 * self.sections()
    }

    /// Roll-off in dB per octave.
    pub const fn db_per_octave(self) -> u32 {
        12 * self.sections() as u32
    }

    /// Slope from its ordinal.
    pub const fn from_index(index: u8) -> Result<Self> {
        match index {
            0 => Ok(Slope::Db12),
            1 => Ok(Slope::Db24),
            2 => Ok(Slope::Db36),
            3 => Ok(Slope::Db48),
            _ => Err(EqError::InvalidSlope(index)),
        }
    }

    /// Slope from a host float parameter (`0.0..=3.0`).
    ///
    /// Rounds to the nearest ordinal and clamps into range; NaN maps to
    /// [`Slope::Db12`].
    pub fn from_host_value(value: f32) -> Self {
        if value.is_nan() {
            return Slope::Db12;
        }
        let index = libm::roundf(value.clamp(0.0, 3.0)) as u8;
        Self::ALL[index as usize]
    }

    /// Slope from a dB-per-octave figure (12, 24, 36 or 48).
    pub const fn from_db_per_octave(db: u32) -> Option<Self> {
        match db {
            12 => Some(Slope::Db12),
            24 => Some(Slope::Db24),
            36 => Some(Slope::Db36),
            48 => Some(Slope::Db48),
            _ => None,
        }
    }
}

impl fmt::Display for Slope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} dB/oct", self.db_per_octave())
    }
}

/// Fraction of Nyquist used by [`ParameterSnapshot::clamped_below_nyquist`].
pub const NYQUIST_HEADROOM: f32 = 0.99;

/// Immutable view of every equalizer parameter at one instant.
///
/// Defaults give a flat response with the cut filters parked at the edges
/// of the audible band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSnapshot {
    /// Peak band centre frequency in Hz.
    pub peak_frequency_hz: f32,
    /// Peak band gain in dB (positive boosts, negative cuts).
    pub peak_gain_db: f32,
    /// Peak band quality; higher is narrower.
    pub peak_quality: f32,
    /// Low-cut (high-pass) cutoff in Hz.
    pub low_cut_frequency_hz: f32,
    /// High-cut (low-pass) cutoff in Hz.
    pub high_cut_frequency_hz: f32,
    /// Low-cut roll-off.
    pub low_cut_slope: Slope,
    /// High-cut roll-off.
    pub high_cut_slope: Slope,
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        Self {
            peak_frequency_hz: 750.0,
            peak_gain_db: 0.0,
            peak_quality: 1.0,
            low_cut_frequency_hz: 20.0,
            high_cut_frequency_hz: 20000.0,
            low_cut_slope: Slope::Db12,
            high_cut_slope: Slope::Db12,
        }
    }
}

impl ParameterSnapshot {
    /// Checks every value against what the filter design can honour at
    /// `sample_rate`.
    ///
    /// Frequencies must be finite, positive and strictly below Nyquist;
    /// quality must be finite and positive; gain must be finite. Nothing is
    /// clamped: the first violation is returned.
    pub fn validate(&self, sample_rate: f64) -> Result<()> {
        validate_sample_rate(sample_rate)?;
        let nyquist = nyquist(sample_rate);

        check_frequency("peak_frequency_hz", self.peak_frequency_hz, nyquist)?;
        check_positive("peak_quality", self.peak_quality)?;
        check_finite("peak_gain_db", self.peak_gain_db)?;
        check_frequency("low_cut_frequency_hz", self.low_cut_frequency_hz, nyquist)?;
        check_frequency("high_cut_frequency_hz", self.high_cut_frequency_hz, nyquist)?;
        Ok(())
    }

    /// Copy with every frequency pulled below Nyquist.
    ///
    /// For adapters whose parameter ranges can exceed Nyquist at low sample
    /// rates. Frequencies above `NYQUIST_HEADROOM * nyquist` are set to that
    /// limit; everything else is unchanged.
    pub fn clamped_below_nyquist(self, sample_rate: f64) -> Self {
        let limit = (nyquist(sample_rate) as f32) * NYQUIST_HEADROOM;
        let clamp = |hz: f32| if hz > limit { limit } else { hz };
        Self {
            peak_frequency_hz: clamp(self.peak_frequency_hz),
            low_cut_frequency_hz: clamp(self.low_cut_frequency_hz),
            high_cut_frequency_hz: clamp(self.high_cut_frequency_hz),
            ..self
        }
    }
}

/// Sample rates must be finite and positive.
pub fn validate_sample_rate(sample_rate: f64) -> Result<()> {
    if !sample_rate.is_finite() {
        return Err(EqError::invalid(
            "sample_rate",
            sample_rate,
            InvalidReason::NotFinite,
        ));
    }
    if sample_rate <= 0.0 {
        return Err(EqError::invalid(
            "sample_rate",
            sample_rate,
            InvalidReason::NotPositive,
        ));
    }
    Ok(())
}

pub(crate) fn check_finite(param: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EqError::invalid(
            param,
            f64::from(value),
            InvalidReason::NotFinite,
        ))
    }
}

pub(crate) fn check_positive(param: &'static str, value: f32) -> Result<()> {
    check_finite(param, value)?;
    if value <= 0.0 {
        return Err(EqError::invalid(
            param,
            f64::from(value),
            InvalidReason::NotPositive,
        ));
    }
    Ok(())
}

pub(crate) fn check_frequency(param: &'static str, hz: f32, nyquist: f64) -> Result<()> {
    check_positive(param, hz)?;
    if f64::from(hz) >= nyquist {
        return Err(EqError::invalid(
            param,
            f64::from(hz),
            InvalidReason::AtOrAboveNyquist,
        ));
    }
    Ok(())
}
