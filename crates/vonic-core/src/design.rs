//! Coefficient calculator.
//!
//! Pure functions mapping a [`ParameterSnapshot`] and a sample rate to the
//! coefficients of every band:
//!
//! - **Peak**: one RBJ peaking section.
//! - **Low cut**: Butterworth high-pass of order `2 * sections`, factorized
//!   into cascaded second-order sections.
//! - **High cut**: the matching Butterworth low-pass.
//!
//! # Butterworth factorization
//!
//! An even-order Butterworth filter of order `N` has `N/2` conjugate pole
//! pairs. Each pair becomes one second-order section with the same cutoff
//! and quality
//!
//! ```text
//! Q_k = 1 / (2 cos((2k + 1) * pi / (2N)))     k = 0 .. N/2 - 1
//! ```
//!
//! Section `k` always lands in cascade slot `k`, so slot 0 carries the
//! lowest-Q pair and is present for every slope.
//!
//! Nothing here clamps: invalid input is reported as
//! [`EqError::InvalidParameter`] and no coefficients are produced. There is
//! no hidden state, so every function is safe to call from any non-realtime
//! thread.

use crate::biquad::BiquadCoefficients;
use crate::error::Result;
use crate::math::nyquist;
use crate::snapshot::{
    ParameterSnapshot, Slope, check_finite, check_frequency, check_positive,
    validate_sample_rate,
};
use core::f64::consts::PI;
use libm::{cos, log10};

/// Maximum number of cascaded sections in a cut band.
pub const MAX_SECTIONS: usize = 4;

/// Quality of section `section` in an order-`order` Butterworth cascade.
///
/// # Example
/// ```rust
/// use vonic_core::design::butterworth_section_q;
///
/// // Second order: the classic 1/sqrt(2)
/// assert!((butterworth_section_q(2, 0) - core::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
/// ```
pub fn butterworth_section_q(order: usize, section: usize) -> f64 {
    let n = order as f64;
    let k = section as f64;
    1.0 / (2.0 * cos((2.0 * k + 1.0) * PI / (2.0 * n)))
}

/// Coefficients for one cut band: four cascade slots plus the slope that
/// selects how many are active.
///
/// Slots at or beyond `slope.sections()` hold [`BiquadCoefficients::IDENTITY`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CutCoefficients {
    sections: [BiquadCoefficients; MAX_SECTIONS],
    slope: Slope,
}

impl CutCoefficients {
    /// All slots identity.
    pub const fn passthrough(slope: Slope) -> Self {
        Self {
            sections: [BiquadCoefficients::IDENTITY; MAX_SECTIONS],
            slope,
        }
    }

    /// Slope these coefficients were designed for.
    pub fn slope(&self) -> Slope {
        self.slope
    }

    /// The sections that will be enabled, in cascade order.
    pub fn active(&self) -> &[BiquadCoefficients] {
        &self.sections[..self.slope.sections()]
    }

    /// Coefficients for one cascade slot.
    pub fn slot(&self, index: usize) -> Option<&BiquadCoefficients> {
        self.sections.get(index)
    }

    /// All four slots, including the unused identity ones.
    pub fn slots(&self) -> &[BiquadCoefficients; MAX_SECTIONS] {
        &self.sections
    }

    /// Linear magnitude of the active cascade at `frequency`.
    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        self.active()
            .iter()
            .map(|c| c.magnitude_at(frequency, sample_rate))
            .product()
    }
}

/// Every coefficient the equalizer needs for one snapshot and sample rate.
///
/// `Copy` so it can be handed to the audio thread by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientSet {
    /// Peak (bell) band.
    pub peak: BiquadCoefficients,
    /// Low-cut (high-pass) band.
    pub low_cut: CutCoefficients,
    /// High-cut (low-pass) band.
    pub high_cut: CutCoefficients,
}

impl CoefficientSet {
    /// A set that leaves audio untouched.
    pub const fn passthrough() -> Self {
        Self {
            peak: BiquadCoefficients::IDENTITY,
            low_cut: CutCoefficients::passthrough(Slope::Db12),
            high_cut: CutCoefficients::passthrough(Slope::Db12),
        }
    }

    /// Linear magnitude of the whole chain at `frequency`.
    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        self.low_cut.magnitude_at(frequency, sample_rate)
            * self.peak.magnitude_at(frequency, sample_rate)
            * self.high_cut.magnitude_at(frequency, sample_rate)
    }

    /// Magnitude of the whole chain at `frequency` in dB.
    pub fn magnitude_db_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        20.0 * log10(self.magnitude_at(frequency, sample_rate).max(1e-10))
    }
}

impl Default for CoefficientSet {
    fn default() -> Self {
        Self::passthrough()
    }
}

/// Designs every band for `snapshot` at `sample_rate`.
///
/// Validates the whole snapshot first; on error nothing is designed.
///
/// # Example
/// ```rust
/// use vonic_core::{ParameterSnapshot, Slope, design};
///
/// let snapshot = ParameterSnapshot {
///     low_cut_frequency_hz: 80.0,
///     low_cut_slope: Slope::Db24,
///     ..Default::default()
/// };
/// let set = design(&snapshot, 48000.0).unwrap();
/// assert_eq!(set.low_cut.active().len(), 2);
/// ```
pub fn design(snapshot: &ParameterSnapshot, sample_rate: f64) -> Result<CoefficientSet> {
    snapshot.validate(sample_rate)?;

    Ok(CoefficientSet {
        peak: BiquadCoefficients::peaking(
            f64::from(snapshot.peak_frequency_hz),
            f64::from(snapshot.peak_quality),
            f64::from(snapshot.peak_gain_db),
            sample_rate,
        ),
        low_cut: cascade(
            snapshot.low_cut_frequency_hz,
            snapshot.low_cut_slope,
            sample_rate,
            BiquadCoefficients::highpass,
        ),
        high_cut: cascade(
            snapshot.high_cut_frequency_hz,
            snapshot.high_cut_slope,
            sample_rate,
            BiquadCoefficients::lowpass,
        ),
    })
}

/// Peaking coefficients for the bell band.
pub fn peak_coefficients(
    frequency_hz: f32,
    quality: f32,
    gain_db: f32,
    sample_rate: f64,
) -> Result<BiquadCoefficients> {
    validate_sample_rate(sample_rate)?;
    check_frequency("peak_frequency_hz", frequency_hz, nyquist(sample_rate))?;
    check_positive("peak_quality", quality)?;
    check_finite("peak_gain_db", gain_db)?;

    Ok(BiquadCoefficients::peaking(
        f64::from(frequency_hz),
        f64::from(quality),
        f64::from(gain_db),
        sample_rate,
    ))
}

/// Butterworth high-pass cascade for the low-cut band.
pub fn butterworth_highpass(
    frequency_hz: f32,
    slope: Slope,
    sample_rate: f64,
) -> Result<CutCoefficients> {
    validate_sample_rate(sample_rate)?;
    check_frequency("low_cut_frequency_hz", frequency_hz, nyquist(sample_rate))?;
    Ok(cascade(
        frequency_hz,
        slope,
        sample_rate,
        BiquadCoefficients::highpass,
    ))
}

/// Butterworth low-pass cascade for the high-cut band.
pub fn butterworth_lowpass(
    frequency_hz: f32,
    slope: Slope,
    sample_rate: f64,
) -> Result<CutCoefficients> {
    validate_sample_rate(sample_rate)?;
    check_frequency("high_cut_frequency_hz", frequency_hz, nyquist(sample_rate))?;
    Ok(cascade(
        frequency_hz,
        slope,
        sample_rate,
        BiquadCoefficients::lowpass,
    ))
}

fn cascade(
    frequency_hz: f32,
    slope: Slope,
    sample_rate: f64,
    section: fn(f64, f64, f64) -> BiquadCoefficients,
) -> CutCoefficients {
    let mut out = CutCoefficients::passthrough(slope);
    let order = slope.order();
    for (k, slot) in out.sections.iter_mut().take(slope.sections()).enumerate() {
        *slot = section(
            f64::from(frequency_hz),
            butterworth_section_q(order, k),
            sample_rate,
        );
    }
    out
}
