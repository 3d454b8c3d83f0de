//! Biquad (bi-quadratic) filter stage.
//!
//! A single second-order IIR section: the atomic building block of the
//! equalizer cascade. Coefficients are designed in `f64` using the RBJ Audio
//! EQ Cookbook formulas (bilinear transform with frequency pre-warping) and
//! stored as normalized `f32` for processing.

use crate::math::{db_to_linear, flush_denormal};
use core::f64::consts::PI;
use libm::{cos, sin, sqrt};

/// Normalized biquad coefficients (`a0 == 1`).
///
/// Transfer function:
/// ```text
///         b0 + b1*z^-1 + b2*z^-2
/// H(z) = ------------------------
///          1 + a1*z^-1 + a2*z^-2
/// ```
///
/// Values are immutable once designed for a given parameter snapshot and
/// sample rate; a recompute replaces the whole set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward coefficient for `x[n]`.
    pub b0: f32,
    /// Feedforward coefficient for `x[n-1]`.
    pub b1: f32,
    /// Feedforward coefficient for `x[n-2]`.
    pub b2: f32,
    /// Feedback coefficient for `y[n-1]`.
    pub a1: f32,
    /// Feedback coefficient for `y[n-2]`.
    pub a2: f32,
}

impl BiquadCoefficients {
    /// Passthrough coefficients: `y[n] = x[n]`.
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Builds normalized coefficients from an unnormalized design.
    ///
    /// Divides every term by `a0`.
    pub fn from_raw(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: (b0 * a0_inv) as f32,
            b1: (b1 * a0_inv) as f32,
            b2: (b2 * a0_inv) as f32,
            a1: (a1 * a0_inv) as f32,
            a2: (a2 * a0_inv) as f32,
        }
    }

    /// Peaking (bell) EQ section.
    ///
    /// Boosts or cuts around `frequency` by `gain_db`, with bandwidth set by
    /// `q`. The linear gain is `10^(gain_db/20)`; the cookbook's `A` term is
    /// its square root. Unity at DC and Nyquist.
    ///
    /// Inputs are assumed valid (see
    /// [`ParameterSnapshot::validate`](crate::ParameterSnapshot::validate)).
    pub fn peaking(frequency: f64, q: f64, gain_db: f64, sample_rate: f64) -> Self {
        let a = sqrt(db_to_linear(gain_db));
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_omega = cos(omega);
        let alpha = sin(omega) / (2.0 * q);

        Self::from_raw(
            1.0 + alpha * a,
            -2.0 * cos_omega,
            1.0 - alpha * a,
            1.0 + alpha / a,
            -2.0 * cos_omega,
            1.0 - alpha / a,
        )
    }

    /// Second-order high-pass section with quality `q`.
    ///
    /// `q = 1/sqrt(2)` gives a 2nd-order Butterworth response; higher-order
    /// Butterworth cascades use the per-section Q values from
    /// [`butterworth_section_q`](crate::design::butterworth_section_q).
    pub fn highpass(frequency: f64, q: f64, sample_rate: f64) -> Self {
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_omega = cos(omega);
        let alpha = sin(omega) / (2.0 * q);

        Self::from_raw(
            (1.0 + cos_omega) / 2.0,
            -(1.0 + cos_omega),
            (1.0 + cos_omega) / 2.0,
            1.0 + alpha,
            -2.0 * cos_omega,
            1.0 - alpha,
        )
    }

    /// Second-order low-pass section with quality `q`.
    pub fn lowpass(frequency: f64, q: f64, sample_rate: f64) -> Self {
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_omega = cos(omega);
        let alpha = sin(omega) / (2.0 * q);

        Self::from_raw(
            (1.0 - cos_omega) / 2.0,
            1.0 - cos_omega,
            (1.0 - cos_omega) / 2.0,
            1.0 + alpha,
            -2.0 * cos_omega,
            1.0 - alpha,
        )
    }

    /// Magnitude of the frequency response at `frequency` (linear).
    ///
    /// Evaluates `|H(e^jw)|` analytically:
    /// ```text
    /// |B|^2 = b0^2 + b1^2 + b2^2 + 2(b0 b1 + b1 b2) cos w + 2 b0 b2 cos 2w
    /// |A|^2 = 1 + a1^2 + a2^2 + 2(a1 + a1 a2) cos w + 2 a2 cos 2w
    /// ```
    pub fn magnitude_at(&self, frequency: f64, sample_rate: f64) -> f64 {
        let omega = 2.0 * PI * frequency / sample_rate;
        let cos_omega = cos(omega);
        let cos_2omega = cos(2.0 * omega);

        let (b0, b1, b2) = (f64::from(self.b0), f64::from(self.b1), f64::from(self.b2));
        let (a1, a2) = (f64::from(self.a1), f64::from(self.a2));

        let num = b0 * b0
            + b1 * b1
            + b2 * b2
            + 2.0 * (b0 * b1 + b1 * b2) * cos_omega
            + 2.0 * b0 * b2 * cos_2omega;
        let den = 1.0
            + a1 * a1
            + a2 * a2
            + 2.0 * (a1 + a1 * a2) * cos_omega
            + 2.0 * a2 * cos_2omega;

        if den > 0.0 { sqrt(num.max(0.0) / den) } else { 0.0 }
    }

    /// True when both poles lie strictly inside the unit circle.
    ///
    /// Stability triangle: `|a2| < 1` and `|a1| < 1 + a2`.
    pub fn is_stable(&self) -> bool {
        self.a2.abs() < 1.0 && self.a1.abs() < 1.0 + self.a2
    }

    /// True if every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.b0.is_finite()
            && self.b1.is_finite()
            && self.b2.is_finite()
            && self.a1.is_finite()
            && self.a2.is_finite()
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Snapshot of a stage's delay registers.
///
/// Direct Form I keeps the two previous inputs and the two previous outputs.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BiquadState {
    /// `x[n-1]`
    pub x1: f32,
    /// `x[n-2]`
    pub x2: f32,
    /// `y[n-1]`
    pub y1: f32,
    /// `y[n-2]`
    pub y2: f32,
}

impl BiquadState {
    /// True if every register is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// One cascade stage: coefficients, delay registers and a bypass flag.
///
/// Implements the Direct Form I biquad structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// A stage is either *active* (runs the difference equation) or *bypassed*
/// (returns its input and leaves the registers alone). Bypass is toggled
/// between blocks by the owning cascade.
#[derive(Debug, Clone)]
pub struct Biquad {
    coeffs: BiquadCoefficients,
    state: BiquadState,
    bypassed: bool,
}

impl Biquad {
    /// Creates an active stage with passthrough coefficients.
    pub fn new() -> Self {
        Self {
            coeffs: BiquadCoefficients::IDENTITY,
            state: BiquadState::default(),
            bypassed: false,
        }
    }

    /// Creates an active stage with the given coefficients.
    pub fn with_coefficients(coeffs: BiquadCoefficients) -> Self {
        Self {
            coeffs,
            ..Self::new()
        }
    }

    /// Replaces the coefficients.
    ///
    /// Delay registers and bypass state are untouched; the new response
    /// applies from the next processed sample with no interpolation.
    #[inline]
    pub fn set_coefficients(&mut self, coeffs: BiquadCoefficients) {
        self.coeffs = coeffs;
    }

    /// Current coefficients.
    #[inline]
    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coeffs
    }

    /// Enables or bypasses the stage.
    #[inline]
    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.bypassed = bypassed;
    }

    /// Whether the stage is bypassed.
    #[inline]
    pub fn is_bypassed(&self) -> bool {
        self.bypassed
    }

    /// Processes a single sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        if self.bypassed {
            return input;
        }

        let c = &self.coeffs;
        let s = &mut self.state;
        let output = c.b0 * input + c.b1 * s.x1 + c.b2 * s.x2 - c.a1 * s.y1 - c.a2 * s.y2;

        s.x2 = s.x1;
        s.x1 = input;
        s.y2 = s.y1;
        s.y1 = flush_denormal(output);

        output
    }

    /// Clears the delay registers without changing coefficients or bypass.
    pub fn clear(&mut self) {
        self.state = BiquadState::default();
    }

    /// Read-only view of the delay registers.
    #[inline]
    pub fn state(&self) -> BiquadState {
        self.state
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}
