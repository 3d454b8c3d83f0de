//! Mathematical utility functions for DSP.
//!
//! Allocation-free helpers shared by the coefficient calculator and the
//! filter stages. All functions are `no_std` compatible.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//!
//! # Utilities
//!
//! - [`flush_denormal`] - Zero out values near the subnormal range
//! - [`nyquist`] - Half the sample rate

use libm::{exp, log10};

/// Convert decibels to linear gain.
///
/// Uses the standard amplitude conversion `10^(dB/20)`, so 0 dB is unity.
///
/// # Example
/// ```rust
/// use vonic_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 1e-12);
/// assert!((db_to_linear(-6.0206) - 0.5).abs() < 1e-4);
/// assert!((db_to_linear(6.0206) - 2.0).abs() < 1e-4);
/// ```
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f64 = core::f64::consts::LN_10 / 20.0;
    exp(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Inputs at or below zero are floored at -200 dB.
///
/// # Example
/// ```rust
/// use vonic_core::linear_to_db;
///
/// assert!(linear_to_db(1.0).abs() < 1e-12);
/// assert!((linear_to_db(0.5) + 6.0206).abs() < 1e-3);
/// ```
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    20.0 * log10(linear.max(1e-10))
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Subnormal floats cause severe CPU slowdowns on most architectures. The
/// recursive part of a biquad decays toward zero indefinitely after the
/// input goes silent, so the feedback registers are passed through here.
///
/// Reference: IEEE 754-2008, Section 3.4 (Subnormal numbers)
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Nyquist frequency for a sample rate.
#[inline]
pub fn nyquist(sample_rate: f64) -> f64 {
    sample_rate * 0.5
}
