//! Vonic Core - real-time signal path of a three-band equalizer
//!
//! Each channel runs a fixed cascade:
//!
//! ```text
//! low cut (1-4 biquads) ─► peak (1 biquad) ─► high cut (1-4 biquads)
//! ```
//!
//! Coefficients are recomputed from user-facing parameters whenever they
//! change and swapped into the cascade between audio blocks.
//!
//! # Components
//!
//! - [`design`] - Coefficient calculator: RBJ peaking section and
//!   Butterworth cut cascades from a [`ParameterSnapshot`]
//! - [`Biquad`] - One Direct Form I section with a bypass flag
//! - [`CutChain`] / [`FilterChain`] - Slot-based cascade with slope-driven
//!   enabling
//! - [`ChannelProcessor`] - Stereo pair of chains with the
//!   prepare/reset/process contract
//! - [`ParamDescriptor`] - Ranges, units and ids for host parameters
//!
//! # Example
//!
//! ```rust
//! use vonic_core::{ChannelProcessor, ParameterSnapshot, Slope};
//!
//! let mut eq = ChannelProcessor::new();
//! eq.prepare(48000.0, 256).unwrap();
//! eq.update_from_parameters(&ParameterSnapshot {
//!     low_cut_frequency_hz: 80.0,
//!     peak_frequency_hz: 1000.0,
//!     peak_gain_db: 6.0,
//!     high_cut_frequency_hz: 12000.0,
//!     high_cut_slope: Slope::Db24,
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let mut left = [0.0_f32; 256];
//! let mut right = [0.0_f32; 256];
//! eq.process(&mut left, &mut right).unwrap();
//! ```
//!
//! # no_std Support
//!
//! Disable the default `std` feature for embedded targets:
//!
//! ```toml
//! [dependencies]
//! vonic-core = { version = "0.1", default-features = false }
//! ```
//!
//! The optional `tracing` feature logs control-side events (prepare,
//! rejected parameters). The processing path never logs.

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod chain;
pub mod design;
pub mod error;
pub mod math;
pub mod param_info;
pub mod processor;
pub mod snapshot;

pub use biquad::{Biquad, BiquadCoefficients, BiquadState};
pub use chain::{ChainPosition, CutChain, FilterChain};
pub use design::{
    CoefficientSet, CutCoefficients, MAX_SECTIONS, butterworth_highpass, butterworth_lowpass,
    butterworth_section_q, design, peak_coefficients,
};
pub use error::{EqError, InvalidReason, Result};
pub use math::{db_to_linear, flush_denormal, linear_to_db, nyquist};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit};
pub use processor::{Channel, ChannelProcessor};
pub use snapshot::{NYQUIST_HEADROOM, ParameterSnapshot, Slope, validate_sample_rate};
