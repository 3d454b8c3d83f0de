//! Host-facing layer for the vonic equalizer.
//!
//! This crate provides:
//!
//! - **Parameters**: [`ParameterStore`], a lock-free store of the seven
//!   equalizer parameters with descriptor-bounded writes, and [`EqParam`]
//! - **Single-context engine**: [`Equalizer`] with `prepare` / `reset` /
//!   `process` / `update_filters`
//! - **Realtime split**: [`EqualizerController`] and [`EqualizerRenderer`]
//!   joined by a wait-free ring of [`ControlMessage`]s
//!
//! ## Quick Start
//!
//! ```rust
//! use vonic_engine::{EqParam, Equalizer, ParameterStore};
//!
//! let params = ParameterStore::new();
//! params.set(EqParam::PeakGain, 4.5);
//!
//! let mut eq = Equalizer::new(params.clone());
//! eq.prepare(48000.0, 256).unwrap();
//!
//! let mut left = vec![0.0_f32; 256];
//! let mut right = vec![0.0_f32; 256];
//! eq.process(&mut left, &mut right).unwrap();
//!
//! // Later, from a control thread
//! params.set(EqParam::LowCutFrequency, 80.0);
//! eq.process(&mut left, &mut right).unwrap(); // picks up the change
//! ```

mod equalizer;
mod error;
pub mod handoff;
pub mod params;

pub use equalizer::{Equalizer, EqualizerController, EqualizerRenderer};
pub use error::{EngineError, Result};
pub use handoff::{ControlMessage, DEFAULT_CAPACITY};
pub use params::{EqParam, ParameterStore};
