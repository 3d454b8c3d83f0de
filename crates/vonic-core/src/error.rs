//! Error type for the equalizer core.
//!
//! [`EqError`] is `Copy` and carries no heap data, so the audio path can
//! return it without allocating. With the `std` feature it implements
//! [`std::error::Error`] so host crates can wrap it with `thiserror`.

use core::fmt;

/// Result alias used across `vonic-core`.
pub type Result<T> = core::result::Result<T, EqError>;

/// Errors reported by the coefficient calculator, filter chains and the
/// channel processor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EqError {
    /// A parameter is outside the range the filter design can honour.
    ///
    /// Recomputation is aborted and previously loaded coefficients stay
    /// in place.
    InvalidParameter {
        /// Name of the offending parameter (e.g. `"low_cut_frequency_hz"`).
        param: &'static str,
        /// The rejected value.
        value: f64,
        /// Why the value was rejected.
        reason: InvalidReason,
    },
    /// `process` was called before `prepare`.
    Unprepared,
    /// A block was longer than the `max_block_size` given to `prepare`.
    BlockTooLarge {
        /// Samples in the offending block.
        len: usize,
        /// Maximum block size established by `prepare`.
        max: usize,
    },
    /// Left and right buffers had different lengths.
    ChannelLengthMismatch {
        /// Left channel length.
        left: usize,
        /// Right channel length.
        right: usize,
    },
    /// A cascade slot index outside `0..4`.
    SlotOutOfRange(usize),
    /// A slope index outside `0..=3`.
    InvalidSlope(u8),
}

/// Reason attached to [`EqError::InvalidParameter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Value was NaN or infinite.
    NotFinite,
    /// Value was zero or negative where a positive value is required.
    NotPositive,
    /// Frequency at or above half the sample rate.
    AtOrAboveNyquist,
}

impl EqError {
    /// Shorthand for building an [`EqError::InvalidParameter`].
    pub const fn invalid(param: &'static str, value: f64, reason: InvalidReason) -> Self {
        Self::InvalidParameter {
            param,
            value,
            reason,
        }
    }

    /// True for parameter/configuration errors that the control context
    /// should surface to the user.
    pub const fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFinite => write!(f, "must be finite"),
            Self::NotPositive => write!(f, "must be greater than zero"),
            Self::AtOrAboveNyquist => write!(f, "must be below the Nyquist frequency"),
        }
    }
}

impl fmt::Display for EqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter {
                param,
                value,
                reason,
            } => write!(f, "invalid parameter {param} = {value}: {reason}"),
            Self::Unprepared => write!(f, "process called before prepare"),
            Self::BlockTooLarge { len, max } => {
                write!(f, "block of {len} samples exceeds max block size {max}")
            }
            Self::ChannelLengthMismatch { left, right } => {
                write!(f, "channel lengths differ (left {left}, right {right})")
            }
            Self::SlotOutOfRange(slot) => write!(f, "cascade slot {slot} out of range (0..4)"),
            Self::InvalidSlope(index) => write!(f, "slope index {index} out of range (0..=3)"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EqError {}
