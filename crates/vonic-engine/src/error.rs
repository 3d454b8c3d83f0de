//! Engine error type.

use vonic_core::EqError;

/// Errors from the host-facing engine layer.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The DSP core rejected an operation.
    #[error(transparent)]
    Core(#[from] EqError),

    /// The renderer stopped draining its message queue.
    #[error("control queue full ({capacity} messages pending)")]
    QueueFull {
        /// Capacity of the ring.
        capacity: usize,
    },

    /// No parameter matches the given name or id.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),
}

impl EngineError {
    /// True when the wrapped core error is a rejected parameter value.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_invalid_parameter())
    }
}

/// Convenience result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
