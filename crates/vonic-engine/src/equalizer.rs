//! Host-facing equalizer.
//!
//! Two ways to drive the signal path:
//!
//! - [`Equalizer`]: everything on one thread (offline rendering, tests).
//!   Parameters are polled from the [`ParameterStore`] at each block.
//! - [`Equalizer::into_realtime`]: splits into an [`EqualizerController`]
//!   for the control thread and an [`EqualizerRenderer`] for the audio
//!   thread, joined by the lock-free [`handoff`](crate::handoff) ring.
//!
//! ```text
//!  control thread                          audio thread
//! ┌──────────────────────┐   rtrb ring   ┌──────────────────────┐
//! │ EqualizerController  │──────────────►│ EqualizerRenderer    │
//! │  ParameterStore      │  Prepare      │  ChannelProcessor    │
//! │  design()            │  Reset        │  (drains per block)  │
//! │  tracing             │  Coefficients │                      │
//! └──────────────────────┘               └──────────────────────┘
//! ```

use crate::error::{EngineError, Result};
use crate::handoff::{ControlMessage, ControlReceiver, ControlSender, control_channel};
use crate::params::ParameterStore;
use vonic_core::{
    ChannelProcessor, CoefficientSet, EqError, InvalidReason, ParameterSnapshot, design,
    validate_sample_rate,
};

/// Reads the store into a snapshot, optionally pulled below Nyquist.
fn read_snapshot(
    params: &ParameterStore,
    clamp_nyquist: bool,
    sample_rate: f64,
) -> ParameterSnapshot {
    let snapshot = params.snapshot();
    if clamp_nyquist {
        snapshot.clamped_below_nyquist(sample_rate)
    } else {
        snapshot
    }
}

/// Single-context equalizer: parameter store plus stereo processor.
#[derive(Debug)]
pub struct Equalizer {
    params: ParameterStore,
    processor: ChannelProcessor,
    last_generation: Option<u64>,
    clamp_nyquist: bool,
}

impl Equalizer {
    /// Equalizer reading from `params`.
    pub fn new(params: ParameterStore) -> Self {
        Self {
            params,
            processor: ChannelProcessor::new(),
            last_generation: None,
            clamp_nyquist: false,
        }
    }

    /// Pulls frequencies above Nyquist down instead of rejecting them.
    ///
    /// Off by default; useful when descriptor ranges (up to 20 kHz) exceed
    /// what a low sample rate can represent.
    pub fn with_nyquist_clamping(mut self, enabled: bool) -> Self {
        self.clamp_nyquist = enabled;
        self
    }

    /// The parameter store this equalizer polls.
    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    /// Prepares for streaming at `sample_rate` with blocks of at most
    /// `max_block_size` samples, designing the current parameters.
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> Result<()> {
        let generation = self.params.generation();
        let snapshot = read_snapshot(&self.params, self.clamp_nyquist, sample_rate);
        self.processor
            .prepare_with_parameters(sample_rate, max_block_size, &snapshot)?;
        self.last_generation = Some(generation);
        tracing::debug!(sample_rate, max_block_size, "equalizer prepared");
        Ok(())
    }

    /// Clears filter state.
    pub fn reset(&mut self) {
        self.processor.reset();
    }

    /// Re-reads parameters and recomputes coefficients if they changed.
    ///
    /// Returns `Ok(true)` when new coefficients were loaded. A rejected
    /// parameter set is reported once; the previous coefficients stay in
    /// place until the parameters change again.
    pub fn update_filters(&mut self) -> Result<bool> {
        let sample_rate = self.processor.sample_rate().ok_or(EqError::Unprepared)?;
        let generation = self.params.generation();
        if self.last_generation == Some(generation) {
            return Ok(false);
        }
        self.last_generation = Some(generation);

        let snapshot = read_snapshot(&self.params, self.clamp_nyquist, sample_rate);
        if self.processor.snapshot() == Some(&snapshot) {
            return Ok(false);
        }
        self.processor.update_from_parameters(&snapshot)?;
        tracing::debug!(generation, "coefficients recomputed");
        Ok(true)
    }

    /// Applies pending parameter changes, then filters one stereo block in
    /// place.
    ///
    /// A rejected parameter change does not stop processing: the block runs
    /// with the previous coefficients.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) -> Result<()> {
        match self.update_filters() {
            Ok(_) => {}
            Err(err) if err.is_invalid_parameter() => {}
            Err(err) => return Err(err),
        }
        self.processor.process(left, right)?;
        Ok(())
    }

    /// The underlying processor.
    pub fn processor(&self) -> &ChannelProcessor {
        &self.processor
    }

    /// The underlying processor, mutably (band bypass, per-channel access).
    pub fn processor_mut(&mut self) -> &mut ChannelProcessor {
        &mut self.processor
    }

    /// Splits into a control half and an audio half joined by a ring of
    /// `capacity` messages.
    ///
    /// Filter state, coefficients and the prepared rate carry over to the
    /// renderer.
    pub fn into_realtime(mut self, capacity: usize) -> (EqualizerController, EqualizerRenderer) {
        let (sender, receiver) = control_channel(capacity);
        let published = self.processor.detach_parameters();
        let controller = EqualizerController {
            params: self.params,
            sender,
            sample_rate: self.processor.sample_rate(),
            last_generation: self.last_generation,
            published,
            clamp_nyquist: self.clamp_nyquist,
        };
        let renderer = EqualizerRenderer {
            processor: self.processor,
            receiver,
        };
        (controller, renderer)
    }
}

/// Control-thread half of a split equalizer.
///
/// Designs coefficients and sends them to the renderer. May allocate and
/// log; never touches filter state directly.
pub struct EqualizerController {
    params: ParameterStore,
    sender: ControlSender,
    sample_rate: Option<f64>,
    last_generation: Option<u64>,
    published: Option<ParameterSnapshot>,
    clamp_nyquist: bool,
}

impl EqualizerController {
    /// The parameter store this controller polls.
    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    /// Sample rate of the last successful `prepare`.
    pub fn sample_rate(&self) -> Option<f64> {
        self.sample_rate
    }

    /// Messages the renderer has not drained yet.
    pub fn pending(&self) -> usize {
        self.sender.pending()
    }

    /// Requests a stream (re)start and sends coefficients for the current
    /// parameters at the new rate.
    ///
    /// Both messages are queued together or not at all.
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> Result<()> {
        validate_sample_rate(sample_rate)?;
        if max_block_size == 0 {
            return Err(EqError::invalid("max_block_size", 0.0, InvalidReason::NotPositive).into());
        }

        let generation = self.params.generation();
        let snapshot = read_snapshot(&self.params, self.clamp_nyquist, sample_rate);
        let set = self.design_logged(&snapshot, sample_rate)?;

        self.send_all(&[
            ControlMessage::Prepare {
                sample_rate,
                max_block_size,
            },
            ControlMessage::Coefficients(set),
        ])?;

        self.sample_rate = Some(sample_rate);
        self.last_generation = Some(generation);
        self.published = Some(snapshot);
        tracing::debug!(sample_rate, max_block_size, "prepare sent to renderer");
        Ok(())
    }

    /// Asks the renderer to clear its filter state at the next block.
    pub fn reset(&mut self) -> Result<()> {
        self.send_all(&[ControlMessage::Reset])
    }

    /// Re-reads parameters and publishes new coefficients if they changed.
    ///
    /// Returns `Ok(true)` when a new set was queued. Unchanged parameters
    /// publish nothing. If the ring is full the change is retried on the
    /// next call.
    pub fn update_filters(&mut self) -> Result<bool> {
        let sample_rate = self.sample_rate.ok_or(EqError::Unprepared)?;
        let generation = self.params.generation();
        if self.last_generation == Some(generation) {
            return Ok(false);
        }

        let snapshot = read_snapshot(&self.params, self.clamp_nyquist, sample_rate);
        if self.published == Some(snapshot) {
            self.last_generation = Some(generation);
            return Ok(false);
        }

        let set = match self.design_logged(&snapshot, sample_rate) {
            Ok(set) => set,
            Err(err) => {
                self.last_generation = Some(generation);
                return Err(err);
            }
        };
        self.send_all(&[ControlMessage::Coefficients(set)])?;

        self.last_generation = Some(generation);
        self.published = Some(snapshot);
        tracing::debug!(generation, "coefficients published");
        Ok(true)
    }

    /// Sends a precomputed coefficient set as is.
    pub fn publish(&mut self, set: CoefficientSet) -> Result<()> {
        self.send_all(&[ControlMessage::Coefficients(set)])
    }

    fn design_logged(
        &self,
        snapshot: &ParameterSnapshot,
        sample_rate: f64,
    ) -> Result<CoefficientSet> {
        design(snapshot, sample_rate).map_err(|err| {
            tracing::warn!(sample_rate, "parameters rejected: {err}");
            EngineError::from(err)
        })
    }

    fn send_all(&mut self, messages: &[ControlMessage]) -> Result<()> {
        self.sender.send_all(messages).inspect_err(|_| {
            tracing::warn!(
                pending = self.sender.pending(),
                "renderer is not draining the control queue"
            );
        })
    }
}

/// Audio-thread half of a split equalizer.
///
/// [`process`](Self::process) drains queued messages, then filters the
/// block. It never allocates, locks or logs.
pub struct EqualizerRenderer {
    processor: ChannelProcessor,
    receiver: ControlReceiver,
}

impl EqualizerRenderer {
    /// Applies every queued message in order. Returns how many were applied.
    ///
    /// [`process`](Self::process) calls this first; hosts that skip blocks
    /// can call it directly.
    pub fn apply_pending(&mut self) -> usize {
        let processor = &mut self.processor;
        self.receiver.drain(|message| match message {
            ControlMessage::Prepare {
                sample_rate,
                max_block_size,
            } => {
                // Validated by the controller; no snapshot is attached, so
                // this only stores the rate and clears registers
                let prepared = processor.prepare(sample_rate, max_block_size);
                debug_assert!(prepared.is_ok(), "renderer prepare failed: {prepared:?}");
            }
            ControlMessage::Reset => processor.reset(),
            ControlMessage::Coefficients(set) => processor.apply_coefficients(&set),
        })
    }

    /// Applies pending messages, then filters one stereo block in place.
    #[inline]
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) -> Result<()> {
        self.apply_pending();
        self.processor.process(left, right)?;
        Ok(())
    }

    /// The underlying processor, for inspection.
    pub fn processor(&self) -> &ChannelProcessor {
        &self.processor
    }

    /// The underlying processor, mutably (band bypass, per-channel access).
    pub fn processor_mut(&mut self) -> &mut ChannelProcessor {
        &mut self.processor
    }
}
