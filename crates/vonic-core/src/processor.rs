//! Stereo channel processor.
//!
//! [`ChannelProcessor`] owns two independent [`FilterChain`]s and the host
//! contract around them: `prepare` before `process`, blocks no longer than
//! the prepared maximum, equal-length channels.
//!
//! # Lifecycle
//!
//! ```text
//! new ──► prepare(sr, max) ──► process / update_from_parameters ...
//!              ▲                     │
//!              └──── prepare again ◄─┘   (stream restart, rate change)
//! ```
//!
//! Nothing in [`ChannelProcessor::process`] allocates, locks or logs, and
//! neither does `prepare` while no parameters have been applied (the state a
//! realtime renderer keeps it in).

use crate::chain::FilterChain;
use crate::design::{CoefficientSet, design};
use crate::error::{EqError, InvalidReason, Result};
use crate::snapshot::{ParameterSnapshot, validate_sample_rate};

/// Selects one side of the stereo pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Left channel.
    Left,
    /// Right channel.
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Prepared {
    sample_rate: f64,
    max_block_size: usize,
}

/// Two filter chains driven with identical coefficients.
#[derive(Debug, Clone, Default)]
pub struct ChannelProcessor {
    left: FilterChain,
    right: FilterChain,
    prepared: Option<Prepared>,
    snapshot: Option<ParameterSnapshot>,
    coefficients: CoefficientSet,
}

impl ChannelProcessor {
    /// Unprepared processor with passthrough chains.
    pub fn new() -> Self {
        Self::default()
    }

    /// Establishes the operating sample rate and block size and clears all
    /// filter state.
    ///
    /// If parameters were applied earlier they are re-designed for the new
    /// rate. When that design fails (for example a cutoff is now above
    /// Nyquist) the error is returned and the processor is left exactly as
    /// it was.
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> Result<()> {
        match self.snapshot {
            Some(snapshot) => self.prepare_with_parameters(sample_rate, max_block_size, &snapshot),
            None => {
                check_prepare_args(sample_rate, max_block_size)?;
                self.prepared = Some(Prepared {
                    sample_rate,
                    max_block_size,
                });
                self.reset();
                Ok(())
            }
        }
    }

    /// [`prepare`](Self::prepare) with a new snapshot designed at the new
    /// rate, replacing whatever was applied before.
    ///
    /// On error nothing changes.
    pub fn prepare_with_parameters(
        &mut self,
        sample_rate: f64,
        max_block_size: usize,
        snapshot: &ParameterSnapshot,
    ) -> Result<()> {
        check_prepare_args(sample_rate, max_block_size)?;
        let set = match design(snapshot, sample_rate) {
            Ok(set) => set,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(sample_rate, "prepare rejected parameters: {err}");
                return Err(err);
            }
        };

        self.prepared = Some(Prepared {
            sample_rate,
            max_block_size,
        });
        self.load(&set);
        self.snapshot = Some(*snapshot);
        self.reset();
        Ok(())
    }

    /// Zeroes every filter register; coefficients are kept.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }

    /// Filters both channels in place.
    pub fn process(&mut self, left: &mut [f32], right: &mut [f32]) -> Result<()> {
        let prepared = self.prepared.ok_or(EqError::Unprepared)?;
        if left.len() != right.len() {
            return Err(EqError::ChannelLengthMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        if left.len() > prepared.max_block_size {
            return Err(EqError::BlockTooLarge {
                len: left.len(),
                max: prepared.max_block_size,
            });
        }

        self.left.process_block_inplace(left);
        self.right.process_block_inplace(right);
        Ok(())
    }

    /// Filters a single channel in place.
    pub fn process_mono(&mut self, channel: Channel, buffer: &mut [f32]) -> Result<()> {
        let prepared = self.prepared.ok_or(EqError::Unprepared)?;
        if buffer.len() > prepared.max_block_size {
            return Err(EqError::BlockTooLarge {
                len: buffer.len(),
                max: prepared.max_block_size,
            });
        }
        self.chain_mut(channel).process_block_inplace(buffer);
        Ok(())
    }

    /// Both chains as disjoint mutable borrows, for processing the channels
    /// on separate threads.
    pub fn chains_mut(&mut self) -> (&mut FilterChain, &mut FilterChain) {
        (&mut self.left, &mut self.right)
    }

    /// One chain.
    pub fn chain(&self, channel: Channel) -> &FilterChain {
        match channel {
            Channel::Left => &self.left,
            Channel::Right => &self.right,
        }
    }

    /// One chain, mutably.
    pub fn chain_mut(&mut self, channel: Channel) -> &mut FilterChain {
        match channel {
            Channel::Left => &mut self.left,
            Channel::Right => &mut self.right,
        }
    }

    /// Designs coefficients for `snapshot` and loads them into both chains.
    ///
    /// Before `prepare` the snapshot is only remembered and designed once a
    /// sample rate is known. On error nothing is loaded and the previous
    /// coefficients stay in place.
    pub fn update_from_parameters(&mut self, snapshot: &ParameterSnapshot) -> Result<()> {
        let Some(prepared) = self.prepared else {
            self.snapshot = Some(*snapshot);
            return Ok(());
        };

        let set = match design(snapshot, prepared.sample_rate) {
            Ok(set) => set,
            Err(err) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("update_from_parameters rejected parameters: {err}");
                return Err(err);
            }
        };
        self.load(&set);
        self.snapshot = Some(*snapshot);
        Ok(())
    }

    /// Loads a precomputed coefficient set into both chains.
    ///
    /// The set was designed elsewhere, so any remembered snapshot is
    /// forgotten and a later [`prepare`](Self::prepare) keeps these
    /// coefficients instead of re-designing. Realtime-safe: copies the set
    /// and toggles bypass flags, nothing else.
    #[inline]
    pub fn apply_coefficients(&mut self, set: &CoefficientSet) {
        self.load(set);
        self.snapshot = None;
    }

    /// Forgets the applied snapshot and returns it.
    ///
    /// Used when handing the processor to an audio thread: from then on
    /// coefficients arrive through [`apply_coefficients`](Self::apply_coefficients)
    /// and `prepare` never designs.
    pub fn detach_parameters(&mut self) -> Option<ParameterSnapshot> {
        self.snapshot.take()
    }

    #[inline]
    fn load(&mut self, set: &CoefficientSet) {
        self.left.apply(set);
        self.right.apply(set);
        self.coefficients = *set;
    }

    /// The last coefficient set loaded into the chains.
    pub fn coefficients(&self) -> &CoefficientSet {
        &self.coefficients
    }

    /// The snapshot the loaded coefficients were designed from, if the
    /// processor designed them itself.
    pub fn snapshot(&self) -> Option<&ParameterSnapshot> {
        self.snapshot.as_ref()
    }

    /// Operating sample rate, once prepared.
    pub fn sample_rate(&self) -> Option<f64> {
        self.prepared.map(|p| p.sample_rate)
    }

    /// Maximum block size, once prepared.
    pub fn max_block_size(&self) -> Option<usize> {
        self.prepared.map(|p| p.max_block_size)
    }

    /// Whether `prepare` has succeeded.
    pub fn is_prepared(&self) -> bool {
        self.prepared.is_some()
    }
}

fn check_prepare_args(sample_rate: f64, max_block_size: usize) -> Result<()> {
    validate_sample_rate(sample_rate)?;
    if max_block_size == 0 {
        return Err(EqError::invalid(
            "max_block_size",
            0.0,
            InvalidReason::NotPositive,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::Slope;

    #[test]
    fn test_process_before_prepare() {
        let mut proc = ChannelProcessor::new();
        let mut l = [0.0_f32; 8];
        let mut r = [0.0_f32; 8];
        assert_eq!(proc.process(&mut l, &mut r), Err(EqError::Unprepared));
        assert_eq!(
            proc.process_mono(Channel::Left, &mut l),
            Err(EqError::Unprepared)
        );
    }

    #[test]
    fn test_block_contract() {
        let mut proc = ChannelProcessor::new();
        proc.prepare(48000.0, 16).unwrap();

        let mut l = [0.0_f32; 32];
        let mut r = [0.0_f32; 32];
        assert_eq!(
            proc.process(&mut l, &mut r),
            Err(EqError::BlockTooLarge { len: 32, max: 16 })
        );
        assert_eq!(
            proc.process(&mut l[..8], &mut r[..4]),
            Err(EqError::ChannelLengthMismatch { left: 8, right: 4 })
        );
        assert_eq!(proc.process(&mut l[..16], &mut r[..16]), Ok(()));
    }

    #[test]
    fn test_prepare_rejects_bad_arguments() {
        let mut proc = ChannelProcessor::new();
        assert!(proc.prepare(0.0, 512).is_err());
        assert!(proc.prepare(48000.0, 0).is_err());
        assert!(!proc.is_prepared());
    }

    #[test]
    fn test_snapshot_before_prepare_is_designed_on_prepare() {
        let snapshot = ParameterSnapshot {
            low_cut_frequency_hz: 120.0,
            low_cut_slope: Slope::Db36,
            ..Default::default()
        };
        let mut proc = ChannelProcessor::new();
        proc.update_from_parameters(&snapshot).unwrap();
        assert_eq!(*proc.coefficients(), CoefficientSet::passthrough());

        proc.prepare(48000.0, 256).unwrap();
        assert_eq!(*proc.coefficients(), design(&snapshot, 48000.0).unwrap());
        assert_eq!(proc.chain(Channel::Right).low_cut().active_sections(), 3);
    }

    #[test]
    fn test_rate_change_that_invalidates_keeps_old_state() {
        let snapshot = ParameterSnapshot {
            high_cut_frequency_hz: 18000.0,
            ..Default::default()
        };
        let mut proc = ChannelProcessor::new();
        proc.prepare(48000.0, 256).unwrap();
        proc.update_from_parameters(&snapshot).unwrap();
        let before = *proc.coefficients();

        assert!(proc.prepare(22050.0, 256).is_err());
        assert_eq!(*proc.coefficients(), before);
        assert_eq!(proc.sample_rate(), Some(48000.0));
    }

    #[test]
    fn test_prepare_with_parameters_replaces_stale_snapshot() {
        let mut proc = ChannelProcessor::new();
        proc.prepare(48000.0, 128).unwrap();
        proc.update_from_parameters(&ParameterSnapshot {
            high_cut_frequency_hz: 18000.0,
            ..Default::default()
        })
        .unwrap();

        // The stale snapshot is invalid at 32 kHz but the new one is fine
        let fresh = ParameterSnapshot {
            high_cut_frequency_hz: 12000.0,
            ..Default::default()
        };
        proc.prepare_with_parameters(32000.0, 128, &fresh).unwrap();
        assert_eq!(proc.sample_rate(), Some(32000.0));
        assert_eq!(proc.snapshot(), Some(&fresh));
        assert_eq!(*proc.coefficients(), design(&fresh, 32000.0).unwrap());
    }

    #[test]
    fn test_invalid_update_keeps_coefficients() {
        let mut proc = ChannelProcessor::new();
        proc.prepare(44100.0, 64).unwrap();
        proc.update_from_parameters(&ParameterSnapshot::default())
            .unwrap();
        let before = *proc.coefficients();

        let bad = ParameterSnapshot {
            peak_quality: -1.0,
            ..Default::default()
        };
        assert!(proc.update_from_parameters(&bad).is_err());
        assert_eq!(*proc.coefficients(), before);
        assert_eq!(proc.snapshot(), Some(&ParameterSnapshot::default()));
    }

    #[test]
    fn test_channels_are_independent() {
        let mut proc = ChannelProcessor::new();
        proc.prepare(48000.0, 64).unwrap();
        proc.update_from_parameters(&ParameterSnapshot {
            peak_gain_db: 9.0,
            ..Default::default()
        })
        .unwrap();

        let mut l = [0.0_f32; 64];
        l[0] = 1.0;
        let mut r = [0.0_f32; 64];
        proc.process(&mut l, &mut r).unwrap();

        assert!(r.iter().all(|&s| s == 0.0));
        assert!(l.iter().any(|&s| s != 0.0));
    }
}
