//! Filter chain: low cut → peak → high cut.
//!
//! The topology is fixed. Each cut band is a [`CutChain`] of four biquad
//! slots of which `slope.sections()` are enabled, always starting at slot 0.
//! Disabled slots pass audio through and keep their registers, so a slope
//! change never disturbs the slots that stay active.
//!
//! ```text
//! in ─► [LC0][LC1][LC2][LC3] ─► [Peak] ─► [HC0][HC1][HC2][HC3] ─► out
//! ```

use crate::biquad::{Biquad, BiquadCoefficients};
use crate::design::{CoefficientSet, CutCoefficients, MAX_SECTIONS};
use crate::error::{EqError, Result};
use crate::snapshot::Slope;

/// Four cascaded biquad slots with slope-controlled enabling.
///
/// A bypassed band keeps every slot bypassed across slope changes and
/// coefficient loads until it is restored.
#[derive(Debug, Clone)]
pub struct CutChain {
    slots: [Biquad; MAX_SECTIONS],
    slope: Slope,
    band_bypassed: bool,
}

impl Default for CutChain {
    fn default() -> Self {
        Self::new()
    }
}

impl CutChain {
    /// Passthrough coefficients in every slot, [`Slope::Db12`] enabled.
    pub fn new() -> Self {
        let mut chain = Self {
            slots: core::array::from_fn(|_| Biquad::new()),
            slope: Slope::Db12,
            band_bypassed: false,
        };
        chain.set_slope(Slope::Db12);
        chain
    }

    /// Enables slots `0..slope.sections()` and bypasses the rest.
    ///
    /// Coefficients and registers are untouched. While the band is
    /// bypassed only the slope is recorded.
    pub fn set_slope(&mut self, slope: Slope) {
        self.slope = slope;
        let active = if self.band_bypassed { 0 } else { slope.sections() };
        for (i, slot) in self.slots.iter_mut().enumerate() {
            slot.set_bypassed(i >= active);
        }
    }

    /// Bypasses every slot, or restores the slots the slope calls for.
    pub fn set_bypassed(&mut self, bypassed: bool) {
        self.band_bypassed = bypassed;
        self.set_slope(self.slope);
    }

    /// Whether the whole band is bypassed.
    pub fn is_bypassed(&self) -> bool {
        self.band_bypassed
    }

    /// Current slope.
    pub fn slope(&self) -> Slope {
        self.slope
    }

    /// Number of slots not bypassed.
    pub fn active_sections(&self) -> usize {
        self.slots.iter().filter(|s| !s.is_bypassed()).count()
    }

    /// Replaces the coefficients of one slot, keeping registers and bypass.
    pub fn load_coefficients(&mut self, slot: usize, coeffs: BiquadCoefficients) -> Result<()> {
        self.slots
            .get_mut(slot)
            .ok_or(EqError::SlotOutOfRange(slot))?
            .set_coefficients(coeffs);
        Ok(())
    }

    /// Loads all four slots and applies the slope they were designed for.
    pub fn load(&mut self, coeffs: &CutCoefficients) {
        for (slot, c) in self.slots.iter_mut().zip(coeffs.slots()) {
            slot.set_coefficients(*c);
        }
        self.set_slope(coeffs.slope());
    }

    /// Forces a single slot on or off, independent of the slope.
    pub fn set_slot_bypassed(&mut self, slot: usize, bypassed: bool) -> Result<()> {
        self.slots
            .get_mut(slot)
            .ok_or(EqError::SlotOutOfRange(slot))?
            .set_bypassed(bypassed);
        Ok(())
    }

    /// Read access to one slot.
    pub fn slot(&self, index: usize) -> Option<&Biquad> {
        self.slots.get(index)
    }

    /// Runs one sample through every slot in order.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.slots.iter_mut().fold(input, |x, slot| slot.process(x))
    }

    /// Clears every slot's registers.
    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(Biquad::clear);
    }
}

/// A band position within [`FilterChain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainPosition {
    /// High-pass cascade at the head of the chain.
    LowCut,
    /// Bell stage in the middle.
    Peak,
    /// Low-pass cascade at the tail.
    HighCut,
}

/// The full per-channel equalizer: low cut, peak, high cut.
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    low_cut: CutChain,
    peak: Biquad,
    high_cut: CutChain,
}

impl FilterChain {
    /// Passthrough chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Changes how many low-cut slots are enabled.
    pub fn set_low_cut_slope(&mut self, slope: Slope) {
        self.low_cut.set_slope(slope);
    }

    /// Changes how many high-cut slots are enabled.
    pub fn set_high_cut_slope(&mut self, slope: Slope) {
        self.high_cut.set_slope(slope);
    }

    /// Loads one low-cut slot.
    pub fn load_low_cut(&mut self, slot: usize, coeffs: BiquadCoefficients) -> Result<()> {
        self.low_cut.load_coefficients(slot, coeffs)
    }

    /// Loads one high-cut slot.
    pub fn load_high_cut(&mut self, slot: usize, coeffs: BiquadCoefficients) -> Result<()> {
        self.high_cut.load_coefficients(slot, coeffs)
    }

    /// Loads the peak stage.
    pub fn load_peak(&mut self, coeffs: BiquadCoefficients) {
        self.peak.set_coefficients(coeffs);
    }

    /// Loads a full coefficient set and applies both slopes.
    ///
    /// Registers are preserved, so a live update never restarts the filter.
    pub fn apply(&mut self, set: &CoefficientSet) {
        self.low_cut.load(&set.low_cut);
        self.peak.set_coefficients(set.peak);
        self.high_cut.load(&set.high_cut);
    }

    /// Bypasses or restores a whole band.
    ///
    /// The bypass survives later [`apply`](Self::apply) calls. Restoring a
    /// cut band re-enables exactly the slots its slope calls for.
    pub fn set_band_bypassed(&mut self, position: ChainPosition, bypassed: bool) {
        match position {
            ChainPosition::Peak => self.peak.set_bypassed(bypassed),
            ChainPosition::LowCut => self.low_cut.set_bypassed(bypassed),
            ChainPosition::HighCut => self.high_cut.set_bypassed(bypassed),
        }
    }

    /// Bypasses or restores every band.
    pub fn set_all_bypassed(&mut self, bypassed: bool) {
        for position in [
            ChainPosition::LowCut,
            ChainPosition::Peak,
            ChainPosition::HighCut,
        ] {
            self.set_band_bypassed(position, bypassed);
        }
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let x = self.low_cut.process(input);
        let x = self.peak.process(x);
        self.high_cut.process(x)
    }

    /// Processes a buffer in place.
    pub fn process_block_inplace(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }

    /// Clears every register in the chain.
    pub fn reset(&mut self) {
        self.low_cut.reset();
        self.peak.clear();
        self.high_cut.reset();
    }

    /// Low-cut cascade.
    pub fn low_cut(&self) -> &CutChain {
        &self.low_cut
    }

    /// Mutable low-cut cascade, for per-slot bypass.
    pub fn low_cut_mut(&mut self) -> &mut CutChain {
        &mut self.low_cut
    }

    /// Peak stage.
    pub fn peak(&self) -> &Biquad {
        &self.peak
    }

    /// High-cut cascade.
    pub fn high_cut(&self) -> &CutChain {
        &self.high_cut
    }

    /// Mutable high-cut cascade, for per-slot bypass.
    pub fn high_cut_mut(&mut self) -> &mut CutChain {
        &mut self.high_cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::{butterworth_highpass, design};
    use crate::snapshot::ParameterSnapshot;

    const SR: f64 = 48000.0;

    #[test]
    fn test_slope_enables_prefix_of_slots() {
        let mut chain = CutChain::new();
        for slope in Slope::ALL {
            chain.set_slope(slope);
            assert_eq!(chain.active_sections(), slope.sections());
            for i in 0..MAX_SECTIONS {
                let slot = chain.slot(i).unwrap();
                assert_eq!(slot.is_bypassed(), i >= slope.sections(), "{slope} slot {i}");
            }
        }
    }

    #[test]
    fn test_slot_out_of_range() {
        let mut chain = CutChain::new();
        assert_eq!(
            chain.load_coefficients(4, BiquadCoefficients::IDENTITY),
            Err(EqError::SlotOutOfRange(4))
        );
        assert_eq!(
            chain.set_slot_bypassed(7, true),
            Err(EqError::SlotOutOfRange(7))
        );
    }

    #[test]
    fn test_slope_change_preserves_active_registers() {
        let mut chain = CutChain::new();
        chain.load(&butterworth_highpass(200.0, Slope::Db48, SR).unwrap());
        for i in 0..128 {
            chain.process(libm::sinf(i as f32 * 0.05));
        }
        let before: [_; 2] = core::array::from_fn(|i| chain.slot(i).unwrap().state());

        chain.set_slope(Slope::Db24);

        for (i, state) in before.iter().enumerate() {
            assert_eq!(chain.slot(i).unwrap().state(), *state);
        }
    }

    #[test]
    fn test_band_bypass_restores_slope() {
        let mut chain = FilterChain::new();
        chain.set_low_cut_slope(Slope::Db36);
        chain.set_band_bypassed(ChainPosition::LowCut, true);
        assert_eq!(chain.low_cut().active_sections(), 0);
        chain.set_band_bypassed(ChainPosition::LowCut, false);
        assert_eq!(chain.low_cut().active_sections(), 3);
    }

    #[test]
    fn test_band_bypass_survives_coefficient_load() {
        let mut chain = FilterChain::new();
        chain.set_band_bypassed(ChainPosition::LowCut, true);
        chain.set_band_bypassed(ChainPosition::HighCut, true);

        let snapshot = ParameterSnapshot {
            low_cut_frequency_hz: 500.0,
            low_cut_slope: Slope::Db24,
            high_cut_frequency_hz: 2000.0,
            high_cut_slope: Slope::Db48,
            ..Default::default()
        };
        chain.apply(&design(&snapshot, SR).unwrap());
        chain.set_low_cut_slope(Slope::Db36);

        assert_eq!(chain.low_cut().active_sections(), 0);
        assert_eq!(chain.high_cut().active_sections(), 0);
        assert!(chain.low_cut().is_bypassed());

        // Peak is flat at 0 dB gain but still active; bypass it too
        chain.set_band_bypassed(ChainPosition::Peak, true);
        for i in 0..128 {
            let x = libm::sinf(i as f32 * 0.21) * 0.7;
            assert_eq!(chain.process(x), x);
        }

        chain.set_band_bypassed(ChainPosition::LowCut, false);
        chain.set_band_bypassed(ChainPosition::HighCut, false);
        assert_eq!(chain.low_cut().active_sections(), 3);
        assert_eq!(chain.high_cut().active_sections(), 4);
    }

    #[test]
    fn test_all_bypassed_is_identity() {
        let snapshot = ParameterSnapshot {
            peak_gain_db: 12.0,
            low_cut_frequency_hz: 300.0,
            low_cut_slope: Slope::Db48,
            high_cut_frequency_hz: 3000.0,
            ..Default::default()
        };
        let mut chain = FilterChain::new();
        chain.apply(&design(&snapshot, SR).unwrap());
        chain.set_all_bypassed(true);

        for i in 0..256 {
            let x = libm::sinf(i as f32 * 0.11) * 0.8;
            assert_eq!(chain.process(x), x);
        }
    }

    #[test]
    fn test_reset_clears_every_stage() {
        let mut chain = FilterChain::new();
        chain.apply(&design(&ParameterSnapshot::default(), SR).unwrap());
        let mut buf = [0.5_f32; 64];
        chain.process_block_inplace(&mut buf);
        chain.reset();
        assert!(chain.peak().state().is_zero());
        for i in 0..MAX_SECTIONS {
            assert!(chain.low_cut().slot(i).unwrap().state().is_zero());
            assert!(chain.high_cut().slot(i).unwrap().state().is_zero());
        }
    }
}
