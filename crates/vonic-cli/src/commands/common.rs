//! Equalizer flags shared by the `process` and `response` commands.

use clap::Args;
use vonic_core::Slope;
use vonic_engine::{EqParam, ParameterStore};

/// Equalizer settings. Omitted flags keep the parameter defaults
/// (see `vonic params`).
#[derive(Args, Debug, Clone, Default)]
pub struct EqArgs {
    /// Peak band centre frequency in Hz
    #[arg(long, value_name = "HZ")]
    pub peak_freq: Option<f32>,

    /// Peak band gain in dB
    #[arg(long, value_name = "DB", allow_hyphen_values = true)]
    pub peak_gain: Option<f32>,

    /// Peak band quality
    #[arg(long, value_name = "Q")]
    pub peak_q: Option<f32>,

    /// Low-cut cutoff in Hz
    #[arg(long, value_name = "HZ")]
    pub low_cut: Option<f32>,

    /// Low-cut slope in dB/octave (12, 24, 36 or 48)
    #[arg(long, value_name = "DB", value_parser = parse_slope)]
    pub low_slope: Option<Slope>,

    /// High-cut cutoff in Hz
    #[arg(long, value_name = "HZ")]
    pub high_cut: Option<f32>,

    /// High-cut slope in dB/octave (12, 24, 36 or 48)
    #[arg(long, value_name = "DB", value_parser = parse_slope)]
    pub high_slope: Option<Slope>,

    /// Pull frequencies at or above Nyquist just below it instead of failing
    #[arg(long)]
    pub clamp_nyquist: bool,
}

impl EqArgs {
    /// Builds a parameter store from the defaults plus any given flags.
    ///
    /// Values outside a parameter's range are clamped with a warning.
    pub fn to_store(&self) -> ParameterStore {
        let store = ParameterStore::new();
        let values = [
            (EqParam::PeakFrequency, self.peak_freq),
            (EqParam::PeakGain, self.peak_gain),
            (EqParam::PeakQuality, self.peak_q),
            (EqParam::LowCutFrequency, self.low_cut),
            (EqParam::HighCutFrequency, self.high_cut),
            (EqParam::LowCutSlope, self.low_slope.map(slope_value)),
            (EqParam::HighCutSlope, self.high_slope.map(slope_value)),
        ];

        for (param, value) in values {
            let Some(value) = value else { continue };
            let stored = store.set(param, value);
            if stored != value {
                let desc = param.descriptor();
                tracing::warn!(
                    param = desc.string_id,
                    requested = value,
                    stored,
                    min = desc.min,
                    max = desc.max,
                    "value out of range, clamped"
                );
            }
        }
        store
    }
}

fn slope_value(slope: Slope) -> f32 {
    f32::from(slope.index())
}

fn parse_slope(s: &str) -> Result<Slope, String> {
    let db: u32 = s
        .trim()
        .trim_end_matches("dB")
        .trim()
        .parse()
        .map_err(|_| format!("Invalid slope: '{}' (expected 12, 24, 36 or 48)", s))?;
    Slope::from_db_per_octave(db)
        .ok_or_else(|| format!("Unsupported slope: {} dB/oct (expected 12, 24, 36 or 48)", db))
}

/// Human-readable level, floored at -120 dB for silence.
pub fn format_db(linear: f32) -> String {
    format!("{:.1} dB", vonic_core::linear_to_db(f64::from(linear)).max(-120.0))
}
