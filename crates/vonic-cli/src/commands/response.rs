//! Magnitude response inspection command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use super::common::EqArgs;
use clap::Args;
use serde::Serialize;
use vonic_core::{CoefficientSet, design, linear_to_db};

/// Lowest frequency reported.
const MIN_FREQ_HZ: f64 = 20.0;
/// Highest frequency reported, if below Nyquist.
const MAX_FREQ_HZ: f64 = 20000.0;

#[derive(Args)]
pub struct ResponseArgs {
    /// Sample rate in Hz
    #[arg(long, default_value = "48000")]
    sample_rate: f64,

    #[command(flatten)]
    eq: EqArgs,

    /// Number of log-spaced frequency points
    #[arg(long, default_value = "31", value_parser = clap::value_parser!(u16).range(2..))]
    points: u16,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

/// Response of each band and the full chain at one frequency.
#[derive(Debug, Serialize)]
pub struct ResponsePoint {
    /// Frequency in Hz.
    pub frequency_hz: f64,
    /// Low-cut band magnitude in dB.
    pub low_cut_db: f64,
    /// Peak band magnitude in dB.
    pub peak_db: f64,
    /// High-cut band magnitude in dB.
    pub high_cut_db: f64,
    /// Whole-chain magnitude in dB.
    pub total_db: f64,
}

/// Evaluates `set` at `points` log-spaced frequencies from 20 Hz up to
/// 20 kHz or just below Nyquist, whichever is lower.
pub fn response_points(
    set: &CoefficientSet,
    sample_rate: f64,
    points: usize,
) -> Vec<ResponsePoint> {
    let top = MAX_FREQ_HZ.min(sample_rate * 0.5 * 0.999);
    let ratio = top / MIN_FREQ_HZ;
    let steps = points.saturating_sub(1).max(1) as f64;

    (0..points)
        .map(|i| {
            let f = MIN_FREQ_HZ * ratio.powf(i as f64 / steps);
            ResponsePoint {
                frequency_hz: f,
                low_cut_db: linear_to_db(set.low_cut.magnitude_at(f, sample_rate)),
                peak_db: linear_to_db(set.peak.magnitude_at(f, sample_rate)),
                high_cut_db: linear_to_db(set.high_cut.magnitude_at(f, sample_rate)),
                total_db: set.magnitude_db_at(f, sample_rate),
            }
        })
        .collect()
}

pub fn run(args: ResponseArgs) -> anyhow::Result<()> {
    let mut snapshot = args.eq.to_store().snapshot();
    if args.eq.clamp_nyquist {
        snapshot = snapshot.clamped_below_nyquist(args.sample_rate);
    }
    let set = design(&snapshot, args.sample_rate)?;
    let points = response_points(&set, args.sample_rate, usize::from(args.points));

    if args.json {
        let report = serde_json::json!({
            "sample_rate": args.sample_rate,
            "parameters": {
                "peak_frequency_hz": snapshot.peak_frequency_hz,
                "peak_gain_db": snapshot.peak_gain_db,
                "peak_quality": snapshot.peak_quality,
                "low_cut_frequency_hz": snapshot.low_cut_frequency_hz,
                "low_cut_slope_db": snapshot.low_cut_slope.db_per_octave(),
                "high_cut_frequency_hz": snapshot.high_cut_frequency_hz,
                "high_cut_slope_db": snapshot.high_cut_slope.db_per_octave(),
            },
            "points": points,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Magnitude response at {} Hz", args.sample_rate);
    println!();
    println!(
        "  {:>10}  {:>9}  {:>9}  {:>9}  {:>9}",
        "Freq (Hz)", "Low cut", "Peak", "High cut", "Total"
    );
    println!(
        "  {:>10}  {:>9}  {:>9}  {:>9}  {:>9}",
        "---------", "-------", "----", "--------", "-----"
    );
    for p in &points {
        println!(
            "  {:>10.1}  {:>9.2}  {:>9.2}  {:>9.2}  {:>9.2}",
            p.frequency_hz, p.low_cut_db, p.peak_db, p.high_cut_db, p.total_db
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vonic_core::ParameterSnapshot;

    #[test]
    fn test_points_span_audible_band() {
        let set = design(&ParameterSnapshot::default(), 48000.0).unwrap();
        let points = response_points(&set, 48000.0, 11);
        assert_eq!(points.len(), 11);
        assert!((points[0].frequency_hz - 20.0).abs() < 1e-9);
        assert!((points[10].frequency_hz - 20000.0).abs() < 1e-6);
        assert!(points.windows(2).all(|w| w[0].frequency_hz < w[1].frequency_hz));
    }

    #[test]
    fn test_points_stay_below_nyquist() {
        let snapshot = ParameterSnapshot {
            high_cut_frequency_hz: 8000.0,
            ..Default::default()
        };
        let set = design(&snapshot, 22050.0).unwrap();
        let points = response_points(&set, 22050.0, 5);
        assert!(points.iter().all(|p| p.frequency_hz < 11025.0));
        assert!(points.iter().all(|p| p.total_db.is_finite()));
    }

    #[test]
    fn test_bands_sum_to_total() {
        let snapshot = ParameterSnapshot {
            peak_gain_db: 6.0,
            low_cut_frequency_hz: 80.0,
            high_cut_frequency_hz: 12000.0,
            ..Default::default()
        };
        let set = design(&snapshot, 48000.0).unwrap();
        for p in response_points(&set, 48000.0, 16) {
            let sum = p.low_cut_db + p.peak_db + p.high_cut_db;
            assert!((sum - p.total_db).abs() < 1e-6, "{p:?}");
        }
    }
}
