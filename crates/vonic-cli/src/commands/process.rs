//! File-based equalizer processing command.

use super::common::{EqArgs, format_db};
use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use vonic_engine::Equalizer;
use vonic_io::{BitDepth, WavFormat, WavSpec, read_wav_info, read_wav_stereo, write_wav_stereo};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    eq: EqArgs,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    let depth = BitDepth::from_bits(args.bit_depth)?;

    println!("Reading {}...", args.input.display());
    let info = read_wav_info(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let encoding = match info.format {
        WavFormat::Pcm => "PCM",
        WavFormat::IeeeFloat => "float",
    };
    println!(
        "  {} frames, {} channel(s), {} Hz, {}-bit {}, {:.2}s",
        info.num_frames,
        info.channels,
        info.sample_rate,
        info.bits_per_sample,
        encoding,
        info.duration_secs
    );

    let (mut samples, spec) = read_wav_stereo(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let sample_rate = f64::from(spec.sample_rate);

    let params = args.eq.to_store();
    let mut eq = Equalizer::new(params).with_nyquist_clamping(args.eq.clamp_nyquist);
    eq.prepare(sample_rate, args.block_size).with_context(|| {
        format!(
            "cannot configure the equalizer at {} Hz with block size {} (try --clamp-nyquist)",
            spec.sample_rate, args.block_size
        )
    })?;

    // What the filters actually run with, after any Nyquist clamping
    let snapshot = *eq
        .processor()
        .snapshot()
        .context("equalizer prepared without parameters")?;
    println!(
        "Peak {:.1} Hz {:+.1} dB Q {:.2} | low cut {:.1} Hz {} | high cut {:.1} Hz {}",
        snapshot.peak_frequency_hz,
        snapshot.peak_gain_db,
        snapshot.peak_quality,
        snapshot.low_cut_frequency_hz,
        snapshot.low_cut_slope,
        snapshot.high_cut_frequency_hz,
        snapshot.high_cut_slope
    );

    let input_rms = samples.rms();
    let input_peak = samples.peak();
    let total = samples.len();
    let block_size = args.block_size;

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let (left, right) = samples.channels_mut();
    for (i, (l, r)) in left
        .chunks_mut(block_size)
        .zip(right.chunks_mut(block_size))
        .enumerate()
    {
        eq.process(l, r)?;
        pb.set_position(((i + 1) * block_size).min(total) as u64);
    }

    pb.finish_with_message("done");

    println!("\nStats:");
    println!(
        "  Input:  RMS {}, Peak {}",
        format_db(input_rms),
        format_db(input_peak)
    );
    println!(
        "  Output: RMS {}, Peak {}",
        format_db(samples.rms()),
        format_db(samples.peak())
    );
    if samples.peak() > 1.0 && depth != BitDepth::Float32 {
        tracing::warn!(
            peak = samples.peak(),
            depth = %depth,
            "output exceeds full scale and will clip"
        );
    }

    let out_spec = WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: depth.bits(),
    };

    println!("\nWriting {} ({})...", args.output.display(), depth);
    write_wav_stereo(&args.output, &samples, out_spec)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    println!("Done!");

    Ok(())
}
