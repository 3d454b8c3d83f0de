//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::fmt;
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = u64::from(reader.len());
    let num_frames = total_samples / u64::from(spec.channels.max(1));
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// Output sample encodings supported by [`write_wav_stereo`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BitDepth {
    /// 16-bit integer PCM.
    Int16,
    /// 24-bit integer PCM.
    Int24,
    /// 32-bit IEEE float.
    #[default]
    Float32,
}

impl BitDepth {
    /// Map a bits-per-sample count to an output encoding.
    pub fn from_bits(bits: u16) -> Result<Self> {
        match bits {
            16 => Ok(Self::Int16),
            24 => Ok(Self::Int24),
            32 => Ok(Self::Float32),
            other => Err(Error::UnsupportedBitDepth(other)),
        }
    }

    /// Bits per sample.
    pub const fn bits(self) -> u16 {
        match self {
            Self::Int16 => 16,
            Self::Int24 => 24,
            Self::Float32 => 32,
        }
    }

    const fn sample_format(self) -> SampleFormat {
        match self {
            Self::Float32 => SampleFormat::Float,
            Self::Int16 | Self::Int24 => SampleFormat::Int,
        }
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float32 => write!(f, "32-bit float"),
            other => write!(f, "{}-bit PCM", other.bits()),
        }
    }
}

/// WAV file specification.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Number of audio channels in the source file (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (e.g., 16, 24, 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 32,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

/// A pair of equal-length channel buffers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoSamples {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples.
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// Build from separate channel buffers.
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        Self { left, right }
    }

    /// Duplicate a mono buffer to both channels.
    pub fn from_mono(samples: Vec<f32>) -> Self {
        Self {
            right: samples.clone(),
            left: samples,
        }
    }

    /// Deinterleave frames of `channels` samples, keeping the first two.
    ///
    /// A single-channel source is duplicated to both sides.
    pub fn from_interleaved(samples: &[f32], channels: usize) -> Self {
        let channels = channels.max(1);
        let frames = samples.len() / channels;
        let mut left = Vec::with_capacity(frames);
        let mut right = Vec::with_capacity(frames);

        for frame in samples.chunks_exact(channels) {
            left.push(frame[0]);
            right.push(frame.get(1).copied().unwrap_or(frame[0]));
        }

        Self { left, right }
    }

    /// Number of frames (samples per channel).
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Whether there are no frames.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Mutable access to both channels at once.
    pub fn channels_mut(&mut self) -> (&mut [f32], &mut [f32]) {
        (&mut self.left, &mut self.right)
    }

    /// Largest absolute sample across both channels.
    pub fn peak(&self) -> f32 {
        self.left
            .iter()
            .chain(self.right.iter())
            .fold(0.0_f32, |acc, s| acc.max(s.abs()))
    }

    /// Root-mean-square level across both channels.
    pub fn rms(&self) -> f32 {
        let count = self.left.len() + self.right.len();
        if count == 0 {
            return 0.0;
        }
        let sum: f64 = self
            .left
            .iter()
            .chain(self.right.iter())
            .map(|&s| f64::from(s) * f64::from(s))
            .sum();
        (sum / count as f64).sqrt() as f32
    }
}

/// Read a WAV file as a stereo pair along with the source spec.
///
/// Mono files are expanded to stereo by duplicating to both channels.
/// Files with more than 2 channels use only the first two channels.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoSamples, WavSpec)> {
    let path = path.as_ref();
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());

    let interleaved: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let scale = int_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let samples = StereoSamples::from_interleaved(&interleaved, usize::from(spec.channels));
    tracing::debug!(
        path = %path.display(),
        channels = spec.channels,
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        frames = samples.len(),
        "read wav"
    );
    Ok((samples, spec))
}

/// Write a stereo pair to a two-channel WAV file.
///
/// `spec.bits_per_sample` selects the encoding (16, 24 or 32 float);
/// `spec.channels` is ignored. Integer output is clamped to full scale.
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    samples: &StereoSamples,
    spec: WavSpec,
) -> Result<()> {
    if samples.left.len() != samples.right.len() {
        return Err(Error::ChannelLengthMismatch {
            left: samples.left.len(),
            right: samples.right.len(),
        });
    }

    let depth = BitDepth::from_bits(spec.bits_per_sample)?;
    let hound_spec = hound::WavSpec {
        channels: 2,
        sample_rate: spec.sample_rate,
        bits_per_sample: depth.bits(),
        sample_format: depth.sample_format(),
    };
    let path = path.as_ref();
    let mut writer = WavWriter::create(path, hound_spec)?;

    let frames = samples.left.iter().zip(samples.right.iter());
    match depth {
        BitDepth::Float32 => {
            for (&l, &r) in frames {
                writer.write_sample(l)?;
                writer.write_sample(r)?;
            }
        }
        BitDepth::Int16 | BitDepth::Int24 => {
            let scale = int_scale(depth.bits());
            for (&l, &r) in frames {
                writer.write_sample(quantize(l, scale))?;
                writer.write_sample(quantize(r, scale))?;
            }
        }
    }

    writer.finalize()?;
    tracing::debug!(
        path = %path.display(),
        sample_rate = spec.sample_rate,
        depth = %depth,
        frames = samples.len(),
        "wrote wav"
    );
    Ok(())
}

fn int_scale(bits: u16) -> f32 {
    (1_i64 << (bits.clamp(1, 32) - 1)) as f32
}

fn quantize(sample: f32, scale: f32) -> i32 {
    (sample * scale).round().clamp(-scale, scale - 1.0) as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn write_mono(path: &Path, samples: &[f32]) {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_stereo_samples_from_mono() {
        let mono = vec![1.0, 2.0, 3.0];
        let stereo = StereoSamples::from_mono(mono.clone());
        assert_eq!(stereo.left, mono);
        assert_eq!(stereo.right, mono);
    }

    #[test]
    fn test_from_interleaved_takes_first_two_channels() {
        let frames = [1.0, 2.0, 9.0, 3.0, 4.0, 9.0];
        let stereo = StereoSamples::from_interleaved(&frames, 3);
        assert_eq!(stereo.left, vec![1.0, 3.0]);
        assert_eq!(stereo.right, vec![2.0, 4.0]);
    }

    #[test]
    fn test_levels() {
        let stereo = StereoSamples::new(vec![0.5, -0.5], vec![-1.0, 1.0]);
        assert_eq!(stereo.peak(), 1.0);
        let expected = ((0.25 + 0.25 + 1.0 + 1.0) / 4.0_f32).sqrt();
        assert!((stereo.rms() - expected).abs() < 1e-6);
        assert_eq!(StereoSamples::default().rms(), 0.0);
    }

    #[test]
    fn test_bit_depth_from_bits() {
        assert_eq!(BitDepth::from_bits(16).unwrap(), BitDepth::Int16);
        assert_eq!(BitDepth::from_bits(24).unwrap(), BitDepth::Int24);
        assert_eq!(BitDepth::from_bits(32).unwrap(), BitDepth::Float32);
        assert!(matches!(
            BitDepth::from_bits(8),
            Err(Error::UnsupportedBitDepth(8))
        ));
    }

    #[test]
    fn test_quantize_clamps_full_scale() {
        let scale = int_scale(16);
        assert_eq!(quantize(1.5, scale), 32767);
        assert_eq!(quantize(-1.5, scale), -32768);
        assert_eq!(quantize(0.0, scale), 0);
    }

    #[test]
    fn test_read_mono_as_stereo() {
        let mono: Vec<f32> = (0..100).map(|i| i as f32 / 100.0).collect();
        let file = NamedTempFile::new().unwrap();
        write_mono(file.path(), &mono);

        let (stereo, spec) = read_wav_stereo(file.path()).unwrap();
        assert_eq!(spec.channels, 1);
        assert_eq!(stereo.left, mono);
        assert_eq!(stereo.right, mono);
    }

    #[test]
    fn test_mismatched_channels_rejected() {
        let file = NamedTempFile::new().unwrap();
        let samples = StereoSamples::new(vec![0.0; 4], vec![0.0; 3]);
        let err = write_wav_stereo(file.path(), &samples, WavSpec::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::ChannelLengthMismatch { left: 4, right: 3 }
        ));
    }
}
