//! Audio file I/O for the vonic equalizer.
//!
//! Stereo WAV reading and writing built on `hound`. Mono files are expanded
//! to two identical channels on read so the equalizer always sees a stereo
//! pair; output is always written as two channels.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use vonic_io::{read_wav_stereo, write_wav_stereo};
//!
//! let (samples, spec) = read_wav_stereo("input.wav")?;
//! write_wav_stereo("output.wav", &samples, spec)?;
//! ```

mod wav;

pub use wav::{
    BitDepth, StereoSamples, WavFormat, WavInfo, WavSpec, read_wav_info, read_wav_stereo,
    write_wav_stereo,
};

/// Error types for audio file operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The file uses a bit depth this crate cannot write.
    #[error("Unsupported bit depth: {0}")]
    UnsupportedBitDepth(u16),

    /// Left and right channels differ in length.
    #[error("Channel length mismatch: left {left}, right {right}")]
    ChannelLengthMismatch {
        /// Left channel length in frames.
        left: usize,
        /// Right channel length in frames.
        right: usize,
    },
}

/// Convenience result type for audio file operations.
pub type Result<T> = std::result::Result<T, Error>;
