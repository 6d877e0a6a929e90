//! Audio I/O layer for stretta.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`] / [`write_wav`] (mono) and
//!   [`read_wav_stereo`] / [`write_wav_stereo`] for loading and saving audio
//! - **Offline processing**: [`ProcessingEngine`] for running buffers
//!   through the compressor with lock-free parameter sync and telemetry
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stretta_io::{ProcessingEngine, read_wav, write_wav};
//!
//! let (samples, spec) = read_wav("input.wav")?;
//!
//! let mut engine = ProcessingEngine::new(spec.sample_rate as f32);
//! engine.params().set_threshold_db(-18.0);
//! let processed = engine.process_buffer(&samples, 512);
//!
//! write_wav("output.wav", &processed, spec)?;
//! ```

mod engine;
mod wav;

pub use engine::ProcessingEngine;
pub use wav::{
    StereoSamples, WavFormat, WavSpec, read_wav, read_wav_stereo, write_wav, write_wav_stereo,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// The file's channel layout does not match the requested reader.
    #[error("Expected {expected} channel(s), file has {actual}")]
    ChannelMismatch {
        /// Channels the caller asked for.
        expected: u16,
        /// Channels present in the file.
        actual: u16,
    },
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
