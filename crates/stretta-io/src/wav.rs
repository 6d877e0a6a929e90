//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file specification.
#[derive(Debug, Clone, Copy)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (e.g., 16, 24, 32).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 1,
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

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Stereo sample buffers, one `Vec` per channel.
#[derive(Debug, Clone)]
pub struct StereoSamples {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples.
    pub right: Vec<f32>,
}

/// Read a WAV file and return samples as f32 along with the spec.
///
/// Multi-channel files are mixed down to mono by averaging channels.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f32>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = spec.channels as usize;

    let samples = decode_samples(reader)?;

    let mono = if channels <= 1 {
        samples
    } else {
        samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };

    tracing::debug!(
        frames = mono.len(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        "read wav (mono mixdown)"
    );
    Ok((mono, spec))
}

/// Read a stereo WAV file into separate left/right buffers.
///
/// Mono files are duplicated into both channels; files with more than two
/// channels are rejected.
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoSamples, WavSpec)> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = spec.channels as usize;

    if channels > 2 {
        return Err(Error::ChannelMismatch {
            expected: 2,
            actual: spec.channels,
        });
    }

    let samples = decode_samples(reader)?;

    let stereo = if channels == 1 {
        StereoSamples {
            left: samples.clone(),
            right: samples,
        }
    } else {
        let frames = samples.len() / 2;
        let mut left = Vec::with_capacity(frames);
        let mut right = Vec::with_capacity(frames);
        for frame in samples.chunks_exact(2) {
            left.push(frame[0]);
            right.push(frame[1]);
        }
        StereoSamples { left, right }
    };

    tracing::debug!(
        frames = stereo.left.len(),
        sample_rate = spec.sample_rate,
        "read wav (stereo)"
    );
    Ok((stereo, spec))
}

/// Write mono f32 samples to a WAV file.
///
/// Samples are encoded according to `spec.bits_per_sample`: 32 writes IEEE
/// float, 16 and 24 write scaled PCM integers. The channel count in `spec`
/// is ignored (output is mono).
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f32], spec: WavSpec) -> Result<()> {
    let out_spec = WavSpec {
        channels: 1,
        ..spec
    };
    let mut writer = WavWriter::create(path, out_spec.into())?;
    write_frames(&mut writer, samples, out_spec.bits_per_sample)?;
    writer.finalize()?;
    Ok(())
}

/// Write stereo f32 samples to a WAV file, interleaving left and right.
pub fn write_wav_stereo<P: AsRef<Path>>(path: P, stereo: &StereoSamples, spec: WavSpec) -> Result<()> {
    debug_assert_eq!(stereo.left.len(), stereo.right.len());
    let out_spec = WavSpec {
        channels: 2,
        ..spec
    };
    let mut writer = WavWriter::create(path, out_spec.into())?;

    let interleaved: Vec<f32> = stereo
        .left
        .iter()
        .zip(stereo.right.iter())
        .flat_map(|(&l, &r)| [l, r])
        .collect();
    write_frames(&mut writer, &interleaved, out_spec.bits_per_sample)?;
    writer.finalize()?;
    Ok(())
}

/// Decode all samples from a reader into normalized f32.
fn decode_samples<R: std::io::Read>(mut reader: WavReader<R>) -> Result<Vec<f32>> {
    let spec = reader.spec();
    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        SampleFormat::Int => {
            let scale = match spec.bits_per_sample {
                16 => f32::from(i16::MAX),
                24 => 8_388_607.0,
                32 => i32::MAX as f32,
                bits => {
                    return Err(Error::UnsupportedFormat(format!("{bits}-bit PCM")));
                }
            };
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()?
        }
    };
    Ok(samples)
}

/// Encode f32 samples at the requested bit depth.
fn write_frames<W: std::io::Write + std::io::Seek>(
    writer: &mut WavWriter<W>,
    samples: &[f32],
    bits_per_sample: u16,
) -> Result<()> {
    match bits_per_sample {
        32 => {
            for &sample in samples {
                writer.write_sample(sample)?;
            }
        }
        16 => {
            for &sample in samples {
                let scaled = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
                writer.write_sample(scaled)?;
            }
        }
        24 => {
            for &sample in samples {
                let scaled = (sample.clamp(-1.0, 1.0) * 8_388_607.0) as i32;
                writer.write_sample(scaled)?;
            }
        }
        bits => {
            return Err(Error::UnsupportedFormat(format!("{bits}-bit output")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip_f32.wav");

        let samples: Vec<f32> = (0..480).map(|i| (i as f32 * 0.013).sin() * 0.8).collect();
        let spec = WavSpec::default();
        write_wav(&path, &samples, spec).unwrap();

        let (loaded, loaded_spec) = read_wav(&path).unwrap();
        assert_eq!(loaded_spec.sample_rate, 48000);
        assert_eq!(loaded.len(), samples.len());
        for (a, b) in samples.iter().zip(loaded.iter()) {
            assert_eq!(a.to_bits(), b.to_bits(), "float samples must be lossless");
        }
    }

    #[test]
    fn test_pcm16_roundtrip_tolerance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip_i16.wav");

        let samples: Vec<f32> = (0..480).map(|i| (i as f32 * 0.013).sin() * 0.8).collect();
        let spec = WavSpec {
            bits_per_sample: 16,
            ..WavSpec::default()
        };
        write_wav(&path, &samples, spec).unwrap();

        let (loaded, _) = read_wav(&path).unwrap();
        assert_eq!(loaded.len(), samples.len());
        for (a, b) in samples.iter().zip(loaded.iter()) {
            // 16-bit quantization step is ~6e-5
            assert!((a - b).abs() < 1e-3, "{a} vs {b}");
        }
    }

    #[test]
    fn test_stereo_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip_stereo.wav");

        let stereo = StereoSamples {
            left: vec![0.1, 0.2, 0.3],
            right: vec![-0.1, -0.2, -0.3],
        };
        write_wav_stereo(&path, &stereo, WavSpec::default()).unwrap();

        let (loaded, spec) = read_wav_stereo(&path).unwrap();
        assert_eq!(spec.channels, 2);
        assert_eq!(loaded.left, stereo.left);
        assert_eq!(loaded.right, stereo.right);
    }

    #[test]
    fn test_mono_mixdown_averages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixdown.wav");

        let stereo = StereoSamples {
            left: vec![1.0, 0.0],
            right: vec![0.0, 1.0],
        };
        write_wav_stereo(&path, &stereo, WavSpec::default()).unwrap();

        let (mono, _) = read_wav(&path).unwrap();
        assert_eq!(mono, vec![0.5, 0.5]);
    }

    #[test]
    fn test_mono_file_duplicates_to_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono.wav");

        write_wav(&path, &[0.25, -0.25], WavSpec::default()).unwrap();
        let (stereo, _) = read_wav_stereo(&path).unwrap();
        assert_eq!(stereo.left, stereo.right);
        assert_eq!(stereo.left, vec![0.25, -0.25]);
    }

    #[test]
    fn test_unsupported_bit_depth_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.wav");
        let spec = WavSpec {
            bits_per_sample: 8,
            ..WavSpec::default()
        };
        let result = write_wav(&path, &[0.0], spec);
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }
}
