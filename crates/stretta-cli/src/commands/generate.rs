//! Test-signal generation command.

use anyhow::Context;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use stretta_core::db_to_linear;
use stretta_io::{WavSpec, write_wav};

/// Available test signals.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SignalArg {
    /// Continuous sine tone
    Sine,
    /// Silence, then a sine burst, then silence - for watching attack and
    /// release ballistics
    Burst,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Signal type
    #[arg(short, long, value_enum, default_value = "sine")]
    signal: SignalArg,

    /// Frequency in Hz
    #[arg(short, long, default_value = "1000")]
    freq: f32,

    /// Amplitude in dBFS (0 = full scale)
    #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
    amplitude: f32,

    /// Total duration in seconds
    #[arg(short, long, default_value = "2.0")]
    duration: f32,

    /// Sample rate in Hz
    #[arg(long, default_value = "48000")]
    sample_rate: u32,
}

pub fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let samples = render(&args);

    let spec = WavSpec {
        channels: 1,
        sample_rate: args.sample_rate,
        bits_per_sample: 32,
    };
    write_wav(&args.output, &samples, spec)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "Wrote {} samples ({:.2}s at {} Hz) to {}",
        samples.len(),
        args.duration,
        args.sample_rate,
        args.output.display()
    );
    Ok(())
}

fn render(args: &GenerateArgs) -> Vec<f32> {
    let sample_rate = args.sample_rate as f32;
    let total = (args.duration * sample_rate) as usize;
    let amplitude = db_to_linear(args.amplitude.min(0.0));
    let phase_step = core::f32::consts::TAU * args.freq / sample_rate;

    match args.signal {
        SignalArg::Sine => (0..total)
            .map(|i| amplitude * libm::sinf(i as f32 * phase_step))
            .collect(),
        SignalArg::Burst => {
            // Lead-in and tail silence each take a quarter of the duration,
            // the burst the middle half
            let lead = total / 4;
            let burst_end = total - total / 4;
            (0..total)
                .map(|i| {
                    if i < lead || i >= burst_end {
                        0.0
                    } else {
                        amplitude * libm::sinf((i - lead) as f32 * phase_step)
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_args(signal: SignalArg) -> GenerateArgs {
        GenerateArgs {
            output: PathBuf::from("unused.wav"),
            signal,
            freq: 1000.0,
            amplitude: 0.0,
            duration: 1.0,
            sample_rate: 48000,
        }
    }

    #[test]
    fn test_sine_length_and_amplitude() {
        let samples = render(&test_args(SignalArg::Sine));
        assert_eq!(samples.len(), 48000);
        let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!((peak - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_burst_is_silent_outside_the_middle() {
        let samples = render(&test_args(SignalArg::Burst));
        assert_eq!(samples.len(), 48000);
        assert!(samples[..12000].iter().all(|&s| s == 0.0));
        assert!(samples[36000..].iter().all(|&s| s == 0.0));
        let burst_peak = samples[12000..36000]
            .iter()
            .fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!(burst_peak > 0.99);
    }

    #[test]
    fn test_amplitude_is_capped_at_full_scale() {
        let mut args = test_args(SignalArg::Sine);
        args.amplitude = 12.0;
        let samples = render(&args);
        let peak = samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()));
        assert!(peak <= 1.0 + 1e-6);
    }
}
