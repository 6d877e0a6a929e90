//! File-based compression command.

use anyhow::Context;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use stretta_core::{DetectorMode, linear_to_db};
use stretta_io::{ProcessingEngine, StereoSamples, WavSpec, read_wav_stereo, write_wav, write_wav_stereo};

/// Level detection mode flag.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Peak (absolute value) detection
    Peak,
    /// Mean-square detection
    Ms,
    /// RMS detection
    Rms,
}

impl From<ModeArg> for DetectorMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Peak => DetectorMode::Peak,
            ModeArg::Ms => DetectorMode::MeanSquare,
            ModeArg::Rms => DetectorMode::Rms,
        }
    }
}

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Threshold in dB (-60 to 0)
    #[arg(short, long, default_value = "-12", allow_hyphen_values = true)]
    threshold: f32,

    /// Compression ratio (1 to 20)
    #[arg(short, long, default_value = "4")]
    ratio: f32,

    /// Knee width in dB (0 to 20)
    #[arg(short, long, default_value = "0")]
    knee: f32,

    /// Attack time in ms (0.02 to 300)
    #[arg(short, long, default_value = "10")]
    attack: f32,

    /// Release time in ms (10 to 5000)
    #[arg(long, default_value = "200")]
    release: f32,

    /// Detector input gain in dB (-12 to 12)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    detector_gain: f32,

    /// Make-up output gain in dB (0 to 40)
    #[arg(short, long, default_value = "0")]
    output_gain: f32,

    /// Use analogue time-constant ballistics
    #[arg(long)]
    analogue: bool,

    /// Level detection mode
    #[arg(long, value_enum, default_value = "rms")]
    mode: ModeArg,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "32")]
    bit_depth: u16,
}

pub fn run(args: ProcessArgs) -> anyhow::Result<()> {
    println!("Reading {}...", args.input.display());
    let (stereo, spec) = read_wav_stereo(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let sample_rate = spec.sample_rate as f32;
    let frames = stereo.left.len();

    println!(
        "  {} frames, {} channel(s), {} Hz, {:.2}s",
        frames,
        spec.channels,
        spec.sample_rate,
        frames as f32 / sample_rate
    );

    let mut engine = ProcessingEngine::new(sample_rate);
    let params = engine.params();
    params.set_threshold_db(args.threshold);
    params.set_ratio(args.ratio);
    params.set_knee_db(args.knee);
    params.set_attack_ms(args.attack);
    params.set_release_ms(args.release);
    params.set_detector_gain_db(args.detector_gain);
    params.set_output_gain_db(args.output_gain);
    params.set_analogue_tc(args.analogue);
    params.set_detector_mode(args.mode.into());

    println!(
        "Compressing: threshold {} dB, ratio {}:1, knee {} dB, attack {} ms, release {} ms",
        args.threshold, args.ratio, args.knee, args.attack, args.release
    );

    let pb = ProgressBar::new(frames as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );

    let block_size = args.block_size.max(1);
    let meter = engine.meter();
    let mut peak_reduction_db = 0.0f32;

    let mut left_out = vec![0.0f32; frames];
    let mut right_out = vec![0.0f32; frames];

    let mut pos = 0;
    while pos < frames {
        let end = (pos + block_size).min(frames);
        engine.process_block_stereo(
            &stereo.left[pos..end],
            &stereo.right[pos..end],
            &mut left_out[pos..end],
            &mut right_out[pos..end],
        );
        peak_reduction_db = peak_reduction_db.min(meter.load());
        pos = end;
        pb.set_position(pos as u64);
    }
    pb.finish_with_message("done");

    println!("\nStats:");
    print_level_stats("Input", &stereo.left, &stereo.right, spec.channels);
    print_level_stats("Output", &left_out, &right_out, spec.channels);
    println!("  Peak gain reduction: {:.1} dB", peak_reduction_db);

    let out_spec = WavSpec {
        channels: spec.channels.min(2),
        sample_rate: spec.sample_rate,
        bits_per_sample: args.bit_depth,
    };

    println!("\nWriting {}...", args.output.display());
    if out_spec.channels == 1 {
        write_wav(&args.output, &left_out, out_spec)
            .with_context(|| format!("failed to write {}", args.output.display()))?;
    } else {
        let out = StereoSamples {
            left: left_out,
            right: right_out,
        };
        write_wav_stereo(&args.output, &out, out_spec)
            .with_context(|| format!("failed to write {}", args.output.display()))?;
    }
    println!("Done.");

    Ok(())
}

fn print_level_stats(label: &str, left: &[f32], right: &[f32], channels: u16) {
    let (rms_level, peak_level) = if channels == 1 {
        (rms(left), peak(left))
    } else {
        let combined_rms =
            libm::sqrtf((rms(left) * rms(left) + rms(right) * rms(right)) * 0.5);
        (combined_rms, peak(left).max(peak(right)))
    };
    println!(
        "  {}: RMS {:.1} dB, Peak {:.1} dB",
        label,
        linear_to_db(rms_level),
        linear_to_db(peak_level)
    );
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    libm::sqrtf(sum_squares / samples.len() as f32)
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_and_peak() {
        let samples = [0.5f32, -0.5, 0.5, -0.5];
        assert!((rms(&samples) - 0.5).abs() < 1e-6);
        assert_eq!(peak(&samples), 0.5);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_mode_arg_maps_to_detector_mode() {
        assert_eq!(DetectorMode::from(ModeArg::Peak), DetectorMode::Peak);
        assert_eq!(DetectorMode::from(ModeArg::Ms), DetectorMode::MeanSquare);
        assert_eq!(DetectorMode::from(ModeArg::Rms), DetectorMode::Rms);
    }
}
