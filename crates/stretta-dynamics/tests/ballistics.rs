//! Detector ballistics under a program-like signal: a full-scale sine burst
//! after silence, at 48 kHz with 10 ms attack and 200 ms release.
//!
//! The detected level must climb toward 0 dBFS within a few attack periods
//! and fall back toward the noise floor within a few release periods after
//! the burst ends. With a fast attack and slow release the smoother rides
//! near the crest of the squared sine rather than its mean, so the settled
//! level sits just below 0 dBFS instead of at the -3 dB sine RMS.

use stretta_core::{DetectorMode, Effect, EnvelopeDetector, NOISE_FLOOR_DB, TimeConstant};
use stretta_dynamics::Compressor;

const SAMPLE_RATE: f32 = 48000.0;
const ATTACK_MS: f32 = 10.0;
const RELEASE_MS: f32 = 200.0;

/// Samples in one attack period.
const ATTACK_SAMPLES: usize = (ATTACK_MS / 1000.0 * SAMPLE_RATE) as usize;
/// Samples in one release period.
const RELEASE_SAMPLES: usize = (RELEASE_MS / 1000.0 * SAMPLE_RATE) as usize;

fn sine(i: usize, freq: f32) -> f32 {
    libm::sinf(i as f32 * core::f32::consts::TAU * freq / SAMPLE_RATE)
}

fn make_detector() -> EnvelopeDetector {
    let mut det = EnvelopeDetector::new(SAMPLE_RATE);
    det.configure(
        SAMPLE_RATE,
        ATTACK_MS,
        RELEASE_MS,
        TimeConstant::Digital,
        DetectorMode::Rms,
        true,
    );
    det
}

#[test]
fn test_burst_attack_rise() {
    let mut det = make_detector();

    // Lead-in silence pins the level at the floor
    let mut level = 0.0;
    for _ in 0..4800 {
        level = det.detect(0.0);
    }
    assert_eq!(level, NOISE_FLOOR_DB);

    // 0 dBFS sine burst: the digital time constant settles to 1% within one
    // attack period, so the level is already near the top after 480 samples
    for i in 0..ATTACK_SAMPLES {
        level = det.detect(sine(i, 1000.0));
    }
    assert!(
        level > -10.0,
        "level should be most of the way up after one attack period, got {level} dB"
    );

    for i in ATTACK_SAMPLES..10 * ATTACK_SAMPLES {
        level = det.detect(sine(i, 1000.0));
    }
    assert!(
        (-4.0..=0.0).contains(&level),
        "settled level should ride just below 0 dBFS, got {level} dB"
    );
}

#[test]
fn test_burst_release_decay() {
    let mut det = make_detector();

    // Settle on the burst (one second)
    let mut settled = 0.0;
    for i in 0..48000 {
        settled = det.detect(sine(i, 1000.0));
    }

    // Burst ends: one release period drops the mean-square envelope to 1%,
    // which reads as 20 dB of RMS level
    let mut level = 0.0;
    for _ in 0..RELEASE_SAMPLES {
        level = det.detect(0.0);
    }
    assert!(
        level < settled - 19.5,
        "one release period should shed ~20 dB: {settled} dB -> {level} dB"
    );

    for _ in 0..4 * RELEASE_SAMPLES {
        level = det.detect(0.0);
    }
    assert!(
        level < -60.0,
        "level should approach the noise floor, got {level} dB"
    );
}

#[test]
fn test_release_is_slower_than_attack() {
    let mut det = make_detector();

    // Samples to cross -10 dB on the way up, from silence...
    let mut rise_samples = 0;
    for i in 0..96000 {
        if det.detect(sine(i, 1000.0)) > -10.0 {
            rise_samples = i + 1;
            break;
        }
    }
    assert!(rise_samples > 0, "detector never reached -10 dB");

    // ...then settle fully before timing the fall below -10 dB
    for i in 0..48000 {
        det.detect(sine(i, 1000.0));
    }
    let mut fall_samples = 0;
    for i in 0..960000 {
        if det.detect(0.0) < -10.0 {
            fall_samples = i + 1;
            break;
        }
    }
    assert!(fall_samples > 0, "detector never released below -10 dB");
    assert!(
        fall_samples > 4 * rise_samples,
        "release ({fall_samples}) should be much slower than attack ({rise_samples})"
    );
}

#[test]
fn test_compressor_gain_follows_burst() {
    let mut comp = Compressor::new(SAMPLE_RATE);
    comp.set_threshold_db(-20.0);
    comp.set_ratio(4.0);
    comp.set_attack_ms(ATTACK_MS);
    comp.set_release_ms(RELEASE_MS);

    // Silence: no reduction
    for _ in 0..4800 {
        comp.process(0.0);
    }
    assert_eq!(comp.gain_reduction_db(), 0.0);

    // Burst: the detector settles a little below 0 dBFS; ~19 dB over the
    // threshold at 4:1 is ~14 dB of reduction
    for i in 0..48000 {
        comp.process(sine(i, 1000.0));
    }
    let reduction = comp.gain_reduction_db();
    assert!(
        (-16.0..=-11.0).contains(&reduction),
        "expected roughly -14 dB of reduction, got {reduction}"
    );

    // Tail: reduction releases back to none
    for _ in 0..5 * (RELEASE_MS / 1000.0 * SAMPLE_RATE) as usize {
        comp.process(0.0);
    }
    assert_eq!(comp.gain_reduction_db(), 0.0);
}
