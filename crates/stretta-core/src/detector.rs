//! Envelope detection for dynamics processing.
//!
//! [`EnvelopeDetector`] turns an instantaneous sample into a slowly-varying
//! level estimate: the input is rectified (or squared), then smoothed by a
//! one-pole filter whose corner switches between an attack and a release
//! time constant depending on whether the signal is rising or falling.
//!
//! Two time-constant curves are available. *Digital* derives the smoothing
//! coefficient so the envelope settles to 1% of a step within the configured
//! time (a pure exponential). *Analogue* instead targets the 36.8% point of
//! an RC capacitor discharge, so the envelope has covered only one time
//! constant's worth of ground when the configured time elapses and then
//! tails off — the ballistics of classic hardware detectors.

use crate::fast_math::fast_linear_to_db;
use crate::math::flush_denormal;
use libm::{expf, sqrtf};

/// Pre-processing applied to the raw sample before smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectorMode {
    /// Absolute value. Fastest response, tracks transients.
    Peak,
    /// Squared sample. Tracks signal power.
    MeanSquare,
    /// Squared sample, with a square root applied to the smoothed result.
    /// Tracks perceived loudness; the usual choice for compression.
    #[default]
    Rms,
}

impl DetectorMode {
    /// Stable numeric code, used by stepped parameters and atomic stores.
    pub const fn index(self) -> u8 {
        match self {
            DetectorMode::Peak => 0,
            DetectorMode::MeanSquare => 1,
            DetectorMode::Rms => 2,
        }
    }

    /// Inverse of [`index`](Self::index); out-of-range codes fall back to RMS.
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => DetectorMode::Peak,
            1 => DetectorMode::MeanSquare,
            _ => DetectorMode::Rms,
        }
    }
}

/// Time-constant curve shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeConstant {
    /// Pure exponential; the envelope settles to 1% of a step within the
    /// configured time.
    #[default]
    Digital,
    /// RC discharge curve; the envelope reaches 36.8% of a step within the
    /// configured time.
    Analogue,
}

// Settling targets for coefficient derivation: ln(0.01) and ln(0.368).
const DIGITAL_TC: f32 = -4.605_170_2;
const ANALOGUE_TC: f32 = -0.999_672_3;

/// Log-domain floor in dB, returned when the envelope reaches zero.
///
/// Matches the quantization noise floor of 16-bit audio. The log output
/// never goes below this value, so silence reads as a finite level instead
/// of −∞.
pub const NOISE_FLOOR_DB: f32 = -96.0;

/// Smallest accepted attack time in milliseconds.
pub const MIN_ATTACK_MS: f32 = 0.02;
/// Smallest accepted release time in milliseconds.
pub const MIN_RELEASE_MS: f32 = 1.0;

/// Envelope detector with independent attack and release ballistics.
///
/// One instance tracks one audio channel. The running envelope is the only
/// piece of per-sample state; every setter recomputes coefficients without
/// touching it, so configuration is hot-swappable while audio runs.
///
/// # Example
///
/// ```rust
/// use stretta_core::{DetectorMode, EnvelopeDetector, TimeConstant};
///
/// let mut det = EnvelopeDetector::new(48000.0);
/// det.set_attack_ms(10.0);
/// det.set_release_ms(200.0);
/// det.set_mode(DetectorMode::Rms);
/// det.set_log_domain(true);
///
/// let level_db = det.detect(0.5);
/// assert!(level_db <= 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeDetector {
    /// Running envelope (linear; squared domain for MS/RMS modes)
    envelope: f32,
    /// Attack coefficient
    attack_coeff: f32,
    /// Release coefficient
    release_coeff: f32,
    /// Sample rate in Hz
    sample_rate: f32,
    /// Attack time in ms (kept for recalculation)
    attack_ms: f32,
    /// Release time in ms (kept for recalculation)
    release_ms: f32,
    /// Coefficient curve shape
    time_constant: TimeConstant,
    /// Rectification mode
    mode: DetectorMode,
    /// Return the level in dB instead of linear amplitude
    log_domain: bool,
}

impl EnvelopeDetector {
    /// Create a detector with default ballistics.
    ///
    /// Defaults: 10 ms attack, 200 ms release, digital time constants,
    /// RMS detection, linear output.
    pub fn new(sample_rate: f32) -> Self {
        let mut detector = Self {
            envelope: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            sample_rate: sample_rate.max(1.0),
            attack_ms: 10.0,
            release_ms: 200.0,
            time_constant: TimeConstant::Digital,
            mode: DetectorMode::Rms,
            log_domain: false,
        };
        detector.recalculate_coefficients();
        detector
    }

    /// Configure every setting at once and reset the envelope.
    ///
    /// This is the stream-start entry point; the individual setters below
    /// are the hot-swap path.
    pub fn configure(
        &mut self,
        sample_rate: f32,
        attack_ms: f32,
        release_ms: f32,
        time_constant: TimeConstant,
        mode: DetectorMode,
        log_domain: bool,
    ) {
        self.sample_rate = sample_rate.max(1.0);
        self.attack_ms = attack_ms.max(MIN_ATTACK_MS);
        self.release_ms = release_ms.max(MIN_RELEASE_MS);
        self.time_constant = time_constant;
        self.mode = mode;
        self.log_domain = log_domain;
        self.envelope = 0.0;
        self.recalculate_coefficients();
    }

    /// Set the attack time in milliseconds.
    ///
    /// Takes effect on the next sample; the running envelope is preserved.
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.attack_ms = attack_ms.max(MIN_ATTACK_MS);
        self.recalculate_coefficients();
    }

    /// Current attack time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Set the release time in milliseconds.
    ///
    /// Takes effect on the next sample; the running envelope is preserved.
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.release_ms = release_ms.max(MIN_RELEASE_MS);
        self.recalculate_coefficients();
    }

    /// Current release time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Switch between digital and analogue time-constant curves.
    pub fn set_time_constant(&mut self, time_constant: TimeConstant) {
        self.time_constant = time_constant;
        self.recalculate_coefficients();
    }

    /// Current time-constant curve.
    pub fn time_constant(&self) -> TimeConstant {
        self.time_constant
    }

    /// Switch the detection mode.
    ///
    /// The running envelope carries over; when switching between peak and the
    /// squared-domain modes it re-converges within one attack/release period.
    pub fn set_mode(&mut self, mode: DetectorMode) {
        self.mode = mode;
    }

    /// Current detection mode.
    pub fn mode(&self) -> DetectorMode {
        self.mode
    }

    /// Choose dB (`true`) or linear (`false`) output.
    pub fn set_log_domain(&mut self, log_domain: bool) {
        self.log_domain = log_domain;
    }

    /// Whether the detector reports levels in dB.
    pub fn log_domain(&self) -> bool {
        self.log_domain
    }

    /// Update the sample rate and recalculate coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate.max(1.0);
        self.recalculate_coefficients();
    }

    /// Consume one sample and return the updated level estimate.
    ///
    /// Returns dB when the log domain is enabled (floored at
    /// [`NOISE_FLOOR_DB`]), linear amplitude otherwise. The result is always
    /// finite, including for zero input.
    #[inline]
    pub fn detect(&mut self, input: f32) -> f32 {
        let magnitude = match self.mode {
            DetectorMode::Peak => input.abs(),
            DetectorMode::MeanSquare | DetectorMode::Rms => input * input,
        };
        // A non-finite sample must not poison the envelope
        let magnitude = if magnitude.is_finite() { magnitude } else { 0.0 };

        // Rising input takes the attack corner, falling the release corner
        let coeff = if magnitude > self.envelope {
            self.attack_coeff
        } else {
            self.release_coeff
        };

        // One-pole smoothing: y[n] = coeff * y[n-1] + (1 - coeff) * x[n]
        self.envelope = flush_denormal(coeff * self.envelope + (1.0 - coeff) * magnitude);

        let level = match self.mode {
            DetectorMode::Rms => sqrtf(self.envelope),
            DetectorMode::Peak | DetectorMode::MeanSquare => self.envelope,
        };

        if self.log_domain {
            if level <= 0.0 {
                NOISE_FLOOR_DB
            } else {
                fast_linear_to_db(level).max(NOISE_FLOOR_DB)
            }
        } else {
            level
        }
    }

    /// Current envelope value without consuming a sample.
    ///
    /// Always linear (squared domain for MS/RMS), regardless of the
    /// log-domain flag.
    pub fn envelope(&self) -> f32 {
        self.envelope
    }

    /// Reset the envelope to zero.
    pub fn reset(&mut self) {
        self.envelope = 0.0;
    }

    fn recalculate_coefficients(&mut self) {
        let tc = match self.time_constant {
            TimeConstant::Digital => DIGITAL_TC,
            TimeConstant::Analogue => ANALOGUE_TC,
        };
        // coeff = exp(tc / (time_ms * sample_rate / 1000))
        self.attack_coeff = expf(tc / (self.attack_ms * self.sample_rate * 0.001));
        self.release_coeff = expf(tc / (self.release_ms * self.sample_rate * 0.001));
    }
}

impl Default for EnvelopeDetector {
    fn default() -> Self {
        Self::new(48000.0)
    }
}
