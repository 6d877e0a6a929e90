//! Dynamics compressor with an interpolated soft knee.
//!
//! A feed-forward compressor that reduces dynamic range by attenuating
//! signals above a threshold.
//!
//! # Signal Flow
//!
//! ```text
//! Input → Detector Gain → Envelope Detector (dB) → Gain Computer
//!                │                                      ↓
//!                └────────────× Gain Reduction × Output Gain → Output
//! ```
//!
//! The level detector runs in the log domain, so the gain computer compares
//! dB against dB. Detection happens *after* the detector-gain stage, and the
//! computed gain is applied to the gain-staged sample, so driving the
//! detector harder also drives the output.
//!
//! # Parameters
//!
//! | Parameter | Range | Description |
//! |-----------|-------|-------------|
//! | Threshold | -60 to 0 dB | Level where compression begins |
//! | Ratio | 1:1 to 20:1 | Compression strength (1:1 = bypass) |
//! | Attack | 0.02-300 ms | How fast the detector tracks rising level |
//! | Release | 10-5000 ms | How fast the detector lets go |
//! | Knee | 0-20 dB | Width of the soft transition around threshold |
//! | Detector Gain | -12 to +12 dB | Input drive into the detector |
//! | Output Gain | 0-40 dB | Make-up gain after reduction |

use stretta_core::{
    DetectorMode, Effect, EnvelopeDetector, ParamDescriptor, ParameterInfo, TimeConstant,
    db_to_linear, fast_db_to_linear, lagrange_interpolate,
};

/// Static compression curve: gain reduction in dB for a detected level.
///
/// Pure and stateless. `level_db` and `threshold_db` are both dB values;
/// `ratio` is clamped to ≥ 1 and `knee_db` to ≥ 0 before use.
///
/// With a zero knee (or a level outside the knee region) the curve is the
/// hard-knee line `min(0, (1 − 1/ratio) · (threshold − level))`. Inside the
/// knee the slope is blended from 0 at the lower edge to the full
/// compression slope at the upper edge via a two-point polynomial fit, which
/// makes the curve continuous at both edges.
///
/// The result is always ≤ 0 (a compressor never boosts) and always finite.
///
/// # Example
///
/// ```rust
/// use stretta_dynamics::compression_gain_db;
///
/// // 10 dB over a -20 dB threshold at 4:1 leaves 2.5 dB: 7.5 dB reduction
/// let gr = compression_gain_db(-10.0, -20.0, 4.0, 0.0);
/// assert!((gr - (-7.5)).abs() < 1e-6);
///
/// // Below threshold: no reduction
/// assert_eq!(compression_gain_db(-40.0, -20.0, 4.0, 0.0), 0.0);
/// ```
#[inline]
pub fn compression_gain_db(level_db: f32, threshold_db: f32, ratio: f32, knee_db: f32) -> f32 {
    let ratio = ratio.max(1.0);
    let knee_db = knee_db.max(0.0);
    // Compression slope: each dB over threshold comes out as 1/ratio dB
    let mut slope = 1.0 - 1.0 / ratio;
    let half_knee = knee_db * 0.5;

    // Knee region, with the upper edge capped at 0 dBFS so the blend always
    // lands on the full slope exactly where the hard-knee line takes over
    let lower_edge = threshold_db - half_knee;
    let upper_edge = (threshold_db + half_knee).min(0.0);

    if knee_db > 0.0 && level_db > lower_edge && level_db < upper_edge {
        // Blend the slope from 0 at the lower knee edge to the full slope at
        // the upper edge
        slope = lagrange_interpolate(&[lower_edge, upper_edge], &[0.0, slope], level_db);
    }

    // Never boost
    (slope * (threshold_db - level_db)).min(0.0)
}

/// Static compression curve as a linear gain multiplier.
///
/// `10^(gr/20)` of [`compression_gain_db`]; always in `(0, 1]`.
#[inline]
pub fn compression_gain(level_db: f32, threshold_db: f32, ratio: f32, knee_db: f32) -> f32 {
    fast_db_to_linear(compression_gain_db(level_db, threshold_db, ratio, knee_db))
}

/// Gain computer parameters, grouped so the hot path reads one place.
#[derive(Debug, Clone)]
struct GainComputer {
    threshold_db: f32,
    ratio: f32,
    knee_db: f32,
}

impl GainComputer {
    fn new() -> Self {
        Self {
            threshold_db: -12.0,
            ratio: 4.0,
            knee_db: 0.0,
        }
    }

    #[inline]
    fn compute_gain_db(&self, level_db: f32) -> f32 {
        compression_gain_db(level_db, self.threshold_db, self.ratio, self.knee_db)
    }
}

/// Dynamics compressor.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Threshold | -60.0–0.0 dB | -12.0 |
/// | 1 | Ratio | 1.0–20.0 | 4.0 |
/// | 2 | Attack | 0.02–300.0 ms | 10.0 |
/// | 3 | Release | 10.0–5000.0 ms | 200.0 |
/// | 4 | Knee | 0.0–20.0 dB | 0.0 |
/// | 5 | Detector Gain | -12.0–12.0 dB | 0.0 |
/// | 6 | Output Gain | 0.0–40.0 dB | 0.0 |
/// | 7 | Analogue TC | off/on | off |
/// | 8 | Detect Mode | peak/ms/rms | rms |
///
/// # Example
///
/// ```rust
/// use stretta_core::Effect;
/// use stretta_dynamics::Compressor;
///
/// let mut comp = Compressor::new(44100.0);
/// comp.set_threshold_db(-20.0);
/// comp.set_ratio(4.0);
/// comp.set_attack_ms(5.0);
/// comp.set_release_ms(50.0);
///
/// let output = comp.process(0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Compressor {
    detector: EnvelopeDetector,
    gain_computer: GainComputer,
    /// Input drive into the detector, linear (dB kept for introspection).
    detector_gain: f32,
    detector_gain_db: f32,
    /// Make-up gain, linear (dB kept for introspection).
    output_gain: f32,
    output_gain_db: f32,
    sample_rate: f32,
    /// Last computed gain reduction in dB (always non-positive).
    last_gain_reduction_db: f32,
}

impl Compressor {
    /// Create a compressor with default settings.
    ///
    /// The detector always runs in the log domain — the gain computer
    /// compares dB against dB.
    pub fn new(sample_rate: f32) -> Self {
        let mut detector = EnvelopeDetector::new(sample_rate);
        detector.configure(
            sample_rate,
            10.0,
            200.0,
            TimeConstant::Digital,
            DetectorMode::Rms,
            true,
        );
        Self {
            detector,
            gain_computer: GainComputer::new(),
            detector_gain: 1.0,
            detector_gain_db: 0.0,
            output_gain: 1.0,
            output_gain_db: 0.0,
            sample_rate,
            last_gain_reduction_db: 0.0,
        }
    }

    /// Set threshold in dB.
    pub fn set_threshold_db(&mut self, threshold_db: f32) {
        self.gain_computer.threshold_db = threshold_db.clamp(-60.0, 0.0);
    }

    /// Current threshold in dB.
    pub fn threshold_db(&self) -> f32 {
        self.gain_computer.threshold_db
    }

    /// Set compression ratio (1 = no compression).
    pub fn set_ratio(&mut self, ratio: f32) {
        self.gain_computer.ratio = ratio.clamp(1.0, 20.0);
    }

    /// Current compression ratio.
    pub fn ratio(&self) -> f32 {
        self.gain_computer.ratio
    }

    /// Set knee width in dB (0 = hard knee).
    pub fn set_knee_db(&mut self, knee_db: f32) {
        self.gain_computer.knee_db = knee_db.clamp(0.0, 20.0);
    }

    /// Current knee width in dB.
    pub fn knee_db(&self) -> f32 {
        self.gain_computer.knee_db
    }

    /// Set attack time in milliseconds.
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.detector.set_attack_ms(attack_ms.clamp(0.02, 300.0));
    }

    /// Current attack time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.detector.attack_ms()
    }

    /// Set release time in milliseconds.
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.detector.set_release_ms(release_ms.clamp(10.0, 5000.0));
    }

    /// Current release time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.detector.release_ms()
    }

    /// Set detector input gain in dB.
    pub fn set_detector_gain_db(&mut self, gain_db: f32) {
        self.detector_gain_db = gain_db.clamp(-12.0, 12.0);
        self.detector_gain = db_to_linear(self.detector_gain_db);
    }

    /// Current detector input gain in dB.
    pub fn detector_gain_db(&self) -> f32 {
        self.detector_gain_db
    }

    /// Set make-up output gain in dB.
    pub fn set_output_gain_db(&mut self, gain_db: f32) {
        self.output_gain_db = gain_db.clamp(0.0, 40.0);
        self.output_gain = db_to_linear(self.output_gain_db);
    }

    /// Current make-up output gain in dB.
    pub fn output_gain_db(&self) -> f32 {
        self.output_gain_db
    }

    /// Switch detector ballistics between digital and analogue curves.
    pub fn set_time_constant(&mut self, time_constant: TimeConstant) {
        self.detector.set_time_constant(time_constant);
    }

    /// Current detector time-constant curve.
    pub fn time_constant(&self) -> TimeConstant {
        self.detector.time_constant()
    }

    /// Switch the level detection mode.
    pub fn set_detector_mode(&mut self, mode: DetectorMode) {
        self.detector.set_mode(mode);
    }

    /// Current level detection mode.
    pub fn detector_mode(&self) -> DetectorMode {
        self.detector.mode()
    }

    /// Last computed gain reduction in dB (always non-positive).
    ///
    /// 0.0 means no compression is occurring; -6.0 means the signal is being
    /// reduced by 6 dB. Refreshed by every `process*` call; a meter can poll
    /// it at any rate.
    pub fn gain_reduction_db(&self) -> f32 {
        self.last_gain_reduction_db
    }
}

impl Effect for Compressor {
    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let staged = input * self.detector_gain;
        let level_db = self.detector.detect(staged);
        let gain_reduction_db = self.gain_computer.compute_gain_db(level_db);
        self.last_gain_reduction_db = gain_reduction_db;
        staged * fast_db_to_linear(gain_reduction_db) * self.output_gain
    }

    /// Process one stereo frame with reference-channel detection.
    ///
    /// Only the LEFT channel feeds the envelope detector; the resulting gain
    /// is applied to both channels. This keeps the stereo image stable with
    /// a single detector state, at the cost of ignoring right-only energy —
    /// a deliberate simplification carried in this design. The gain-reduction
    /// telemetry therefore reports the left channel.
    #[inline]
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        let staged_left = left * self.detector_gain;
        let staged_right = right * self.detector_gain;
        let level_db = self.detector.detect(staged_left);
        let gain_reduction_db = self.gain_computer.compute_gain_db(level_db);
        self.last_gain_reduction_db = gain_reduction_db;
        let gain = fast_db_to_linear(gain_reduction_db) * self.output_gain;
        (staged_left * gain, staged_right * gain)
    }

    /// Process a block of samples.
    ///
    /// Hoists the gain-computer constants out of the loop; produces
    /// bit-identical output to calling [`process`](Effect::process) per
    /// sample.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(input.len(), output.len());

        let threshold_db = self.gain_computer.threshold_db;
        let ratio = self.gain_computer.ratio;
        let knee_db = self.gain_computer.knee_db;
        let detector_gain = self.detector_gain;
        let output_gain = self.output_gain;

        for (inp, out) in input.iter().zip(output.iter_mut()) {
            let staged = *inp * detector_gain;
            let level_db = self.detector.detect(staged);
            let gain_reduction_db = compression_gain_db(level_db, threshold_db, ratio, knee_db);
            self.last_gain_reduction_db = gain_reduction_db;
            *out = staged * fast_db_to_linear(gain_reduction_db) * output_gain;
        }
    }

    /// Process a block of stereo samples with reference-channel detection.
    ///
    /// Bit-identical to calling [`process_stereo`](Effect::process_stereo)
    /// per frame.
    fn process_block_stereo(
        &mut self,
        left_in: &[f32],
        right_in: &[f32],
        left_out: &mut [f32],
        right_out: &mut [f32],
    ) {
        debug_assert_eq!(left_in.len(), right_in.len());
        debug_assert_eq!(left_in.len(), left_out.len());
        debug_assert_eq!(left_out.len(), right_out.len());

        let threshold_db = self.gain_computer.threshold_db;
        let ratio = self.gain_computer.ratio;
        let knee_db = self.gain_computer.knee_db;
        let detector_gain = self.detector_gain;
        let output_gain = self.output_gain;

        for i in 0..left_in.len() {
            let staged_left = left_in[i] * detector_gain;
            let staged_right = right_in[i] * detector_gain;
            let level_db = self.detector.detect(staged_left);
            let gain_reduction_db = compression_gain_db(level_db, threshold_db, ratio, knee_db);
            self.last_gain_reduction_db = gain_reduction_db;
            let gain = fast_db_to_linear(gain_reduction_db) * output_gain;
            left_out[i] = staged_left * gain;
            right_out[i] = staged_right * gain;
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.detector.set_sample_rate(sample_rate);
    }

    fn reset(&mut self) {
        self.detector.reset();
        self.last_gain_reduction_db = 0.0;
    }
}

impl ParameterInfo for Compressor {
    fn param_count(&self) -> usize {
        9
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        match index {
            0 => Some(ParamDescriptor::gain_db("Threshold", "Thresh", -60.0, 0.0, -12.0)),
            1 => Some(ParamDescriptor::ratio("Ratio", "Ratio", 1.0, 20.0, 4.0)),
            2 => Some(ParamDescriptor::time_ms("Attack", "Attack", 0.02, 300.0, 10.0)),
            3 => Some(ParamDescriptor::time_ms("Release", "Release", 10.0, 5000.0, 200.0)),
            4 => Some(ParamDescriptor::gain_db("Knee", "Knee", 0.0, 20.0, 0.0)),
            5 => Some(ParamDescriptor::gain_db("Detector Gain", "DetGain", -12.0, 12.0, 0.0)),
            6 => Some(ParamDescriptor::gain_db("Output Gain", "OutGain", 0.0, 40.0, 0.0)),
            7 => Some(ParamDescriptor::toggle("Analogue TC", "Analog", false)),
            8 => Some(ParamDescriptor::stepped("Detect Mode", "Detect", 3, 2)),
            _ => None,
        }
    }

    fn get_param(&self, index: usize) -> f32 {
        match index {
            0 => self.gain_computer.threshold_db,
            1 => self.gain_computer.ratio,
            2 => self.detector.attack_ms(),
            3 => self.detector.release_ms(),
            4 => self.gain_computer.knee_db,
            5 => self.detector_gain_db,
            6 => self.output_gain_db,
            7 => match self.detector.time_constant() {
                TimeConstant::Analogue => 1.0,
                TimeConstant::Digital => 0.0,
            },
            8 => f32::from(self.detector.mode().index()),
            _ => 0.0,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        match index {
            0 => self.set_threshold_db(value),
            1 => self.set_ratio(value),
            2 => self.set_attack_ms(value),
            3 => self.set_release_ms(value),
            4 => self.set_knee_db(value),
            5 => self.set_detector_gain_db(value),
            6 => self.set_output_gain_db(value),
            7 => self.set_time_constant(if value >= 0.5 {
                TimeConstant::Analogue
            } else {
                TimeConstant::Digital
            }),
            8 => self.set_detector_mode(DetectorMode::from_index(value.clamp(0.0, 2.0) as u8)),
            _ => {}
        }
    }
}
