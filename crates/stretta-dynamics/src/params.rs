//! Lock-free parameter exchange between the control and audio threads.
//!
//! The control thread (UI, CLI, automation) writes parameters through
//! [`SharedParams`] setters; the audio thread takes one [`CompressorParams`]
//! snapshot per block and pushes it into the [`Compressor`]. Every field is
//! an independent machine-word atomic read with `Relaxed` ordering: a block
//! may observe some fields from before a control gesture and some from
//! after, which is harmless because each parameter independently affects
//! only the current block's computation.
//!
//! Telemetry flows the other way through [`GainReductionMeter`]: the audio
//! thread stores the latest gain reduction once per block, and a meter
//! display polls it at whatever rate it likes.
//!
//! Values are clamped to their descriptor ranges in the setters, so the
//! audio thread never has to validate.

use crate::compressor::Compressor;
use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, Ordering};
use stretta_core::{DetectorMode, TimeConstant};

/// Plain snapshot of every compressor parameter.
///
/// `Copy`-able POD; taken once per block on the audio thread and pushed into
/// the effect, so the per-sample code reads ordinary fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorParams {
    /// Threshold in dB.
    pub threshold_db: f32,
    /// Compression ratio (≥ 1).
    pub ratio: f32,
    /// Knee width in dB (≥ 0).
    pub knee_db: f32,
    /// Attack time in milliseconds.
    pub attack_ms: f32,
    /// Release time in milliseconds.
    pub release_ms: f32,
    /// Detector input gain in dB.
    pub detector_gain_db: f32,
    /// Make-up output gain in dB.
    pub output_gain_db: f32,
    /// Analogue (`true`) or digital (`false`) detector ballistics.
    pub analogue_tc: bool,
    /// Level detection mode.
    pub detector_mode: DetectorMode,
}

impl Default for CompressorParams {
    fn default() -> Self {
        Self {
            threshold_db: -12.0,
            ratio: 4.0,
            knee_db: 0.0,
            attack_ms: 10.0,
            release_ms: 200.0,
            detector_gain_db: 0.0,
            output_gain_db: 0.0,
            analogue_tc: false,
            detector_mode: DetectorMode::Rms,
        }
    }
}

impl CompressorParams {
    /// Push this snapshot into a compressor.
    ///
    /// The compressor's setters re-clamp and recompute coefficients; the
    /// running envelope is untouched, so parameter changes are click-free.
    pub fn apply_to(&self, compressor: &mut Compressor) {
        compressor.set_threshold_db(self.threshold_db);
        compressor.set_ratio(self.ratio);
        compressor.set_knee_db(self.knee_db);
        compressor.set_attack_ms(self.attack_ms);
        compressor.set_release_ms(self.release_ms);
        compressor.set_detector_gain_db(self.detector_gain_db);
        compressor.set_output_gain_db(self.output_gain_db);
        compressor.set_time_constant(if self.analogue_tc {
            TimeConstant::Analogue
        } else {
            TimeConstant::Digital
        });
        compressor.set_detector_mode(self.detector_mode);
    }
}

/// Lock-free compressor parameter store.
///
/// Float fields are stored as `AtomicU32` bit patterns, the toggle as an
/// `AtomicBool` and the mode as an `AtomicU8`, so every access is a single
/// machine-word atomic and the audio thread never blocks.
///
/// # Example
///
/// ```rust
/// use stretta_dynamics::SharedParams;
///
/// let params = SharedParams::new();
/// params.set_threshold_db(-24.0);   // control thread
/// let snap = params.snapshot();     // audio thread
/// assert_eq!(snap.threshold_db, -24.0);
/// ```
#[derive(Debug)]
pub struct SharedParams {
    threshold_db: AtomicU32,
    ratio: AtomicU32,
    knee_db: AtomicU32,
    attack_ms: AtomicU32,
    release_ms: AtomicU32,
    detector_gain_db: AtomicU32,
    output_gain_db: AtomicU32,
    analogue_tc: AtomicBool,
    detector_mode: AtomicU8,
}

impl SharedParams {
    /// Create a store holding the default parameter set.
    pub fn new() -> Self {
        Self::from_params(CompressorParams::default())
    }

    /// Create a store holding the given parameter set (clamped).
    pub fn from_params(params: CompressorParams) -> Self {
        let store = Self {
            threshold_db: AtomicU32::new(0),
            ratio: AtomicU32::new(0),
            knee_db: AtomicU32::new(0),
            attack_ms: AtomicU32::new(0),
            release_ms: AtomicU32::new(0),
            detector_gain_db: AtomicU32::new(0),
            output_gain_db: AtomicU32::new(0),
            analogue_tc: AtomicBool::new(false),
            detector_mode: AtomicU8::new(DetectorMode::Rms.index()),
        };
        store.set_all(params);
        store
    }

    /// Write every field from a snapshot (each clamped independently).
    pub fn set_all(&self, params: CompressorParams) {
        self.set_threshold_db(params.threshold_db);
        self.set_ratio(params.ratio);
        self.set_knee_db(params.knee_db);
        self.set_attack_ms(params.attack_ms);
        self.set_release_ms(params.release_ms);
        self.set_detector_gain_db(params.detector_gain_db);
        self.set_output_gain_db(params.output_gain_db);
        self.set_analogue_tc(params.analogue_tc);
        self.set_detector_mode(params.detector_mode);
    }

    /// Set threshold in dB (clamped to -60..0).
    pub fn set_threshold_db(&self, value: f32) {
        store_f32(&self.threshold_db, value.clamp(-60.0, 0.0));
    }

    /// Set compression ratio (clamped to 1..20).
    pub fn set_ratio(&self, value: f32) {
        store_f32(&self.ratio, value.clamp(1.0, 20.0));
    }

    /// Set knee width in dB (clamped to 0..20).
    pub fn set_knee_db(&self, value: f32) {
        store_f32(&self.knee_db, value.clamp(0.0, 20.0));
    }

    /// Set attack time in ms (clamped to 0.02..300).
    pub fn set_attack_ms(&self, value: f32) {
        store_f32(&self.attack_ms, value.clamp(0.02, 300.0));
    }

    /// Set release time in ms (clamped to 10..5000).
    pub fn set_release_ms(&self, value: f32) {
        store_f32(&self.release_ms, value.clamp(10.0, 5000.0));
    }

    /// Set detector input gain in dB (clamped to -12..12).
    pub fn set_detector_gain_db(&self, value: f32) {
        store_f32(&self.detector_gain_db, value.clamp(-12.0, 12.0));
    }

    /// Set make-up output gain in dB (clamped to 0..40).
    pub fn set_output_gain_db(&self, value: f32) {
        store_f32(&self.output_gain_db, value.clamp(0.0, 40.0));
    }

    /// Choose analogue (`true`) or digital (`false`) ballistics.
    pub fn set_analogue_tc(&self, analogue: bool) {
        self.analogue_tc.store(analogue, Ordering::Relaxed);
    }

    /// Set the level detection mode.
    pub fn set_detector_mode(&self, mode: DetectorMode) {
        self.detector_mode.store(mode.index(), Ordering::Relaxed);
    }

    /// Read every field into a plain snapshot.
    ///
    /// Called once per block on the audio thread. Field reads are
    /// individually atomic; the set as a whole is not a transaction.
    pub fn snapshot(&self) -> CompressorParams {
        CompressorParams {
            threshold_db: load_f32(&self.threshold_db),
            ratio: load_f32(&self.ratio),
            knee_db: load_f32(&self.knee_db),
            attack_ms: load_f32(&self.attack_ms),
            release_ms: load_f32(&self.release_ms),
            detector_gain_db: load_f32(&self.detector_gain_db),
            output_gain_db: load_f32(&self.output_gain_db),
            analogue_tc: self.analogue_tc.load(Ordering::Relaxed),
            detector_mode: DetectorMode::from_index(self.detector_mode.load(Ordering::Relaxed)),
        }
    }
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Gain-reduction telemetry cell.
///
/// The audio thread stores the latest reduction (dB, ≤ 0) once per block;
/// consumers read it at an arbitrary rate. Single atomic word, read-only
/// from the consumer's perspective.
#[derive(Debug)]
pub struct GainReductionMeter {
    gain_reduction_db: AtomicU32,
}

impl GainReductionMeter {
    /// Create a meter reading 0 dB (no reduction).
    pub fn new() -> Self {
        Self {
            gain_reduction_db: AtomicU32::new(0.0f32.to_bits()),
        }
    }

    /// Publish the latest gain reduction in dB. Audio-thread side.
    #[inline]
    pub fn store(&self, gain_reduction_db: f32) {
        self.gain_reduction_db
            .store(gain_reduction_db.to_bits(), Ordering::Relaxed);
    }

    /// Read the last published gain reduction in dB. Consumer side.
    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.gain_reduction_db.load(Ordering::Relaxed))
    }
}

impl Default for GainReductionMeter {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn store_f32(cell: &AtomicU32, value: f32) {
    cell.store(value.to_bits(), Ordering::Relaxed);
}

#[inline]
fn load_f32(cell: &AtomicU32) -> f32 {
    f32::from_bits(cell.load(Ordering::Relaxed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stretta_core::ParameterInfo;

    #[test]
    fn test_snapshot_roundtrip() {
        let shared = SharedParams::new();
        shared.set_threshold_db(-24.0);
        shared.set_ratio(8.0);
        shared.set_knee_db(6.0);
        shared.set_attack_ms(2.5);
        shared.set_release_ms(350.0);
        shared.set_detector_gain_db(-3.0);
        shared.set_output_gain_db(9.0);
        shared.set_analogue_tc(true);
        shared.set_detector_mode(DetectorMode::Peak);

        let snap = shared.snapshot();
        assert_eq!(snap.threshold_db, -24.0);
        assert_eq!(snap.ratio, 8.0);
        assert_eq!(snap.knee_db, 6.0);
        assert_eq!(snap.attack_ms, 2.5);
        assert_eq!(snap.release_ms, 350.0);
        assert_eq!(snap.detector_gain_db, -3.0);
        assert_eq!(snap.output_gain_db, 9.0);
        assert!(snap.analogue_tc);
        assert_eq!(snap.detector_mode, DetectorMode::Peak);
    }

    #[test]
    fn test_setters_clamp_at_boundary() {
        let shared = SharedParams::new();
        shared.set_threshold_db(-120.0);
        shared.set_ratio(0.1);
        shared.set_knee_db(-5.0);
        shared.set_attack_ms(0.0);
        shared.set_release_ms(100_000.0);
        shared.set_output_gain_db(-6.0);

        let snap = shared.snapshot();
        assert_eq!(snap.threshold_db, -60.0);
        assert_eq!(snap.ratio, 1.0);
        assert_eq!(snap.knee_db, 0.0);
        assert_eq!(snap.attack_ms, 0.02);
        assert_eq!(snap.release_ms, 5000.0);
        assert_eq!(snap.output_gain_db, 0.0);
    }

    #[test]
    fn test_default_matches_compressor_defaults() {
        let snap = SharedParams::new().snapshot();
        let comp = Compressor::new(48000.0);

        assert_eq!(snap.threshold_db, comp.threshold_db());
        assert_eq!(snap.ratio, comp.ratio());
        assert_eq!(snap.knee_db, comp.knee_db());
        assert_eq!(snap.attack_ms, comp.attack_ms());
        assert_eq!(snap.release_ms, comp.release_ms());
        assert_eq!(snap.detector_mode, comp.detector_mode());
    }

    #[test]
    fn test_apply_to_reaches_the_effect() {
        let mut comp = Compressor::new(48000.0);
        let params = CompressorParams {
            threshold_db: -30.0,
            ratio: 12.0,
            knee_db: 3.0,
            attack_ms: 1.0,
            release_ms: 50.0,
            detector_gain_db: 6.0,
            output_gain_db: 12.0,
            analogue_tc: true,
            detector_mode: DetectorMode::MeanSquare,
        };
        params.apply_to(&mut comp);

        assert_eq!(comp.threshold_db(), -30.0);
        assert_eq!(comp.ratio(), 12.0);
        assert_eq!(comp.knee_db(), 3.0);
        assert_eq!(comp.attack_ms(), 1.0);
        assert_eq!(comp.release_ms(), 50.0);
        assert_eq!(comp.detector_gain_db(), 6.0);
        assert_eq!(comp.output_gain_db(), 12.0);
        assert_eq!(comp.detector_mode(), DetectorMode::MeanSquare);
        // Introspection agrees
        assert_eq!(comp.get_param(7), 1.0);
    }

    #[test]
    fn test_apply_preserves_envelope() {
        use stretta_core::Effect;

        let mut comp = Compressor::new(48000.0);
        for _ in 0..1000 {
            comp.process(0.8);
        }
        let before = comp.gain_reduction_db();
        assert!(before < 0.0);

        // A parameter push must not reset the detector state
        SharedParams::new().snapshot().apply_to(&mut comp);
        let out = comp.process(0.8);
        assert!(out.is_finite());
        assert!(comp.gain_reduction_db() < 0.0);
    }

    #[test]
    fn test_meter_roundtrip() {
        let meter = GainReductionMeter::new();
        assert_eq!(meter.load(), 0.0);

        meter.store(-7.5);
        assert_eq!(meter.load(), -7.5);

        meter.store(0.0);
        assert_eq!(meter.load(), 0.0);
    }

    #[test]
    fn test_shared_params_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedParams>();
        assert_send_sync::<GainReductionMeter>();
    }
}
