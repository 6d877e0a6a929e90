//! Offline block-processing engine.
//!
//! [`ProcessingEngine`] owns a [`Compressor`] plus the shared parameter
//! store and gain-reduction meter, and pumps buffers through it the same way
//! a real-time host would: one parameter snapshot per block, then straight
//! per-sample processing, then one telemetry publish. A control thread can
//! hold clones of the [`SharedParams`]/[`GainReductionMeter`] handles and
//! adjust or observe while blocks are being processed.

use std::sync::Arc;
use stretta_core::Effect;
use stretta_dynamics::{Compressor, GainReductionMeter, SharedParams};

/// Block processor wiring the compressor to its control surface.
///
/// # Example
///
/// ```rust
/// use stretta_io::ProcessingEngine;
///
/// let mut engine = ProcessingEngine::new(48000.0);
/// engine.params().set_threshold_db(-24.0);
/// engine.params().set_ratio(8.0);
///
/// let input = vec![0.5f32; 512];
/// let mut output = vec![0.0f32; 512];
/// engine.process_block(&input, &mut output);
///
/// assert!(engine.meter().load() <= 0.0);
/// ```
pub struct ProcessingEngine {
    compressor: Compressor,
    params: Arc<SharedParams>,
    meter: Arc<GainReductionMeter>,
}

impl ProcessingEngine {
    /// Create an engine with default compressor settings.
    pub fn new(sample_rate: f32) -> Self {
        tracing::debug!(sample_rate, "creating processing engine");
        Self {
            compressor: Compressor::new(sample_rate),
            params: Arc::new(SharedParams::new()),
            meter: Arc::new(GainReductionMeter::new()),
        }
    }

    /// Handle to the shared parameter store (control-thread side).
    pub fn params(&self) -> Arc<SharedParams> {
        Arc::clone(&self.params)
    }

    /// Handle to the gain-reduction meter (consumer side).
    pub fn meter(&self) -> Arc<GainReductionMeter> {
        Arc::clone(&self.meter)
    }

    /// Update the sample rate (stream restart).
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        tracing::debug!(sample_rate, "engine sample rate change");
        self.compressor.set_sample_rate(sample_rate);
    }

    /// Process one mono block: sync parameters, compress, publish telemetry.
    ///
    /// Allocation-free; suitable for a real-time callback.
    pub fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        self.params.snapshot().apply_to(&mut self.compressor);
        self.compressor.process_block(input, output);
        self.meter.store(self.compressor.gain_reduction_db());
    }

    /// Process one stereo block with reference-channel detection.
    ///
    /// Allocation-free; suitable for a real-time callback.
    pub fn process_block_stereo(
        &mut self,
        left_in: &[f32],
        right_in: &[f32],
        left_out: &mut [f32],
        right_out: &mut [f32],
    ) {
        self.params.snapshot().apply_to(&mut self.compressor);
        self.compressor
            .process_block_stereo(left_in, right_in, left_out, right_out);
        self.meter.store(self.compressor.gain_reduction_db());
    }

    /// Process a whole buffer in blocks of `block_size`, returning the
    /// processed copy. Offline convenience; allocates the output buffer.
    pub fn process_buffer(&mut self, input: &[f32], block_size: usize) -> Vec<f32> {
        let block_size = block_size.max(1);
        let mut output = vec![0.0f32; input.len()];
        for (in_chunk, out_chunk) in input
            .chunks(block_size)
            .zip(output.chunks_mut(block_size))
        {
            self.process_block(in_chunk, out_chunk);
        }
        output
    }

    /// Last gain reduction in dB, straight from the effect.
    pub fn gain_reduction_db(&self) -> f32 {
        self.compressor.gain_reduction_db()
    }

    /// Reset the compressor state (envelope and telemetry).
    pub fn reset(&mut self) {
        self.compressor.reset();
        self.meter.store(0.0);
    }
}
