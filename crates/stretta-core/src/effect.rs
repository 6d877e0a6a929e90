//! Core Effect trait.
//!
//! The [`Effect`] trait is the seam between the DSP core and whatever host
//! drives it: a sample (or block) goes in, a processed sample comes out, and
//! the host owns buffer management and scheduling.
//!
//! ## Design Decisions
//!
//! - **Object-safe**: `dyn Effect` works for runtime composition, though
//!   static dispatch is preferred in hot paths.
//! - **No allocations**: all methods are callable from a real-time audio
//!   callback.
//! - **Stereo as an override**: the default stereo methods route each channel
//!   through [`process`](Effect::process) in turn, which is only correct for
//!   stateless processors. Stateful effects override them.

/// Core trait for audio processors.
///
/// # Example
///
/// ```rust
/// use stretta_core::Effect;
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn process(&mut self, input: f32) -> f32 {
///         input * self.gain
///     }
///
///     fn set_sample_rate(&mut self, _sample_rate: f32) {}
///
///     fn reset(&mut self) {}
/// }
/// ```
pub trait Effect {
    /// Process a single sample, advancing internal state by one tick.
    ///
    /// # Arguments
    /// * `input` - Input sample, typically in range [-1.0, 1.0]
    fn process(&mut self, input: f32) -> f32;

    /// Process one stereo frame.
    ///
    /// The default routes left then right through [`process`](Self::process),
    /// which treats the two channels as one interleaved stream. Effects with
    /// per-channel or linked state must override this.
    fn process_stereo(&mut self, left: f32, right: f32) -> (f32, f32) {
        (self.process(left), self.process(right))
    }

    /// Process a block of samples.
    ///
    /// Default implementation calls [`process`](Self::process) per sample.
    /// Implementations may override to hoist loop-invariant work.
    ///
    /// # Panics
    /// Default implementation debug-asserts `input.len() == output.len()`.
    fn process_block(&mut self, input: &[f32], output: &mut [f32]) {
        debug_assert_eq!(
            input.len(),
            output.len(),
            "Input and output buffers must have same length"
        );
        for (inp, out) in input.iter().zip(output.iter_mut()) {
            *out = self.process(*inp);
        }
    }

    /// Process a block of stereo samples.
    ///
    /// Default implementation calls [`process_stereo`](Self::process_stereo)
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
        for i in 0..left_in.len() {
            let (l, r) = self.process_stereo(left_in[i], right_in[i]);
            left_out[i] = l;
            right_out[i] = r;
        }
    }

    /// Update the sample rate.
    ///
    /// Called on stream start or restart. Effects recalculate any
    /// sample-rate-dependent coefficients here.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Reset internal state without changing parameters.
    ///
    /// Called when playback stops/starts to prevent artifacts from stale
    /// state.
    fn reset(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Gain(f32);

    impl Effect for Gain {
        fn process(&mut self, input: f32) -> f32 {
            input * self.0
        }
        fn set_sample_rate(&mut self, _: f32) {}
        fn reset(&mut self) {}
    }

    #[test]
    fn test_block_default_matches_per_sample() {
        let mut gain = Gain(2.0);
        let input = [1.0, 2.0, 3.0];
        let mut output = [0.0; 3];
        gain.process_block(&input, &mut output);
        assert_eq!(output, [2.0, 4.0, 6.0]);
    }

    #[test]
    fn test_stereo_default_is_dual_mono() {
        let mut gain = Gain(0.5);
        assert_eq!(gain.process_stereo(1.0, -1.0), (0.5, -0.5));
    }

    #[test]
    fn test_block_stereo_default() {
        let mut gain = Gain(3.0);
        let left_in = [1.0, 0.0];
        let right_in = [0.0, 1.0];
        let mut left_out = [0.0; 2];
        let mut right_out = [0.0; 2];
        gain.process_block_stereo(&left_in, &right_in, &mut left_out, &mut right_out);
        assert_eq!(left_out, [3.0, 0.0]);
        assert_eq!(right_out, [0.0, 3.0]);
    }
}
