//! Stretta Dynamics - the compressor
//!
//! This crate provides the dynamic range compressor built on stretta-core:
//!
//! - [`Compressor`] - feed-forward compressor with interpolated soft knee,
//!   selectable detection mode and digital/analogue ballistics
//! - [`compression_gain_db`] / [`compression_gain`] - the static gain curve
//!   as pure functions
//! - [`SharedParams`] - lock-free parameter block for control-thread writes
//!   against audio-thread reads
//! - [`GainReductionMeter`] - single-value telemetry cell for UI meters
//!
//! ## Example
//!
//! ```rust
//! use stretta_core::Effect;
//! use stretta_dynamics::Compressor;
//!
//! let mut comp = Compressor::new(48000.0);
//! comp.set_threshold_db(-20.0);
//! comp.set_ratio(4.0);
//! comp.set_attack_ms(5.0);
//! comp.set_release_ms(120.0);
//!
//! let output = comp.process(0.5);
//! assert!(output.is_finite());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod compressor;
pub mod params;

// Re-export main types at crate root
pub use compressor::{Compressor, compression_gain, compression_gain_db};
pub use params::{CompressorParams, GainReductionMeter, SharedParams};
