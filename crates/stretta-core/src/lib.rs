//! Stretta Core - DSP primitives for dynamics processing
//!
//! This crate provides the building blocks the stretta compressor is made of,
//! designed for real-time audio processing with zero allocation in the audio
//! path.
//!
//! # Core Abstractions
//!
//! ## Effect System
//!
//! - [`Effect`] - Object-safe trait for audio processors
//!
//! ## Level Detection
//!
//! - [`EnvelopeDetector`] - Attack/release envelope estimation with
//!   peak, mean-square and RMS detection and digital or analogue
//!   time-constant curves
//!
//! ## Parameter Introspection
//!
//! - [`ParameterInfo`] / [`ParamDescriptor`] - Runtime-discoverable parameter
//!   metadata for control surfaces
//!
//! ## Utilities
//!
//! - Level conversions: [`db_to_linear`], [`linear_to_db`]
//! - Hot-path approximations: [`fast_db_to_linear`], [`fast_linear_to_db`]
//! - [`lagrange_interpolate`] for polynomial curve fitting
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! stretta-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Configuration clamped at the boundary**: invalid times, rates and
//!   levels are made safe before they reach per-sample code

#![cfg_attr(not(feature = "std"), no_std)]

pub mod detector;
pub mod effect;
pub mod fast_math;
pub mod math;
pub mod param_info;

// Re-export main types at crate root
pub use detector::{DetectorMode, EnvelopeDetector, NOISE_FLOOR_DB, TimeConstant};
pub use effect::Effect;
pub use fast_math::{fast_db_to_linear, fast_exp2, fast_linear_to_db, fast_log2};
pub use math::{db_to_linear, flush_denormal, lagrange_interpolate, linear_to_db};
pub use param_info::{ParamDescriptor, ParamUnit, ParameterInfo};
