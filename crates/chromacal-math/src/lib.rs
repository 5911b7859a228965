//! # chromacal-math
//!
//! Math primitives for chromatic adaptation and channel mixing.
//!
//! This crate provides the fixed-size types the rest of the workspace is
//! built on:
//!
//! - [`Vec3`] - 3-component color triplets (RGB, XYZ, LMS)
//! - [`Mat3`] - 3x3 matrices for color space transforms
//! - Epsilon-guarded norm and luminance scaling helpers
//! - [`simd`] - lane-batched pixel-quad operations
//!
//! # Design
//!
//! All matrix operations assume **row-major** storage and **column vectors**:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! Division by luminance is everywhere guarded by [`NORM_MIN`] so the hot
//! loops stay branch-free on degenerate pixels (zero or NaN luminance)
//! instead of propagating errors.
//!
//! # Usage
//!
//! ```rust
//! use chromacal_math::{Mat3, Vec3};
//!
//! let rgb_to_xyz = Mat3::from_rows([
//!     [0.4124564, 0.3575761, 0.1804375],
//!     [0.2126729, 0.7151522, 0.0721750],
//!     [0.0193339, 0.1191920, 0.9503041],
//! ]);
//!
//! let xyz = rgb_to_xyz * Vec3::new(1.0, 0.5, 0.25);
//! let chroma = xyz.downscale(xyz.y);
//! ```
//!
//! # Dependencies
//!
//! - [`glam`] - SIMD-accelerated math interop
//! - [`wide`] - portable lane batching for the pixel loops

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod mat3;
mod vec3;
pub mod simd;

pub use mat3::*;
pub use vec3::*;

/// Smallest luminance / norm the pipelines divide by.
///
/// Values at or below this are treated as degenerate and replaced, which
/// keeps every division in the per-pixel paths finite without branching
/// into error handling.
pub const NORM_MIN: f32 = 1e-6;
