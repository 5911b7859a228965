//! # chromacal-core
//!
//! Core types for the chromacal color pipeline.
//!
//! This crate is the foundation the other chromacal crates build on:
//!
//! - [`ImageView`] / [`ImageViewMut`] - borrowed RGBA f32 buffer views
//! - [`Error`] / [`Result`] - the caller-contract error boundary
//! - [`EstimateCell`] - snapshot publishing between estimators and passes
//!
//! ## Design Philosophy
//!
//! Image memory always belongs to the caller. The pipeline borrows an input
//! view and an exclusive output view for exactly one pass; shape is checked
//! once at the boundary and never again inside the hot loops. Estimator
//! results travel as immutable snapshots rather than shared mutable state.
//!
//! ## Crate Structure
//!
//! ```text
//! chromacal-core (this crate)
//!    ^
//!    |
//!    +-- chromacal-color (spaces, adaptation, illuminants)
//!    +-- chromacal-ops (transform pass, auto white balance)
//!    +-- chromacal-checker (chart calibration)
//! ```
//!
//! Serialization of user-facing parameters lives downstream in
//! `chromacal-ops` behind its `serde` feature; nothing here persists.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod snapshot;

pub use error::{Error, Result};
pub use image::{CHANNELS, ImageView, ImageViewMut};
pub use snapshot::EstimateCell;
