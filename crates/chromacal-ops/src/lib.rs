//! # chromacal-ops
//!
//! The pixel-processing engine: the per-pixel chromatic adaptation /
//! channel mixing pass and the automatic illuminant estimators.
//!
//! # Modules
//!
//! - [`params`] - user parameters and their frozen per-pass form
//! - [`mix`] - the per-pixel transform pass
//! - [`wb`] - grey-edge / grey-surface illuminant estimation
//!
//! # Example
//!
//! ```rust
//! use chromacal_core::{EstimateCell, ImageView, ImageViewMut};
//! use chromacal_color::{Illuminant, WorkingProfile};
//! use chromacal_ops::{EstimatorMethod, MixerParams, estimate_illuminant, transform};
//!
//! let frame = vec![0.4_f32; 64 * 64 * 4];
//! let input = ImageView::new(&frame, 64, 64).unwrap();
//! let profile = WorkingProfile::identity();
//!
//! // An estimator event publishes a snapshot ...
//! let estimates = EstimateCell::new();
//! estimates.publish(estimate_illuminant(&input, &profile, EstimatorMethod::GreyEdge));
//!
//! // ... and the next pass commits it into its parameters
//! let mut params = MixerParams::default();
//! if let Some(xy) = estimates.take() {
//!     params.illuminant = Illuminant::Custom(*xy);
//! }
//! let pass = params.commit();
//!
//! let mut out = vec![0.0_f32; 64 * 64 * 4];
//! let mut output = ImageViewMut::new(&mut out, 64, 64).unwrap();
//! transform(&input, &mut output, &profile, &pass).unwrap();
//! ```
//!
//! # Concurrency
//!
//! Pixels are independent; rows are processed with rayon when the default
//! `parallel` feature is on. Estimator results cross to the next pass as
//! immutable snapshots through [`chromacal_core::EstimateCell`]; no lock
//! is ever held across an image loop.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod mix;
pub mod params;
pub mod wb;

pub use error::{OpsError, OpsResult};
pub use mix::transform;
pub use params::{MixerParams, PassParams};
pub use wb::{EstimatorMethod, estimate_illuminant};
