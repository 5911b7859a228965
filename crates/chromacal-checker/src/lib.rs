//! # chromacal-checker
//!
//! Color checker calibration: reference chart data, perspective-corrected
//! patch sampling, and the scene illuminant solve.
//!
//! # Modules
//!
//! - [`chart`] - baked-in reference charts ([`COLORCHECKER_24`])
//! - [`homography`] - four-corner perspective correction
//! - [`extract`] - patch extraction, illuminant solve, delta E scoring
//!
//! # Workflow
//!
//! The user photographs a physical chart, drags four corner handles onto
//! it, and triggers an extraction. The solver samples every patch through
//! the corner homography, solves the scene illuminant from the middle grey
//! patch, and reports average CIE76 delta E before and after adaptation as
//! the calibration quality. The caller commits the solved illuminant (and
//! the suggested adaptation method) into the next pass's parameters.
//!
//! # Example
//!
//! ```rust
//! use chromacal_checker::{COLORCHECKER_24, Homography, Point, extract_color_checker};
//! use chromacal_color::{WorkingProfile, lms::AdaptationMethod};
//! use chromacal_core::ImageView;
//!
//! let photo = vec![0.3_f32; 120 * 80 * 4];
//! let view = ImageView::new(&photo, 120, 80).unwrap();
//!
//! // Corners as dragged by the user, here a perfectly framed chart
//! let ideal = [
//!     Point::new(0.0, 0.0),
//!     Point::new(120.0, 0.0),
//!     Point::new(120.0, 80.0),
//!     Point::new(0.0, 80.0),
//! ];
//! let homography = Homography::map_quad(&ideal, &ideal).unwrap();
//!
//! let report = extract_color_checker(
//!     &view,
//!     &WorkingProfile::identity(),
//!     &COLORCHECKER_24,
//!     &homography,
//!     AdaptationMethod::LinearBradford,
//! );
//! println!("delta E {} -> {}", report.delta_e_before, report.delta_e_after);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod chart;
pub mod extract;
pub mod homography;

pub use chart::{COLORCHECKER_24, ColorChecker, Patch};
pub use extract::{CalibrationReport, extract_color_checker};
pub use homography::{Homography, Point};
