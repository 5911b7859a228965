//! # chromacal-color
//!
//! Color science for the chromacal pipeline: space converters, cone-space
//! chromatic adaptation, gamut compression, and illuminant models.
//!
//! This crate holds every closed-form formula the engine needs:
//!
//! - [`spaces`] - XYZ/xyY/u'v'Y/Lch/Lab converters and the CIE76 delta E
//! - [`lms`] - cone spaces and the [`AdaptationMethod`] selector
//! - [`adapt`] - the adaptation kernels and the [`Adaptation`] strategy
//!   trait the hot loop monomorphizes over
//! - [`gamut`] - chromaticity compression toward D50
//! - [`illuminant`] - standard illuminant tables, daylight/blackbody
//!   models, CCT estimation
//! - [`profile`] - working RGB <-> XYZ matrix pairs
//!
//! # Design
//!
//! The whole pipeline normalizes toward a fixed D50 reference; every
//! kernel, table, and constant here is expressed against it. Functions are
//! pure and total: numeric degeneracy (zero luminance, singular
//! chromaticities) is epsilon-guarded rather than surfaced as errors, so
//! the per-pixel paths built on top stay branch-free.
//!
//! # Usage
//!
//! ```rust
//! use chromacal_color::prelude::*;
//! use chromacal_math::Vec3;
//!
//! // Where does a warm tungsten source sit?
//! let xy = Illuminant::A.chromaticity();
//! let cone = xyz_to_cone(xy.to_xyz(), AdaptationMethod::LinearBradford);
//!
//! // Adapt a pixel lit by it toward D50
//! let pixel = Vec3::new(0.8, 0.7, 0.5);
//! let adapted = adapt_to_d50(
//!     xyz_to_cone(pixel, AdaptationMethod::LinearBradford),
//!     cone,
//!     1.0,
//!     AdaptationMethod::LinearBradford,
//! );
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod adapt;
pub mod gamut;
pub mod illuminant;
pub mod lms;
pub mod profile;
pub mod spaces;

pub use adapt::{Adaptation, adapt_to_d50, bradford_p};
pub use gamut::gamut_map;
pub use illuminant::{DaylightCheck, Fluorescent, Illuminant, LedSource, check_close_to_daylight};
pub use lms::{AdaptationMethod, cone_to_xyz, d50_cone, xyz_to_cone};
pub use profile::WorkingProfile;
pub use spaces::{Chromaticity, D50, D50_UV, D50_XYZ};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use chromacal_color::prelude::*;
/// ```
pub mod prelude {
    pub use crate::adapt::{
        Adaptation, Cat16Kernel, FullBradfordKernel, LinearBradfordKernel, RgbBypass,
        XyzScalingKernel, adapt_to_d50, bradford_p,
    };
    pub use crate::gamut::gamut_map;
    pub use crate::illuminant::{Illuminant, check_close_to_daylight};
    pub use crate::lms::{AdaptationMethod, cone_to_xyz, d50_cone, xyz_to_cone};
    pub use crate::profile::WorkingProfile;
    pub use crate::spaces::{
        Chromaticity, D50, D50_XYZ, delta_e_76, lab_to_xyz, xyy_to_xyz, xyz_to_lab, xyz_to_xyy,
    };
}
