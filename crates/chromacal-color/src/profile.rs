//! Working color profiles: the RGB <-> XYZ matrix pair of a pass.
//!
//! The pipeline receives its working profile from the caller (whatever
//! RGB space the surrounding application develops in) as a pair of 3x3
//! matrices, immutable for the duration of a pass. For callers (and
//! tests) that start from chromaticity coordinates instead of matrices,
//! [`WorkingProfile::from_primaries`] derives the pair the ICC way: solve
//! the primary scales against the native white, then Bradford-adapt the
//! white point to the D50 pipeline reference.

use chromacal_core::{Error, Result};
use chromacal_math::{Mat3, Vec3};

use crate::adapt::bradford_adaptation_matrix;
use crate::spaces::{Chromaticity, D50_XYZ};

/// An RGB <-> XYZ matrix pair, immutable for one transform pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkingProfile {
    /// Working RGB to XYZ (D50-referenced).
    pub rgb_to_xyz: Mat3,
    /// XYZ back to working RGB.
    pub xyz_to_rgb: Mat3,
}

impl WorkingProfile {
    /// Wraps a caller-supplied matrix pair as-is.
    ///
    /// No consistency check between the two matrices; the caller's color
    /// management owns that contract.
    #[inline]
    pub const fn from_matrices(rgb_to_xyz: Mat3, xyz_to_rgb: Mat3) -> Self {
        Self {
            rgb_to_xyz,
            xyz_to_rgb,
        }
    }

    /// Builds the pair from a forward matrix, inverting it.
    pub fn from_rgb_to_xyz(rgb_to_xyz: Mat3) -> Result<Self> {
        let xyz_to_rgb = rgb_to_xyz.inverse().ok_or(Error::SingularProfile)?;
        Ok(Self {
            rgb_to_xyz,
            xyz_to_rgb,
        })
    }

    /// Identity profile: the working space *is* XYZ.
    ///
    /// Useful for pipelines already operating on XYZ buffers and for
    /// exercising the engine in isolation.
    #[inline]
    pub const fn identity() -> Self {
        Self::from_matrices(Mat3::IDENTITY, Mat3::IDENTITY)
    }

    /// Derives a D50-adapted profile from primaries chromaticities.
    ///
    /// The native white point is solved against the primaries, then the
    /// forward matrix is Bradford-adapted so that working white lands on
    /// D50 (ICC convention).
    pub fn from_primaries(
        r: Chromaticity,
        g: Chromaticity,
        b: Chromaticity,
        white: Chromaticity,
    ) -> Result<Self> {
        let native = rgb_to_xyz_from_primaries(r, g, b, white)?;
        let adapted = bradford_adaptation_matrix(white.to_xyz(), D50_XYZ) * native;
        Self::from_rgb_to_xyz(adapted)
    }

    /// sRGB / Rec.709 primaries, white point adapted from D65 to D50.
    pub fn srgb() -> Self {
        Self::from_primaries(
            Chromaticity::new(0.64, 0.33),
            Chromaticity::new(0.30, 0.60),
            Chromaticity::new(0.15, 0.06),
            Chromaticity::new(0.3127, 0.3290),
        )
        .expect("sRGB primaries are non-degenerate")
    }

    /// Rec.2020 primaries, white point adapted from D65 to D50.
    pub fn rec2020() -> Self {
        Self::from_primaries(
            Chromaticity::new(0.708, 0.292),
            Chromaticity::new(0.170, 0.797),
            Chromaticity::new(0.131, 0.046),
            Chromaticity::new(0.3127, 0.3290),
        )
        .expect("Rec.2020 primaries are non-degenerate")
    }
}

/// RGB -> XYZ matrix for primaries in their native white point.
///
/// Standard construction: the unscaled primary columns are solved so that
/// RGB (1, 1, 1) maps exactly to the white tristimulus.
fn rgb_to_xyz_from_primaries(
    r: Chromaticity,
    g: Chromaticity,
    b: Chromaticity,
    white: Chromaticity,
) -> Result<Mat3> {
    let unscaled = Mat3::from_col_vecs(r.to_xyz(), g.to_xyz(), b.to_xyz());
    let inv = unscaled.inverse().ok_or(Error::SingularProfile)?;
    let scales = inv * white.to_xyz();
    Ok(Mat3::from_col_vecs(
        r.to_xyz() * scales.x,
        g.to_xyz() * scales.y,
        b.to_xyz() * scales.z,
    ))
}
