//! Cone-response (LMS) spaces per adaptation method.
//!
//! Chromatic adaptation is a per-channel operation only in the right cone
//! space, and each adaptation method defines its own: Bradford's sharpened
//! cones, CAT16's, or no cone space at all for XYZ scaling and the bypass
//! method. The method therefore selects *both* the conversion basis
//! and the adaptation kernel; one method governs an entire image pass.

use chromacal_math::{Mat3, Vec3};

use crate::spaces::D50_XYZ;

/// Which chromatic adaptation transform a pass uses.
///
/// Selected once per pass: the per-pixel loop is specialized over the
/// method, it never branches per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AdaptationMethod {
    /// Linear Bradford: per-channel ratio scaling in Bradford cones.
    /// Most accurate for daylight-ish illuminants.
    #[default]
    LinearBradford,
    /// Nonlinear (von Kries) Bradford: the S-cone ratio is raised to the
    /// blue compensation exponent.
    FullBradford,
    /// CAT16 ratio scaling. More robust than Bradford far from daylight.
    Cat16,
    /// Direct ratio scaling in XYZ, no cone space.
    XyzScaling,
    /// No adaptation at all; the mix still runs in XYZ.
    Rgb,
}

impl AdaptationMethod {
    /// True when the white-balance stage is skipped entirely.
    #[inline]
    pub fn bypasses_adaptation(self) -> bool {
        matches!(self, Self::Rgb)
    }
}

/// XYZ to Bradford sharpened cone space.
///
/// Lam (1985), the matrix behind ICC-style white point adaptation.
pub const XYZ_TO_BRADFORD_LMS: Mat3 = Mat3::from_rows([
    [0.8951, 0.2664, -0.1614],
    [-0.7502, 1.7135, 0.0367],
    [0.0389, -0.0685, 1.0296],
]);

/// Bradford cone space back to XYZ.
pub const BRADFORD_LMS_TO_XYZ: Mat3 = Mat3::from_rows([
    [0.9869929, -0.1470543, 0.1599627],
    [0.4323053, 0.5183603, 0.0492912],
    [-0.0085287, 0.0400428, 0.9684867],
]);

/// XYZ to CAT16 cone space (Li et al. 2017, from CAM16).
pub const XYZ_TO_CAT16_LMS: Mat3 = Mat3::from_rows([
    [0.401288, 0.650173, -0.051461],
    [-0.250268, 1.204414, 0.045854],
    [-0.002079, 0.048952, 0.953127],
]);

/// CAT16 cone space back to XYZ.
pub const CAT16_LMS_TO_XYZ: Mat3 = Mat3::from_rows([
    [1.862_067_9, -1.011_254_6, 0.149_186_78],
    [0.387_526_54, 0.621_447_44, -0.008_973_98],
    [-0.015_841_5, -0.034_122_94, 1.049_964_4],
]);

/// D50 white point in Bradford cones.
pub const D50_BRADFORD_LMS: Vec3 = Vec3::new(0.996078, 1.020646, 0.818155);

/// D50 white point in CAT16 cones.
pub const D50_CAT16_LMS: Vec3 = Vec3::new(0.994535, 1.000997, 0.833036);

/// Converts XYZ to the cone space of the given method.
///
/// `XyzScaling` and `Rgb` have no cone space; the value passes through.
#[inline]
pub fn xyz_to_cone(xyz: Vec3, method: AdaptationMethod) -> Vec3 {
    match method {
        AdaptationMethod::LinearBradford | AdaptationMethod::FullBradford => {
            XYZ_TO_BRADFORD_LMS * xyz
        }
        AdaptationMethod::Cat16 => XYZ_TO_CAT16_LMS * xyz,
        AdaptationMethod::XyzScaling | AdaptationMethod::Rgb => xyz,
    }
}

/// Converts a cone-space value of the given method back to XYZ.
#[inline]
pub fn cone_to_xyz(cone: Vec3, method: AdaptationMethod) -> Vec3 {
    match method {
        AdaptationMethod::LinearBradford | AdaptationMethod::FullBradford => {
            BRADFORD_LMS_TO_XYZ * cone
        }
        AdaptationMethod::Cat16 => CAT16_LMS_TO_XYZ * cone,
        AdaptationMethod::XyzScaling | AdaptationMethod::Rgb => cone,
    }
}

/// The D50 white point expressed in the method's cone space.
#[inline]
pub fn d50_cone(method: AdaptationMethod) -> Vec3 {
    match method {
        AdaptationMethod::LinearBradford | AdaptationMethod::FullBradford => D50_BRADFORD_LMS,
        AdaptationMethod::Cat16 => D50_CAT16_LMS,
        AdaptationMethod::XyzScaling | AdaptationMethod::Rgb => D50_XYZ,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const METHODS: [AdaptationMethod; 5] = [
        AdaptationMethod::LinearBradford,
        AdaptationMethod::FullBradford,
        AdaptationMethod::Cat16,
        AdaptationMethod::XyzScaling,
        AdaptationMethod::Rgb,
    ];

    #[test]
    fn test_cone_roundtrip_all_methods() {
        let xyz = Vec3::new(0.5, 0.8, 0.3);
        for method in METHODS {
            let back = cone_to_xyz(xyz_to_cone(xyz, method), method);
            assert_relative_eq!(back.x, xyz.x, max_relative = 1e-5);
            assert_relative_eq!(back.y, xyz.y, max_relative = 1e-5);
            assert_relative_eq!(back.z, xyz.z, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_bradford_matrices_are_inverses() {
        let product = XYZ_TO_BRADFORD_LMS * BRADFORD_LMS_TO_XYZ;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product.m[i][j] - expected).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_cat16_matrices_are_inverses() {
        let product = XYZ_TO_CAT16_LMS * CAT16_LMS_TO_XYZ;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product.m[i][j] - expected).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_d50_cone_constants() {
        // The stored D50 cone whites must match converting D50 XYZ directly
        let bradford = XYZ_TO_BRADFORD_LMS * D50_XYZ;
        assert_relative_eq!(bradford.x, D50_BRADFORD_LMS.x, epsilon = 1e-3);
        assert_relative_eq!(bradford.y, D50_BRADFORD_LMS.y, epsilon = 1e-3);
        assert_relative_eq!(bradford.z, D50_BRADFORD_LMS.z, epsilon = 1e-3);

        let cat16 = XYZ_TO_CAT16_LMS * D50_XYZ;
        assert_relative_eq!(cat16.x, D50_CAT16_LMS.x, epsilon = 1e-3);
        assert_relative_eq!(cat16.y, D50_CAT16_LMS.y, epsilon = 1e-3);
        assert_relative_eq!(cat16.z, D50_CAT16_LMS.z, epsilon = 1e-3);
    }
}
