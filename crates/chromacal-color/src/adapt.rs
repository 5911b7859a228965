//! Chromatic adaptation kernels.
//!
//! Every kernel maps a cone-space (or XYZ) value lit by a source illuminant
//! toward the pipeline's fixed D50 reference. The kernels never fail:
//! out-of-gamut results are legal intermediate values that the gamut mapper
//! corrects downstream, and luminance has already been normalized away by
//! the caller.
//!
//! Two call styles exist on purpose. The [`Adaptation`] strategy types are
//! what the per-pixel loop monomorphizes over, so the method dispatch
//! happens once per pass and the kernels inline into the loop body. The
//! `*_any` free functions dispatch at runtime and serve the occasional
//! paths: parameter commit, the illuminant solver, tests.
//!
//! # Usage
//!
//! ```rust
//! use chromacal_color::adapt::{adapt_to_d50, bradford_p};
//! use chromacal_color::lms::{AdaptationMethod, d50_cone};
//!
//! let method = AdaptationMethod::LinearBradford;
//! let illuminant = d50_cone(method);
//! let p = bradford_p(illuminant);
//!
//! // Adapting from D50 to D50 is the identity
//! let cone = d50_cone(method);
//! let adapted = adapt_to_d50(cone, illuminant, p, method);
//! assert!((adapted.x - cone.x).abs() < 1e-5);
//! ```

use chromacal_math::Vec3;

use crate::lms::{
    AdaptationMethod, BRADFORD_LMS_TO_XYZ, CAT16_LMS_TO_XYZ, D50_BRADFORD_LMS, D50_CAT16_LMS,
    XYZ_TO_BRADFORD_LMS, XYZ_TO_CAT16_LMS,
};
use crate::spaces::D50_XYZ;

/// Blue-channel compensation exponent for the full Bradford transform.
///
/// `(D50_S / illuminant_S)^0.0834`, computed once per parameter commit,
/// never in the pixel loop.
#[inline]
pub fn bradford_p(illuminant_lms: Vec3) -> f32 {
    (D50_BRADFORD_LMS.z / illuminant_lms.z).powf(0.0834)
}

/// Bradford adaptation toward D50 in Bradford cone space.
///
/// Linear form is a per-channel ratio scale. The full (von Kries nonlinear)
/// form additionally raises the S-cone ratio to `p`, preserving its sign so
/// out-of-gamut negatives survive instead of turning into NaN.
#[inline]
pub fn bradford_adapt_d50(lms: Vec3, illuminant: Vec3, p: f32, full: bool) -> Vec3 {
    if full {
        let ratio = lms.z / illuminant.z;
        Vec3::new(
            D50_BRADFORD_LMS.x / illuminant.x * lms.x,
            D50_BRADFORD_LMS.y / illuminant.y * lms.y,
            D50_BRADFORD_LMS.z * ratio.abs().powf(p) * ratio.signum(),
        )
    } else {
        (D50_BRADFORD_LMS / illuminant) * lms
    }
}

/// CAT16 adaptation toward D50 in CAT16 cone space.
///
/// `full` forces complete adaptation (the pipeline default); otherwise `d`
/// is the degree of adaptation and the scale blends toward identity.
#[inline]
pub fn cat16_adapt_d50(lms: Vec3, illuminant: Vec3, d: f32, full: bool) -> Vec3 {
    if full {
        (D50_CAT16_LMS / illuminant) * lms
    } else {
        let scale = (D50_CAT16_LMS / illuminant) * d + Vec3::splat(1.0 - d);
        scale * lms
    }
}

/// Direct ratio scaling toward D50 in XYZ, no cone space.
#[inline]
pub fn xyz_adapt_d50(xyz: Vec3, illuminant: Vec3) -> Vec3 {
    (D50_XYZ / illuminant) * xyz
}

/// Runtime-dispatched adaptation toward D50 in the method's cone space.
///
/// `Rgb` passes through untouched. The hot loop does not use this; it is
/// for the illuminant solver and parameter plumbing.
#[inline]
pub fn adapt_to_d50(cone: Vec3, illuminant: Vec3, p: f32, method: AdaptationMethod) -> Vec3 {
    match method {
        AdaptationMethod::LinearBradford => bradford_adapt_d50(cone, illuminant, p, false),
        AdaptationMethod::FullBradford => bradford_adapt_d50(cone, illuminant, p, true),
        AdaptationMethod::Cat16 => cat16_adapt_d50(cone, illuminant, 1.0, true),
        AdaptationMethod::XyzScaling => xyz_adapt_d50(cone, illuminant),
        AdaptationMethod::Rgb => cone,
    }
}

/// Builds a 3x3 Bradford adaptation matrix between two white points.
///
/// `M^-1 * diag(dst_cone / src_cone) * M`, the ICC-style matrix form,
/// used when baking a working profile whose native white point is not D50.
pub fn bradford_adaptation_matrix(src_white: Vec3, dst_white: Vec3) -> chromacal_math::Mat3 {
    let src_cone = XYZ_TO_BRADFORD_LMS * src_white;
    let dst_cone = XYZ_TO_BRADFORD_LMS * dst_white;

    let scale = chromacal_math::Mat3::diagonal(
        dst_cone.x / src_cone.x,
        dst_cone.y / src_cone.y,
        dst_cone.z / src_cone.z,
    );

    BRADFORD_LMS_TO_XYZ * scale * XYZ_TO_BRADFORD_LMS
}

/// Compile-time adaptation strategy for the per-pixel loop.
///
/// Implementors are zero-sized; the transform pass monomorphizes its loop
/// body over one of them so the cone conversions and the kernel inline with
/// no per-pixel branching.
pub trait Adaptation: Copy + Send + Sync + 'static {
    /// The runtime method this strategy implements.
    const METHOD: AdaptationMethod;

    /// True when the white-balance stage is skipped (the `Rgb` bypass).
    const BYPASS: bool = false;

    /// XYZ into this method's cone space.
    fn xyz_to_cone(xyz: Vec3) -> Vec3;

    /// This method's cone space back to XYZ.
    fn cone_to_xyz(cone: Vec3) -> Vec3;

    /// Adapts a cone-space value from `illuminant` toward D50.
    fn adapt(cone: Vec3, illuminant: Vec3, p: f32) -> Vec3;
}

/// Linear Bradford strategy.
#[derive(Clone, Copy)]
pub struct LinearBradfordKernel;

impl Adaptation for LinearBradfordKernel {
    const METHOD: AdaptationMethod = AdaptationMethod::LinearBradford;

    #[inline]
    fn xyz_to_cone(xyz: Vec3) -> Vec3 {
        XYZ_TO_BRADFORD_LMS * xyz
    }

    #[inline]
    fn cone_to_xyz(cone: Vec3) -> Vec3 {
        BRADFORD_LMS_TO_XYZ * cone
    }

    #[inline]
    fn adapt(cone: Vec3, illuminant: Vec3, p: f32) -> Vec3 {
        bradford_adapt_d50(cone, illuminant, p, false)
    }
}

/// Full (nonlinear von Kries) Bradford strategy.
#[derive(Clone, Copy)]
pub struct FullBradfordKernel;

impl Adaptation for FullBradfordKernel {
    const METHOD: AdaptationMethod = AdaptationMethod::FullBradford;

    #[inline]
    fn xyz_to_cone(xyz: Vec3) -> Vec3 {
        XYZ_TO_BRADFORD_LMS * xyz
    }

    #[inline]
    fn cone_to_xyz(cone: Vec3) -> Vec3 {
        BRADFORD_LMS_TO_XYZ * cone
    }

    #[inline]
    fn adapt(cone: Vec3, illuminant: Vec3, p: f32) -> Vec3 {
        bradford_adapt_d50(cone, illuminant, p, true)
    }
}

/// CAT16 strategy, forced to full adaptation.
#[derive(Clone, Copy)]
pub struct Cat16Kernel;

impl Adaptation for Cat16Kernel {
    const METHOD: AdaptationMethod = AdaptationMethod::Cat16;

    #[inline]
    fn xyz_to_cone(xyz: Vec3) -> Vec3 {
        XYZ_TO_CAT16_LMS * xyz
    }

    #[inline]
    fn cone_to_xyz(cone: Vec3) -> Vec3 {
        CAT16_LMS_TO_XYZ * cone
    }

    #[inline]
    fn adapt(cone: Vec3, illuminant: Vec3, _p: f32) -> Vec3 {
        cat16_adapt_d50(cone, illuminant, 1.0, true)
    }
}

/// XYZ scaling strategy: adaptation without a cone space.
#[derive(Clone, Copy)]
pub struct XyzScalingKernel;

impl Adaptation for XyzScalingKernel {
    const METHOD: AdaptationMethod = AdaptationMethod::XyzScaling;

    #[inline]
    fn xyz_to_cone(xyz: Vec3) -> Vec3 {
        xyz
    }

    #[inline]
    fn cone_to_xyz(cone: Vec3) -> Vec3 {
        cone
    }

    #[inline]
    fn adapt(cone: Vec3, illuminant: Vec3, _p: f32) -> Vec3 {
        xyz_adapt_d50(cone, illuminant)
    }
}

/// Bypass strategy: no white balance, the mix runs directly on XYZ.
#[derive(Clone, Copy)]
pub struct RgbBypass;

impl Adaptation for RgbBypass {
    const METHOD: AdaptationMethod = AdaptationMethod::Rgb;
    const BYPASS: bool = true;

    #[inline]
    fn xyz_to_cone(xyz: Vec3) -> Vec3 {
        xyz
    }

    #[inline]
    fn cone_to_xyz(cone: Vec3) -> Vec3 {
        cone
    }

    #[inline]
    fn adapt(cone: Vec3, _illuminant: Vec3, _p: f32) -> Vec3 {
        cone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lms::d50_cone;
    use approx::assert_relative_eq;

    const METHODS: [AdaptationMethod; 4] = [
        AdaptationMethod::LinearBradford,
        AdaptationMethod::FullBradford,
        AdaptationMethod::Cat16,
        AdaptationMethod::XyzScaling,
    ];

    #[test]
    fn test_d50_illuminant_is_identity() {
        // Adapting from D50 to D50 must be a no-op for every method
        let cone = Vec3::new(0.4, 0.9, 0.3);
        for method in METHODS {
            let illuminant = d50_cone(method);
            let p = bradford_p(illuminant);
            let adapted = adapt_to_d50(cone, illuminant, p, method);
            assert_relative_eq!(adapted.x, cone.x, max_relative = 1e-5);
            assert_relative_eq!(adapted.y, cone.y, max_relative = 1e-5);
            assert_relative_eq!(adapted.z, cone.z, max_relative = 1e-5);
        }
    }

    #[test]
    fn test_bradford_full_preserves_sign() {
        let illuminant = D50_BRADFORD_LMS;
        let lms = Vec3::new(0.2, 0.3, -0.1);
        let adapted = bradford_adapt_d50(lms, illuminant, 1.2, true);
        assert!(adapted.z < 0.0);
        assert!(adapted.is_finite());
    }

    #[test]
    fn test_linear_bradford_scales_white() {
        // A pixel at the source illuminant lands on D50
        let illuminant = Vec3::new(1.1, 0.98, 0.6);
        let adapted = bradford_adapt_d50(illuminant, illuminant, 1.0, false);
        assert_relative_eq!(adapted.x, D50_BRADFORD_LMS.x, epsilon = 1e-5);
        assert_relative_eq!(adapted.y, D50_BRADFORD_LMS.y, epsilon = 1e-5);
        assert_relative_eq!(adapted.z, D50_BRADFORD_LMS.z, epsilon = 1e-5);
    }

    #[test]
    fn test_cat16_partial_adaptation_blend() {
        let illuminant = Vec3::new(1.1, 0.98, 0.6);
        // d = 0 means no adaptation at all
        let lms = Vec3::new(0.5, 0.5, 0.5);
        let unadapted = cat16_adapt_d50(lms, illuminant, 0.0, false);
        assert_relative_eq!(unadapted.x, lms.x, epsilon = 1e-6);
        // d = 1 matches the full kernel
        let blended = cat16_adapt_d50(lms, illuminant, 1.0, false);
        let full = cat16_adapt_d50(lms, illuminant, 1.0, true);
        assert_relative_eq!(blended.x, full.x, epsilon = 1e-6);
    }

    #[test]
    fn test_strategy_types_match_runtime_dispatch() {
        let xyz = Vec3::new(0.3, 0.5, 0.2);
        let illuminant = Vec3::new(1.05, 1.0, 0.7);

        let via_trait = LinearBradfordKernel::adapt(
            LinearBradfordKernel::xyz_to_cone(xyz),
            illuminant,
            1.0,
        );
        let via_enum = adapt_to_d50(
            xyz_to_cone_for_test(xyz),
            illuminant,
            1.0,
            AdaptationMethod::LinearBradford,
        );
        assert_relative_eq!(via_trait.x, via_enum.x, epsilon = 1e-6);
        assert_relative_eq!(via_trait.y, via_enum.y, epsilon = 1e-6);
        assert_relative_eq!(via_trait.z, via_enum.z, epsilon = 1e-6);
    }

    fn xyz_to_cone_for_test(xyz: Vec3) -> Vec3 {
        crate::lms::xyz_to_cone(xyz, AdaptationMethod::LinearBradford)
    }

    #[test]
    fn test_bradford_p_at_d50_is_one() {
        assert_relative_eq!(bradford_p(D50_BRADFORD_LMS), 1.0, epsilon = 1e-6);
    }
}
