//! Chromaticity compression toward the D50 white point.
//!
//! Runs twice per pixel (before and after the user mix), which makes it the
//! most failure-sensitive routine in the pipeline. Three xyY singularities
//! are guarded here: zero luminance (floored sum), `x + y >= 1` (which
//! would derive a negative Z), and chroma overshooting past the white point
//! (which would flip to the opposite hue).

use chromacal_math::{NORM_MIN, Vec3};

use crate::spaces::{D50_UV, uvy_to_xyy, xyy_to_uvy, xyy_to_xyz};

/// Compresses chromaticity toward D50 in the u'v' plane.
///
/// The squared u'v' distance from D50, weighted by luminance, is raised to
/// `compression` and used as the step length toward the white point.
/// `compression == 0` disables the move entirely; `clip` floors the
/// resulting x, y at zero. Clamping at D50 per axis guarantees the
/// correction never crosses to the opposite side of the white point.
///
/// # Example
///
/// ```rust
/// use chromacal_math::Vec3;
/// use chromacal_color::gamut::gamut_map;
///
/// let xyz = Vec3::new(0.5, 0.4, 0.2);
/// // Zero compression leaves chromaticity untouched
/// let same = gamut_map(xyz, 0.0, false);
/// assert!((same.x - xyz.x).abs() < 1e-5);
/// ```
pub fn gamut_map(xyz: Vec3, compression: f32, clip: bool) -> Vec3 {
    let sum = xyz.sum().max(NORM_MIN);
    let luma = xyz.y.max(0.0);

    let xyy = Vec3::new(xyz.x / sum, xyz.y / sum, luma);
    let mut uvy = xyy_to_uvy(xyy);

    // Distance to the white point, weighted so dark pixels barely move
    let delta = [D50_UV.0 - uvy.x, D50_UV.1 - uvy.y];
    let dist = luma * (delta[0] * delta[0] + delta[1] * delta[1]);

    let correction = if compression == 0.0 {
        0.0
    } else {
        dist.powf(compression)
    };

    // Step toward D50, clamped at D50 per axis so the chroma vector can
    // shrink to zero but never flip sign
    for c in 0..2 {
        let moved = correction * delta[c] + uvy[c];
        uvy[c] = if uvy[c] > [D50_UV.0, D50_UV.1][c] {
            moved.max([D50_UV.0, D50_UV.1][c])
        } else {
            moved.min([D50_UV.0, D50_UV.1][c])
        };
    }

    let mut xyy = uvy_to_xyy(uvy);

    if clip {
        xyy.x = xyy.x.max(0.0);
        xyy.y = xyy.y.max(0.0);
    }

    // y is divided by on the way back to XYZ
    xyy.y = xyy.y.max(NORM_MIN);

    // Z = Y (1 - x - y) / y goes negative once x + y reaches 1
    let scale = xyy.x + xyy.y;
    if scale >= 1.0 {
        xyy.x /= scale;
        xyy.y /= scale;
    }

    xyy_to_xyz(xyy)
}
