//! Closed-form color space converters.
//!
//! Everything in this module is a pure function of its input: XYZ <-> xyY,
//! xyY <-> u'v'Y (CIE 1976), xyY <-> Lch about the D50 white point, and
//! XYZ <-> Lab under the D50 reference. The gamut mapper and the calibration
//! solver are built entirely out of these.
//!
//! Divisions are guarded with [`NORM_MIN`] floors where a singular input
//! (zero luminance, x + y at 1) would otherwise blow up; the guards replace
//! error paths, they do not change well-formed values.

use chromacal_math::{NORM_MIN, Vec3};

/// A CIE 1931 (x, y) chromaticity coordinate.
///
/// Illuminants are carried around in this form (Y is 1 by definition for a
/// light source).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chromaticity {
    /// x chromaticity
    pub x: f32,
    /// y chromaticity
    pub y: f32,
}

impl Chromaticity {
    /// Creates a chromaticity coordinate.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Converts to an XYZ tristimulus with Y = 1.
    #[inline]
    pub fn to_xyz(self) -> Vec3 {
        let y = self.y.max(NORM_MIN);
        Vec3::new(self.x / y, 1.0, (1.0 - self.x - self.y) / y)
    }

    /// Distance to another chromaticity in CIE 1960 uv.
    ///
    /// The CCT literature judges "close to the locus" in 1960 uv, so the
    /// daylight proximity check uses this metric.
    #[inline]
    pub fn uv_distance(self, other: Self) -> f32 {
        let a = xy_to_uv_1960(self);
        let b = xy_to_uv_1960(other);
        (a.0 - b.0).hypot(a.1 - b.1)
    }
}

/// D50 white point chromaticity, the fixed adaptation target.
pub const D50: Chromaticity = Chromaticity::new(0.34567, 0.35850);

/// D50 white point as XYZ tristimulus (Y = 1).
pub const D50_XYZ: Vec3 = Vec3::new(0.964_212, 1.0, 0.825_188_3);

/// D50 white point in CIE 1976 u'v'.
pub const D50_UV: (f32, f32) = (0.209_159_14, 0.488_075_32);

/// Converts XYZ to xyY.
///
/// The chromaticity denominator is floored at [`NORM_MIN`] so black pixels
/// produce a finite (if meaningless) chromaticity instead of NaN.
#[inline]
pub fn xyz_to_xyy(xyz: Vec3) -> Vec3 {
    let sum = xyz.sum().max(NORM_MIN);
    Vec3::new(xyz.x / sum, xyz.y / sum, xyz.y)
}

/// Converts xyY to XYZ.
#[inline]
pub fn xyy_to_xyz(xyy: Vec3) -> Vec3 {
    let y = xyy.y.max(NORM_MIN);
    Vec3::new(
        xyy.z * xyy.x / y,
        xyy.z,
        xyy.z * (1.0 - xyy.x - xyy.y) / y,
    )
}

/// Converts xyY to u'v'Y (CIE 1976 uniform chromaticity scale).
#[inline]
pub fn xyy_to_uvy(xyy: Vec3) -> Vec3 {
    let denom = (-2.0 * xyy.x + 12.0 * xyy.y + 3.0).max(NORM_MIN);
    Vec3::new(4.0 * xyy.x / denom, 9.0 * xyy.y / denom, xyy.z)
}

/// Converts u'v'Y back to xyY.
#[inline]
pub fn uvy_to_xyy(uvy: Vec3) -> Vec3 {
    let denom = (6.0 * uvy.x - 16.0 * uvy.y + 12.0).max(NORM_MIN);
    Vec3::new(9.0 * uvy.x / denom, 4.0 * uvy.y / denom, uvy.z)
}

/// CIE 1960 uv for a chromaticity (used only by the CCT proximity metric).
#[inline]
fn xy_to_uv_1960(xy: Chromaticity) -> (f32, f32) {
    let denom = (-2.0 * xy.x + 12.0 * xy.y + 3.0).max(NORM_MIN);
    (4.0 * xy.x / denom, 6.0 * xy.y / denom)
}

/// Converts xyY to a lightness/chroma/hue triple about the D50 white point.
///
/// Chroma and hue are measured in the u'v' plane relative to [`D50_UV`];
/// lightness is the Y component untouched. The calibration report uses this
/// to describe a recovered illuminant perceptually.
#[inline]
pub fn xyy_to_lch(xyy: Vec3) -> Vec3 {
    let uvy = xyy_to_uvy(xyy);
    let du = uvy.x - D50_UV.0;
    let dv = uvy.y - D50_UV.1;
    Vec3::new(uvy.z, du.hypot(dv), dv.atan2(du))
}

/// Converts a D50-relative lightness/chroma/hue triple back to xyY.
#[inline]
pub fn lch_to_xyy(lch: Vec3) -> Vec3 {
    let u = D50_UV.0 + lch.y * lch.z.cos();
    let v = D50_UV.1 + lch.y * lch.z.sin();
    uvy_to_xyy(Vec3::new(u, v, lch.x))
}

// CIE Lab under the D50 reference white, the space the chart reference
// values and the delta E metric live in.

const LAB_WHITE: Vec3 = Vec3::new(0.9642, 1.0, 0.8249);
const LAB_EPSILON: f32 = 216.0 / 24389.0;
const LAB_KAPPA: f32 = 24389.0 / 27.0;

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        (LAB_KAPPA * t + 16.0) / 116.0
    }
}

#[inline]
fn lab_f_inv(t: f32) -> f32 {
    let t3 = t * t * t;
    if t3 > LAB_EPSILON {
        t3
    } else {
        (116.0 * t - 16.0) / LAB_KAPPA
    }
}

/// Converts XYZ to CIE Lab (D50 reference white).
#[inline]
pub fn xyz_to_lab(xyz: Vec3) -> Vec3 {
    let fx = lab_f(xyz.x / LAB_WHITE.x);
    let fy = lab_f(xyz.y / LAB_WHITE.y);
    let fz = lab_f(xyz.z / LAB_WHITE.z);
    Vec3::new(116.0 * fy - 16.0, 500.0 * (fx - fy), 200.0 * (fy - fz))
}

/// Converts CIE Lab (D50 reference white) to XYZ.
#[inline]
pub fn lab_to_xyz(lab: Vec3) -> Vec3 {
    let fy = (lab.x + 16.0) / 116.0;
    let fx = fy + lab.y / 500.0;
    let fz = fy - lab.z / 200.0;

    let yr = if lab.x > LAB_KAPPA * LAB_EPSILON {
        let t = (lab.x + 16.0) / 116.0;
        t * t * t
    } else {
        lab.x / LAB_KAPPA
    };

    Vec3::new(
        lab_f_inv(fx) * LAB_WHITE.x,
        yr * LAB_WHITE.y,
        lab_f_inv(fz) * LAB_WHITE.z,
    )
}

/// CIE76 delta E: euclidean distance between two Lab colors.
#[inline]
pub fn delta_e_76(a: Vec3, b: Vec3) -> f32 {
    let d = a - b;
    d.dot(d).sqrt()
}
