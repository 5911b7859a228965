//! Reference chart definitions.
//!
//! A chart is an ordered list of patches, each with a reference Lab color
//! (D50) and a normalized position in ideal chart space, plus the indices
//! of the patches the solver cares about. Charts are baked-in constants,
//! immutable for the life of the process.

use chromacal_math::Vec3;

/// One reference patch of a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patch {
    /// Manufacturer grid label.
    pub name: &'static str,
    /// Reference color in CIE Lab, D50 illuminant.
    pub lab: Vec3,
    /// Patch center in normalized chart coordinates ([0, 1] x [0, 1]).
    pub x: f32,
    /// Normalized vertical center.
    pub y: f32,
}

const fn patch(name: &'static str, l: f32, a: f32, b: f32, x: f32, y: f32) -> Patch {
    Patch {
        name,
        lab: Vec3::new(l, a, b),
        x,
        y,
    }
}

/// A physical reference chart.
#[derive(Debug, Clone, Copy)]
pub struct ColorChecker {
    /// Display name.
    pub name: &'static str,
    /// Ordered patches, row-major over the physical chart.
    pub patches: &'static [Patch],
    /// Patch sampling radius as a fraction of the chart diagonal.
    pub radius: f32,
    /// Index of the middle grey patch the illuminant solve trusts.
    pub middle_grey: usize,
    /// Index of the white patch.
    pub white: usize,
    /// Index of the black patch.
    pub black: usize,
}

/// The classic 24-patch ColorChecker (pre-2014 reference values).
///
/// Lab values are the manufacturer averages under D50; positions are the
/// centers of a 6 x 4 grid.
pub const COLORCHECKER_24: ColorChecker = ColorChecker {
    name: "ColorChecker 24 (pre-2014)",
    patches: &COLORCHECKER_24_PATCHES,
    radius: 0.055,
    middle_grey: 21,
    white: 18,
    black: 23,
};

#[rustfmt::skip]
const COLORCHECKER_24_PATCHES: [Patch; 24] = [
    patch("A1", 37.986,  13.555,  14.059, 1.0 / 12.0,  0.125),
    patch("A2", 65.711,  18.130,  17.810, 3.0 / 12.0,  0.125),
    patch("A3", 49.927,  -4.880, -21.925, 5.0 / 12.0,  0.125),
    patch("A4", 43.139, -13.095,  21.905, 7.0 / 12.0,  0.125),
    patch("A5", 55.112,   8.844, -25.399, 9.0 / 12.0,  0.125),
    patch("A6", 70.719, -33.397,  -0.199, 11.0 / 12.0, 0.125),
    patch("B1", 62.661,  36.067,  57.096, 1.0 / 12.0,  0.375),
    patch("B2", 40.020,  10.410, -45.964, 3.0 / 12.0,  0.375),
    patch("B3", 51.124,  48.239,  16.248, 5.0 / 12.0,  0.375),
    patch("B4", 30.325,  22.976, -21.587, 7.0 / 12.0,  0.375),
    patch("B5", 72.532, -23.709,  57.255, 9.0 / 12.0,  0.375),
    patch("B6", 71.941,  19.363,  67.857, 11.0 / 12.0, 0.375),
    patch("C1", 28.778,  14.179, -50.297, 1.0 / 12.0,  0.625),
    patch("C2", 55.261, -38.342,  31.370, 3.0 / 12.0,  0.625),
    patch("C3", 42.101,  53.378,  28.190, 5.0 / 12.0,  0.625),
    patch("C4", 81.733,   4.039,  79.819, 7.0 / 12.0,  0.625),
    patch("C5", 51.935,  49.986, -14.574, 9.0 / 12.0,  0.625),
    patch("C6", 51.038, -28.631, -28.638, 11.0 / 12.0, 0.625),
    patch("D1", 96.539,  -0.425,   1.186, 1.0 / 12.0,  0.875),
    patch("D2", 81.257,  -0.638,  -0.335, 3.0 / 12.0,  0.875),
    patch("D3", 66.766,  -0.734,  -0.504, 5.0 / 12.0,  0.875),
    patch("D4", 50.867,  -0.153,  -0.270, 7.0 / 12.0,  0.875),
    patch("D5", 35.656,  -0.421,  -1.231, 9.0 / 12.0,  0.875),
    patch("D6", 20.461,  -0.079,  -0.973, 11.0 / 12.0, 0.875),
];

#[cfg(test)]
mod tests {
    use super::*;
    use chromacal_color::spaces::lab_to_xyz;

    #[test]
    fn test_chart_has_24_patches() {
        assert_eq!(COLORCHECKER_24.patches.len(), 24);
    }

    #[test]
    fn test_special_indices_point_at_neutrals() {
        let chart = COLORCHECKER_24;
        assert_eq!(chart.patches[chart.middle_grey].name, "D4");
        assert_eq!(chart.patches[chart.white].name, "D1");
        assert_eq!(chart.patches[chart.black].name, "D6");
        // Neutral patches carry near-zero chroma
        assert!(chart.patches[chart.middle_grey].lab.y.abs() < 1.0);
        assert!(chart.patches[chart.middle_grey].lab.z.abs() < 1.0);
    }

    #[test]
    fn test_positions_inside_unit_square() {
        for p in COLORCHECKER_24.patches {
            assert!(p.x > 0.0 && p.x < 1.0);
            assert!(p.y > 0.0 && p.y < 1.0);
        }
    }

    #[test]
    fn test_grey_patch_luminance_is_mid() {
        let grey = COLORCHECKER_24.patches[COLORCHECKER_24.middle_grey];
        let xyz = lab_to_xyz(grey.lab);
        // L* ~= 50 corresponds to Y ~= 0.18
        assert!(xyz.y > 0.15 && xyz.y < 0.22, "Y = {}", xyz.y);
    }
}
