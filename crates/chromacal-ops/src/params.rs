//! User parameters and their frozen per-pass form.
//!
//! [`MixerParams`] is what a caller (UI, preset, batch job) manipulates.
//! Before a pass runs, [`MixerParams::commit`] resolves it into
//! [`PassParams`]: normalizations applied, the illuminant reduced to a
//! cone-space triple, the Bradford exponent precomputed. Everything in
//! `PassParams` is constant for the whole image; nothing in the hot loop
//! ever looks back at the user-facing struct.

use chromacal_color::adapt::bradford_p;
use chromacal_color::illuminant::{Illuminant, check_close_to_daylight};
use chromacal_color::lms::{AdaptationMethod, d50_cone, xyz_to_cone};
use chromacal_math::{Mat3, Vec3};
use tracing::warn;

/// User-facing channel mixer / calibration parameters.
///
/// The three mix rows are indexed output-channel first: `red` is the row
/// producing output R from input R, G, B. Saturation, lightness, and grey
/// are per-channel adjustment vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MixerParams {
    /// Mix row for the output red channel.
    pub red: Vec3,
    /// Mix row for the output green channel.
    pub green: Vec3,
    /// Mix row for the output blue channel.
    pub blue: Vec3,
    /// Per-channel saturation adjustment, typically in [-1, 1].
    pub saturation: Vec3,
    /// Per-channel lightness adjustment, typically in [-1, 1].
    pub lightness: Vec3,
    /// Grey mixing weights; any non-zero component enables monochrome
    /// output.
    pub grey: Vec3,
    /// Divide the red mix row by its own sum (energy preserving).
    pub normalize_red: bool,
    /// Divide the green mix row by its own sum.
    pub normalize_green: bool,
    /// Divide the blue mix row by its own sum.
    pub normalize_blue: bool,
    /// Remove the mean from the saturation vector (relative adjustment).
    pub normalize_saturation: bool,
    /// Remove the mean from the lightness vector.
    pub normalize_lightness: bool,
    /// Divide the grey vector by its sum.
    pub normalize_grey: bool,
    /// Scene illuminant the pass adapts away from.
    pub illuminant: Illuminant,
    /// Chromatic adaptation transform for the pass.
    pub adaptation: AdaptationMethod,
    /// Gamut compression strength, 0 (off) to 4.
    pub gamut: f32,
    /// Clip negative RGB produced by the adaptation and the mix.
    pub clip: bool,
}

impl Default for MixerParams {
    fn default() -> Self {
        Self {
            red: Vec3::new(1.0, 0.0, 0.0),
            green: Vec3::new(0.0, 1.0, 0.0),
            blue: Vec3::new(0.0, 0.0, 1.0),
            saturation: Vec3::ZERO,
            lightness: Vec3::ZERO,
            grey: Vec3::ZERO,
            normalize_red: false,
            normalize_green: false,
            normalize_blue: false,
            normalize_saturation: false,
            normalize_lightness: false,
            normalize_grey: true,
            illuminant: Illuminant::default(),
            adaptation: AdaptationMethod::default(),
            gamut: 1.0,
            clip: true,
        }
    }
}

impl MixerParams {
    /// A complete bypass: no adaptation, no mix, no gamut move, no clip.
    pub fn bypass() -> Self {
        Self {
            illuminant: Illuminant::Pipe,
            adaptation: AdaptationMethod::Rgb,
            gamut: 0.0,
            clip: false,
            normalize_grey: false,
            ..Self::default()
        }
    }

    /// Freezes these parameters into per-pass constants.
    pub fn commit(&self) -> PassParams {
        let mix = Mat3::from_row_vecs(
            self.red / row_norm(self.red, self.normalize_red, "red"),
            self.green / row_norm(self.green, self.normalize_green, "green"),
            self.blue / row_norm(self.blue, self.normalize_blue, "blue"),
        );

        let sat_mean = if self.normalize_saturation {
            self.saturation.mean()
        } else {
            0.0
        };
        let light_mean = if self.normalize_lightness {
            self.lightness.mean()
        } else {
            0.0
        };

        // The ratio blend in the pixel loop consumes saturation negated
        let saturation = Vec3::ZERO - self.saturation - Vec3::splat(sat_mean);
        let lightness = self.lightness - Vec3::splat(light_mean);

        let apply_grey = self.grey != Vec3::ZERO;
        let grey_sum = self.grey.sum();
        let grey_norm = if !self.normalize_grey || grey_sum == 0.0 {
            1.0
        } else {
            grey_sum
        };
        let grey = self.grey / grey_norm;

        // The camera's as-shot chromaticity arrives without a method
        // preference; pick one the way the calibration solver would
        let adaptation = match self.illuminant {
            Illuminant::Camera(xy) => check_close_to_daylight(xy).adaptation,
            _ => self.adaptation,
        };

        // Pipe means "the pipeline reference itself": snap to the exact
        // cone constants so the adaptation ratio is exactly 1, instead of
        // round-tripping through chromaticity
        let illuminant = match self.illuminant {
            Illuminant::Pipe => d50_cone(adaptation),
            _ => xyz_to_cone(self.illuminant.chromaticity().to_xyz(), adaptation),
        };

        PassParams {
            mix,
            saturation,
            lightness,
            grey,
            illuminant,
            p: bradford_p(illuminant),
            gamut: if self.gamut == 0.0 {
                0.0
            } else {
                1.0 / self.gamut
            },
            clip: self.clip,
            apply_grey,
            adaptation,
        }
    }
}

fn row_norm(row: Vec3, normalize: bool, label: &str) -> f32 {
    if !normalize {
        return 1.0;
    }
    let sum = row.sum();
    if sum.abs() < f32::EPSILON {
        warn!(
            row = label,
            "normalization requested on a zero-sum mix row, leaving it unnormalized"
        );
        1.0
    } else {
        sum
    }
}

/// Frozen per-pass constants consumed by the transform loop.
///
/// Produced by [`MixerParams::commit`]; immutable for the whole pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassParams {
    /// Normalized channel mix matrix, applied in cone space.
    pub mix: Mat3,
    /// Committed saturation vector (negated, mean-removed).
    pub saturation: Vec3,
    /// Committed lightness vector (mean-removed).
    pub lightness: Vec3,
    /// Normalized grey mixing weights.
    pub grey: Vec3,
    /// Scene illuminant in the adaptation method's cone space.
    pub illuminant: Vec3,
    /// Bradford blue compensation exponent for this illuminant.
    pub p: f32,
    /// Committed gamut compression exponent (reciprocal of the user value).
    pub gamut: f32,
    /// Clip negative channel values between stages.
    pub clip: bool,
    /// Collapse output to monochrome through the grey vector.
    pub apply_grey: bool,
    /// Adaptation method the pass is specialized over.
    pub adaptation: AdaptationMethod,
}
