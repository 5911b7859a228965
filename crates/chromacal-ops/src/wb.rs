//! Automatic scene illuminant estimation.
//!
//! Two statistical estimators that infer the illuminant chromaticity from
//! the image itself, with no reference target in frame:
//!
//! - **Grey edge**: assumes the average of edge chromaticities is neutral.
//!   A 3x3 B-spline blur gives a local Laplacian per sample; the negated
//!   edge vectors, regularized by an inverse Minkowski norm, average to
//!   the illuminant offset from D50.
//! - **Grey surface**: assumes the average surface chromaticity is
//!   neutral. The same blur gives a local mean, weighted by per-channel
//!   patch variance times chroma covariance, so flat patches (no signal)
//!   and channel-uncorrelated patches (noise, chromatic aberration) are
//!   naturally driven toward zero weight.
//!
//! Both scan a strided sample grid over the full-resolution image once per
//! triggering event. A degenerate image (flat, too small for the window)
//! is not an error: the accumulators stay empty and the estimate degrades
//! to D50 itself.

use chromacal_color::WorkingProfile;
use chromacal_color::spaces::{Chromaticity, D50};
use chromacal_core::{CHANNELS, ImageView};
use chromacal_math::{NORM_MIN, Vec3, simd};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Sample stride of the analysis grid, in pixels.
const OFF: usize = 4;

/// Exponent of the Minkowski regularization norm.
const MINKOWSKI_P: f32 = 8.0;

/// Which grey-world hypothesis the estimator uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EstimatorMethod {
    /// Average of edge chromaticities is neutral.
    GreyEdge,
    /// Variance-weighted average of surface chromaticities is neutral.
    GreySurface,
}

/// Estimates the scene illuminant chromaticity from image statistics.
///
/// Returns the estimated (x, y). This cannot fail: buffer shape was
/// validated when the view was built, and a flat or undersized image
/// degrades to D50 rather than erroring.
pub fn estimate_illuminant(
    input: &ImageView<'_>,
    profile: &WorkingProfile,
    method: EstimatorMethod,
) -> Chromaticity {
    let width = input.width() as usize;
    let height = input.height() as usize;

    // Margins keep the 3x3 window at +-OFF inside the frame:
    // samples run over 2*OFF .. dim - 4*OFF, stepping by OFF
    if width <= 6 * OFF || height <= 6 * OFF {
        return D50;
    }

    let shifted = shifted_chroma_plane(input, profile);

    let (sum_x, sum_y, elements) = match method {
        EstimatorMethod::GreyEdge => accumulate(&shifted, width, height, grey_edge_sample),
        EstimatorMethod::GreySurface => accumulate(&shifted, width, height, grey_surface_sample),
    };

    let norm_d50 = D50.x.hypot(D50.y);
    let mean = if elements > 0.0 {
        (sum_x / elements, sum_y / elements)
    } else {
        (0.0, 0.0)
    };

    // A flat image leaves the accumulator at zero and the estimate at D50;
    // non-finite means (all-zero weights) get the same treatment
    if !mean.0.is_finite() || !mean.1.is_finite() {
        return D50;
    }

    Chromaticity::new(norm_d50 * mean.0 + D50.x, norm_d50 * mean.1 + D50.y)
}

/// Converts the frame to D50-shifted, normalized xy chromaticity.
///
/// Channel layout of the result matches the input stride: [x shift,
/// y shift, Y, unused] per pixel, so the windowed samplers can reuse the
/// pixel indexing of the source.
fn shifted_chroma_plane(input: &ImageView<'_>, profile: &WorkingProfile) -> Vec<f32> {
    let mut clipped = input.data().to_vec();
    simd::max_zero_inplace(&mut clipped);

    let rgb_to_xyz = profile.rgb_to_xyz;
    let norm_d50 = D50.x.hypot(D50.y);

    let convert_row = move |row: &mut [f32]| {
        for px in row.chunks_exact_mut(CHANNELS) {
            let rgb = Vec3::new(px[0], px[1], px[2]);
            let xyz = rgb_to_xyz * rgb;

            let sum = xyz.sum().max(NORM_MIN);
            let x = xyz.x / sum;
            let y = xyz.y / sum;

            px[0] = (x - D50.x) / norm_d50;
            px[1] = (y - D50.y) / norm_d50;
            px[2] = xyz.y;
            px[3] = 0.0;
        }
    };

    let row_len = input.width() as usize * CHANNELS;

    #[cfg(feature = "parallel")]
    clipped.par_chunks_mut(row_len).for_each(convert_row);

    #[cfg(not(feature = "parallel"))]
    clipped.chunks_mut(row_len).for_each(convert_row);

    clipped
}

/// 3x3 B-spline kernel over the +-OFF neighborhood of channel `c`.
#[inline]
fn bspline_blur(plane: &[f32], width: usize, i: usize, j: usize, c: usize) -> f32 {
    let sample = |di: isize, dj: isize| -> f32 {
        let y = (i as isize + di * OFF as isize) as usize;
        let x = (j as isize + dj * OFF as isize) as usize;
        plane[(y * width + x) * CHANNELS + c]
    };

    (sample(-1, -1)
        + 2.0 * sample(-1, 0)
        + sample(-1, 1)
        + 2.0 * sample(0, -1)
        + 4.0 * sample(0, 0)
        + 2.0 * sample(0, 1)
        + sample(1, -1)
        + 2.0 * sample(1, 0)
        + sample(1, 1))
        / 16.0
}

#[inline]
fn minkowski_norm(a: f32, b: f32) -> f32 {
    (a.abs().powf(MINKOWSKI_P) + b.abs().powf(MINKOWSKI_P)).powf(1.0 / MINKOWSKI_P) + 1e-6
}

/// One grey-edge sample: negated Laplacian over the regularizer.
#[inline]
fn grey_edge_sample(plane: &[f32], width: usize, i: usize, j: usize) -> (f32, f32, f32) {
    let center = |c: usize| plane[(i * width + j) * CHANNELS + c];

    let dd = [
        center(0) - bspline_blur(plane, width, i, j, 0),
        center(1) - bspline_blur(plane, width, i, j, 1),
    ];

    let p_norm = minkowski_norm(dd[0], dd[1]);

    (-dd[0] / p_norm, -dd[1] / p_norm, 1.0)
}

/// One grey-surface sample: local average weighted by variance * covariance.
#[inline]
fn grey_surface_sample(plane: &[f32], width: usize, i: usize, j: usize) -> (f32, f32, f32) {
    let sample = |di: isize, dj: isize, c: usize| -> f32 {
        let y = (i as isize + di * OFF as isize) as usize;
        let x = (j as isize + dj * OFF as isize) as usize;
        plane[(y * width + x) * CHANNELS + c]
    };

    let average = [
        bspline_blur(plane, width, i, j, 0).max(0.0),
        bspline_blur(plane, width, i, j, 1).max(0.0),
    ];

    // Patch variance per channel: zero on a flat surface, which should
    // not vote. Covariance of the two chroma channels: zero when they are
    // uncorrelated, i.e. noise or chromatic aberration.
    let mut var = [0.0_f32; 2];
    let mut covar = 0.0_f32;
    for di in -1..=1_isize {
        for dj in -1..=1_isize {
            let du = sample(di, dj, 0) - average[0];
            let dv = sample(di, dj, 1) - average[1];
            var[0] += du * du;
            var[1] += dv * dv;
            covar += du * dv;
        }
    }
    var[0] /= 9.0;
    var[1] /= 9.0;
    covar /= 9.0;

    let p_norm = minkowski_norm(average[0], average[1]);
    let weight = var[0] * var[1] * covar;

    (
        average[0] * weight / p_norm,
        average[1] * weight / p_norm,
        weight / p_norm,
    )
}

/// Runs a sampler over the strided grid and reduces the partial sums.
fn accumulate(
    plane: &[f32],
    width: usize,
    height: usize,
    sample: fn(&[f32], usize, usize, usize) -> (f32, f32, f32),
) -> (f32, f32, f32) {
    let rows: Vec<usize> = (2 * OFF..height - 4 * OFF).step_by(OFF).collect();

    let row_sums = |&i: &usize| -> (f32, f32, f32) {
        let mut acc = (0.0_f32, 0.0_f32, 0.0_f32);
        let mut j = 2 * OFF;
        while j < width - 4 * OFF {
            let (sx, sy, n) = sample(plane, width, i, j);
            acc.0 += sx;
            acc.1 += sy;
            acc.2 += n;
            j += OFF;
        }
        acc
    };

    let add = |a: (f32, f32, f32), b: (f32, f32, f32)| (a.0 + b.0, a.1 + b.1, a.2 + b.2);

    #[cfg(feature = "parallel")]
    {
        rows.par_iter()
            .map(row_sums)
            .reduce(|| (0.0, 0.0, 0.0), add)
    }

    #[cfg(not(feature = "parallel"))]
    {
        rows.iter().map(row_sums).fold((0.0, 0.0, 0.0), add)
    }
}
