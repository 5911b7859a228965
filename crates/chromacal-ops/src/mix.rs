//! The per-pixel transform pass.
//!
//! One pass over the image: white-balance in cone space, user channel mix,
//! gamut compression, saturation/lightness, and either reconstruction to
//! working RGB or collapse to monochrome. Alpha passes through untouched.
//!
//! The adaptation method is resolved to an [`Adaptation`] strategy type
//! once per pass, so the loop body monomorphizes, the kernels inline, and
//! there is no per-pixel dispatch. Rows are processed in parallel with
//! rayon (the `parallel` feature, on by default); pixels carry no
//! dependency on each other.
//!
//! # Example
//!
//! ```rust
//! use chromacal_core::{ImageView, ImageViewMut};
//! use chromacal_color::WorkingProfile;
//! use chromacal_ops::{MixerParams, transform};
//!
//! let input = vec![0.5_f32; 4 * 4 * 4];
//! let mut output = vec![0.0_f32; 4 * 4 * 4];
//!
//! let src = ImageView::new(&input, 4, 4).unwrap();
//! let mut dst = ImageViewMut::new(&mut output, 4, 4).unwrap();
//!
//! let params = MixerParams::default().commit();
//! transform(&src, &mut dst, &WorkingProfile::identity(), &params).unwrap();
//! ```

use chromacal_color::WorkingProfile;
use chromacal_color::adapt::{
    Adaptation, Cat16Kernel, FullBradfordKernel, LinearBradfordKernel, RgbBypass,
    XyzScalingKernel,
};
use chromacal_color::gamut::gamut_map;
use chromacal_color::lms::AdaptationMethod;
use chromacal_core::{CHANNELS, ImageView, ImageViewMut};
use chromacal_math::{Vec3, simd};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::OpsResult;
use crate::params::PassParams;

/// Runs the full channel-mixer pass from `input` into `output`.
///
/// Both buffers must have identical dimensions; that is the only failure
/// mode. The pass is a pure function of its inputs and may be re-invoked
/// freely; `output` is exclusively written, `input` only read.
pub fn transform(
    input: &ImageView<'_>,
    output: &mut ImageViewMut<'_>,
    profile: &WorkingProfile,
    params: &PassParams,
) -> OpsResult<()> {
    output.match_shape(input).map_err(crate::OpsError::from)?;

    // One dispatch per pass; each arm monomorphizes the loop body
    match params.adaptation {
        AdaptationMethod::LinearBradford => {
            run_pass::<LinearBradfordKernel>(input, output, profile, params)
        }
        AdaptationMethod::FullBradford => {
            run_pass::<FullBradfordKernel>(input, output, profile, params)
        }
        AdaptationMethod::Cat16 => run_pass::<Cat16Kernel>(input, output, profile, params),
        AdaptationMethod::XyzScaling => {
            run_pass::<XyzScalingKernel>(input, output, profile, params)
        }
        AdaptationMethod::Rgb => run_pass::<RgbBypass>(input, output, profile, params),
    }

    Ok(())
}

fn run_pass<A: Adaptation>(
    input: &ImageView<'_>,
    output: &mut ImageViewMut<'_>,
    profile: &WorkingProfile,
    params: &PassParams,
) {
    debug_assert_eq!(A::METHOD, params.adaptation);

    let row_len = input.width() as usize * CHANNELS;
    let in_data = input.data();
    let out_data = output.data_mut();

    let profile = *profile;
    let params = *params;

    let process_row = move |(out_row, in_row): (&mut [f32], &[f32])| {
        for (out_px, in_px) in out_row
            .chunks_exact_mut(CHANNELS)
            .zip(in_row.chunks_exact(CHANNELS))
        {
            let quad = [in_px[0], in_px[1], in_px[2], in_px[3]];
            let result = process_pixel::<A>(quad, &profile, &params);
            out_px.copy_from_slice(&result);
        }
    };

    #[cfg(feature = "parallel")]
    out_data
        .par_chunks_mut(row_len)
        .zip(in_data.par_chunks(row_len))
        .for_each(process_row);

    #[cfg(not(feature = "parallel"))]
    out_data
        .chunks_mut(row_len)
        .zip(in_data.chunks(row_len))
        .for_each(process_row);
}

#[inline]
fn process_pixel<A: Adaptation>(
    quad: [f32; 4],
    profile: &WorkingProfile,
    params: &PassParams,
) -> [f32; 4] {
    let alpha = quad[3];
    let quad = if params.clip {
        simd::max_zero_x4(quad)
    } else {
        quad
    };
    let rgb = Vec3::new(quad[0], quad[1], quad[2]);

    // Working RGB to XYZ
    let xyz = profile.rgb_to_xyz * rgb;

    // White balance in cone space, at unit luminance so the adaptation
    // only moves chromaticity
    let balanced = if A::BYPASS {
        xyz
    } else {
        let luma = xyz.y;
        let cone = A::xyz_to_cone(xyz.downscale(luma));
        let adapted = A::adapt(cone, params.illuminant, params.p);
        A::cone_to_xyz(adapted).upscale(luma)
    };

    // User 3x3 mix is a rotation + homothety of the cone vector base
    let mixed = A::cone_to_xyz(params.mix * A::xyz_to_cone(balanced));

    // Gamut mapping happens in XYZ no matter the method
    let compressed = gamut_map(mixed, params.gamut, params.clip);

    let mut cone = A::xyz_to_cone(compressed);
    if params.clip {
        cone = cone.max_zero();
    }

    let mut adjusted = luma_chroma(cone, params.saturation, params.lightness);
    if params.clip {
        adjusted = adjusted.max_zero();
    }

    let mut xyz_out = A::cone_to_xyz(adjusted);
    if params.clip {
        xyz_out = xyz_out.max_zero();
    }

    if params.apply_grey {
        let grey = xyz_out.dot(params.grey).max(0.0);
        [grey, grey, grey, alpha]
    } else {
        let rgb_out = profile.xyz_to_rgb * xyz_out;
        let quad_out = [rgb_out.x, rgb_out.y, rgb_out.z, alpha];
        if params.clip {
            let clipped = simd::max_zero_x4([rgb_out.x, rgb_out.y, rgb_out.z, 0.0]);
            [clipped[0], clipped[1], clipped[2], alpha]
        } else {
            quad_out
        }
    }
}

/// Saturation / lightness adjustment on a cone-space pixel.
///
/// The pixel is split into a unit-norm ratio vector and its norm; each
/// channel's deviation from neutral is blended by the saturation vector,
/// and the norm is rescaled by the lightness mix relative to the channel
/// average. A ratio that was already negative (out of gamut) is kept as
/// the lower bound so saturated blues do not collapse to black.
#[inline]
fn luma_chroma(input: Vec3, saturation: Vec3, lightness: Vec3) -> Vec3 {
    let avg = input.mean();
    let mix = input.dot(lightness);
    let mut norm = input.euclidean_norm();

    let ratios = input / norm;

    let deviation = Vec3::ONE - ratios;
    let coeff_ratio = (deviation * deviation).dot(saturation) / 3.0;

    let mut adjusted = Vec3::ZERO;
    for c in 0..3 {
        let min_ratio = if ratios[c] < 0.0 { ratios[c] } else { 0.0 };
        adjusted[c] = ((1.0 - ratios[c]) * coeff_ratio + ratios[c]).max(min_ratio);
    }

    // NaN from 0/0 on a pure black pixel resolves to 0 through max
    norm *= (1.0 + mix / avg).max(0.0);
    adjusted * norm
}
