//! Lane-batched pixel-quad operations.
//!
//! The per-pixel transform reads and writes RGBA quads; these helpers let
//! the clip stages and the final store run over whole quads with `wide`'s
//! portable SIMD instead of per-component scalar code.
//!
//! # Example
//!
//! ```rust
//! use chromacal_math::simd::max_zero_x4;
//!
//! let pixel = [-0.1, 0.5, 1.2, 1.0];
//! assert_eq!(max_zero_x4(pixel), [0.0, 0.5, 1.2, 1.0]);
//! ```

use wide::{f32x4, f32x8};

/// Floors all four lanes of a pixel quad at zero.
///
/// Used for the negative-RGB clip stages; note the alpha lane is clipped
/// too, which is harmless because alpha is copied from the input afterward.
#[inline]
pub fn max_zero_x4(pixel: [f32; 4]) -> [f32; 4] {
    let v = f32x4::from(pixel);
    v.max(f32x4::splat(0.0)).to_array()
}

/// Floors every value of a buffer at zero, in place.
///
/// Eight lanes at a time with a scalar tail; used by the estimator
/// pre-pass that clips negatives over the whole frame.
pub fn max_zero_inplace(values: &mut [f32]) {
    let mut chunks = values.chunks_exact_mut(8);
    let zero = f32x8::splat(0.0);

    for chunk in &mut chunks {
        let v = f32x8::from(<[f32; 8]>::try_from(&*chunk).unwrap());
        chunk.copy_from_slice(&v.max(zero).to_array());
    }

    for v in chunks.into_remainder() {
        *v = v.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_zero_x4() {
        let result = max_zero_x4([-1.0, 0.0, 0.5, -0.25]);
        assert_eq!(result, [0.0, 0.0, 0.5, 0.0]);
    }

    #[test]
    fn test_max_zero_inplace_with_tail() {
        let mut values = vec![-1.0f32; 11];
        values[3] = 0.5;
        values[10] = 0.25; // lands in the scalar tail
        max_zero_inplace(&mut values);
        assert_eq!(values[0], 0.0);
        assert_eq!(values[3], 0.5);
        assert_eq!(values[9], 0.0);
        assert_eq!(values[10], 0.25);
    }
}
