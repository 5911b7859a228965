//! Error types for chromacal operations.
//!
//! The pipeline's error policy is deliberately narrow: numeric degeneracy
//! (zero luminance, NaN scale factors, empty patch boxes) is epsilon-guarded
//! inline and never surfaces here, and configuration inconsistencies (a
//! normalization requested on a zero-sum vector) downgrade to a logged
//! advisory. Only caller-contract violations abort an operation: buffers
//! that do not match their declared dimensions, working profiles that
//! cannot be inverted.
//!
//! # Usage
//!
//! ```rust
//! use chromacal_core::{Error, Result};
//!
//! fn check_len(len: usize, width: u32, height: u32) -> Result<()> {
//!     let expected = width as usize * height as usize * 4;
//!     if len != expected {
//!         return Err(Error::BufferSizeMismatch { expected, actual: len });
//!     }
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur at the boundaries of the chromacal pipeline.
///
/// Every variant is a caller-contract violation; none of them originate
/// from pixel data.
#[derive(Debug, Error)]
pub enum Error {
    /// Buffer length does not match the declared width x height x 4.
    #[error("buffer holds {actual} floats but {expected} are required")]
    BufferSizeMismatch {
        /// Required length (width * height * 4)
        expected: usize,
        /// Length of the buffer actually supplied
        actual: usize,
    },

    /// Width or height is zero, or their product overflows.
    #[error("invalid image dimensions: {0}")]
    InvalidDimensions(String),

    /// Input and output buffers disagree on shape.
    #[error("dimension mismatch: input {in_width}x{in_height}, output {out_width}x{out_height}")]
    DimensionMismatch {
        /// Input width
        in_width: u32,
        /// Input height
        in_height: u32,
        /// Output width
        out_width: u32,
        /// Output height
        out_height: u32,
    },

    /// A working-profile matrix could not be inverted.
    #[error("working profile RGB->XYZ matrix is singular")]
    SingularProfile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::BufferSizeMismatch {
            expected: 16,
            actual: 12,
        };
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("16"));
    }
}
