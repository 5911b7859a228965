//! Error types for pipeline operations.
//!
//! Pixel data never produces an error: numeric degeneracy is handled
//! inline by the kernels and the estimators degrade to the D50 default.
//! The only failures that surface are caller-contract violations caught at
//! the buffer boundary.

use thiserror::Error;

/// Error type for pipeline operations.
#[derive(Error, Debug)]
pub enum OpsError {
    /// A buffer or dimension check at the call boundary failed.
    #[error(transparent)]
    Contract(#[from] chromacal_core::Error),
}

/// Result type for pipeline operations.
pub type OpsResult<T> = Result<T, OpsError>;
