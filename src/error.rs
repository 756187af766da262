//! Error type for the BDS kernels.
//!
//! The kernels are pure functions of their inputs, so every failure is a
//! configuration mistake, never a transient condition. Errors returned here
//! are unrecoverable by contract: proceeding would silently produce
//! physically incorrect results, so callers are expected to abort the run.

use thiserror::Error;

/// Error type for BDS edge-state computations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BdsError {
    /// The convective (non-divergence) form was requested from the 2D
    /// reconstruction, which only derives the conservative correction
    /// terms.
    #[error(
        "the 2D BDS edge-state reconstruction only supports the conservative \
         (divergence) form; no convective-form correction has been derived"
    )]
    ConvectiveFormUnsupported,
}
