//! # bds-rs
//!
//! Bell–Dawson–Shubin (BDS) unsplit higher-order Godunov edge-state
//! reconstruction for finite-volume advection on uniform block-structured
//! grids.
//!
//! This crate provides the computational kernels that turn a cell-centered
//! scalar field and face-centered velocities into reconstructed face
//! ("edge") states, from which an advective flux divergence is assembled
//! by the caller:
//! - Corner-based, mass-conserving, monotonicity-limited bilinear slope
//!   estimation ([`compute_slopes`])
//! - Upwind Gamma-corrected edge-state reconstruction folding the
//!   transverse-advection correction into a single unsplit update
//!   ([`compute_edge_states`])
//! - Transverse boundary correction of extrapolated value pairs at
//!   physical domain edges ([`apply_transverse_bc`])
//!
//! Everything here is a pure function of its inputs over a bounded
//! stencil: no kernel observes another iteration's write, so the passes
//! are safe for data-parallel execution (see the `parallel` feature).
//! Ghost-cell filling, patch distribution, and time integration are the
//! caller's responsibility.

pub mod boundary;
pub mod edge_state;
pub mod error;
pub mod field;
pub mod grid;
pub mod slopes;

pub use boundary::{apply_transverse_bc, BoundaryKind, ComponentBc, TransversePair};
pub use edge_state::{
    compute_edge_states, compute_edge_states_with_slopes, EdgeStateConfig, EdgeStateInputs,
};
pub use error::BdsError;
pub use field::{FaceField2D, ScalarField2D, SlopeField2D, NUM_SLOPES_2D};
pub use grid::{Axis, Geometry2D, IndexBox};
pub use slopes::{
    compute_slopes, extrapolate_corners, SlopeConfig, DEFAULT_SLOPE_TOLERANCE,
};

#[cfg(feature = "parallel")]
pub use edge_state::compute_edge_states_parallel;
#[cfg(feature = "parallel")]
pub use slopes::compute_slopes_parallel;
