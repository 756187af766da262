//! Physical boundary condition kinds and the transverse-term corrector.
//!
//! The unsplit reconstruction extrapolates a (lo, hi) pair of transverse
//! values toward each face. For faces touching or outside the physical
//! domain those extrapolations see ghost cells that may not respect the
//! boundary condition, so they are corrected in place here before the
//! transverse terms are formed.
//!
//! One routine handles every axis and both domain ends: the decision table
//! is symmetric under swapping (lo, hi) together with the domain end, and
//! the axis only selects which index component is compared against the
//! domain bounds.

use crate::field::ScalarField2D;
use crate::grid::Axis;

/// Boundary condition kind for one transported component at one domain face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryKind {
    /// Dirichlet: the ghost cell outside the domain holds the prescribed
    /// boundary value.
    ExtDir,
    /// First-order extrapolation from the interior.
    FirstOrderExtrap,
    /// Higher-order extrapolation from the interior.
    HighOrderExtrap,
    /// Even reflection (zero-gradient mirror).
    ReflectEven,
    /// Odd reflection: the component vanishes on the boundary.
    ReflectOdd,
    /// Not a physical boundary (periodic or patch-internal).
    Interior,
}

/// Boundary condition kinds for one component on all four domain faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComponentBc {
    /// Kind at the low end, per axis.
    pub lo: [BoundaryKind; 2],
    /// Kind at the high end, per axis.
    pub hi: [BoundaryKind; 2],
}

impl ComponentBc {
    /// A component with no physical boundaries (all interior).
    pub fn interior() -> Self {
        Self {
            lo: [BoundaryKind::Interior; 2],
            hi: [BoundaryKind::Interior; 2],
        }
    }

    /// The same kind on every domain face.
    pub fn uniform(kind: BoundaryKind) -> Self {
        Self {
            lo: [kind; 2],
            hi: [kind; 2],
        }
    }
}

/// In/out pair of transverse extrapolated values at one face.
///
/// `lo` approaches the face from the low side of the transverse axis, `hi`
/// from the high side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransversePair {
    /// Extrapolation from below.
    pub lo: f64,
    /// Extrapolation from above.
    pub hi: f64,
}

/// Correct a transverse extrapolated (lo, hi) pair at a physical boundary.
///
/// No-op for indices strictly inside the domain along `axis`. Must only be
/// called for faces touching or outside the domain on that axis; the 2D
/// reconstruction path instead relies on externally pre-filled ghost cells.
///
/// # Arguments
/// * `axis` - Axis whose domain bounds are tested.
/// * `index` - Cell/face index; only its `axis` component decides the
///   position, the other component locates the ghost value.
/// * `comp` - Component of `state` being corrected.
/// * `state` - Read-only scalar field holding boundary ghost values.
/// * `pair` - The (lo, hi) pair, mutated in place.
/// * `bc_lo`, `bc_hi` - Boundary kinds at the low/high domain end of `axis`.
/// * `domain_lo`, `domain_hi` - Domain cell index bounds along `axis`.
/// * `is_aligned_velocity` - Whether `comp` is the velocity component
///   normal to this axis' boundaries (pins the Dirichlet value on both
///   sides of the pair).
#[allow(clippy::too_many_arguments)]
pub fn apply_transverse_bc(
    axis: Axis,
    index: [i32; 2],
    comp: usize,
    state: &ScalarField2D,
    pair: &mut TransversePair,
    bc_lo: BoundaryKind,
    bc_hi: BoundaryKind,
    domain_lo: i32,
    domain_hi: i32,
    is_aligned_velocity: bool,
) {
    let pos = index[axis.index()];
    let transverse = index[axis.transverse().index()];

    if pos <= domain_lo {
        match bc_lo {
            BoundaryKind::ExtDir => {
                let ghost = axis.cell(domain_lo - 1, transverse);
                pair.lo = state.get(ghost[0], ghost[1], comp);
                if is_aligned_velocity {
                    pair.hi = pair.lo;
                }
            }
            BoundaryKind::FirstOrderExtrap
            | BoundaryKind::HighOrderExtrap
            | BoundaryKind::ReflectEven => {
                pair.lo = pair.hi;
            }
            BoundaryKind::ReflectOdd => {
                pair.lo = 0.0;
                pair.hi = 0.0;
            }
            BoundaryKind::Interior => {}
        }
    } else if pos > domain_hi {
        match bc_hi {
            BoundaryKind::ExtDir => {
                let ghost = axis.cell(domain_hi + 1, transverse);
                pair.hi = state.get(ghost[0], ghost[1], comp);
                if is_aligned_velocity {
                    pair.lo = pair.hi;
                }
            }
            BoundaryKind::FirstOrderExtrap
            | BoundaryKind::HighOrderExtrap
            | BoundaryKind::ReflectEven => {
                pair.hi = pair.lo;
            }
            BoundaryKind::ReflectOdd => {
                pair.lo = 0.0;
                pair.hi = 0.0;
            }
            BoundaryKind::Interior => {}
        }
    }
}
