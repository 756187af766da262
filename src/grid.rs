//! Index boxes, axes, and uniform grid geometry.
//!
//! The kernels in this crate operate on logically rectangular patches of a
//! uniform block-structured grid. Cells are addressed by signed integer
//! coordinates (i, j) so that ghost cells extend naturally below zero, and
//! every patch is described by an inclusive [`IndexBox`].
//!
//! Faces are indexed in the usual staggered convention: the x-face with
//! index (i, j) sits between cells (i-1, j) and (i, j), so a patch with
//! cells `lo..=hi` along an axis has faces `lo..=hi+1` along that axis.

use std::fmt;

/// Coordinate axis of the 2D grid.
///
/// All per-axis routines (transverse boundary correction, edge-state
/// reconstruction) are written once and parameterized by `Axis`; the axis
/// fixes which index plays the "normal" role and which the "transverse"
/// role.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// The i (first) index direction.
    X,
    /// The j (second) index direction.
    Y,
}

impl Axis {
    /// Both axes, in storage order.
    pub const ALL: [Axis; 2] = [Axis::X, Axis::Y];

    /// Component position of this axis in `[i32; 2]` / `[f64; 2]` arrays.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }

    /// The perpendicular axis.
    #[inline]
    pub const fn transverse(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Assemble an (i, j) index from components given in (normal,
    /// transverse) roles relative to this axis.
    ///
    /// For `Axis::X` the normal component is i; for `Axis::Y` it is j.
    #[inline]
    pub const fn cell(self, normal: i32, transverse: i32) -> [i32; 2] {
        match self {
            Axis::X => [normal, transverse],
            Axis::Y => [transverse, normal],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Inclusive rectangular box of integer cell (or face/corner) indices.
///
/// `lo` and `hi` are both part of the box. Ghost regions are represented by
/// growing a box, never by separate storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexBox {
    /// Smallest contained index per axis.
    pub lo: [i32; 2],
    /// Largest contained index per axis.
    pub hi: [i32; 2],
}

impl IndexBox {
    /// Create a box from inclusive bounds.
    ///
    /// # Panics
    /// Panics if `hi < lo` on any axis.
    pub fn new(lo: [i32; 2], hi: [i32; 2]) -> Self {
        assert!(
            lo[0] <= hi[0] && lo[1] <= hi[1],
            "empty index box: lo {lo:?}, hi {hi:?}"
        );
        Self { lo, hi }
    }

    /// Number of indices along `axis`.
    #[inline]
    pub fn extent(&self, axis: Axis) -> usize {
        let d = axis.index();
        (self.hi[d] - self.lo[d] + 1) as usize
    }

    /// Total number of indices in the box.
    #[inline]
    pub fn len(&self) -> usize {
        self.extent(Axis::X) * self.extent(Axis::Y)
    }

    /// Whether the box is empty (never true for a constructed box).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hi[0] < self.lo[0] || self.hi[1] < self.lo[1]
    }

    /// Whether (i, j) lies inside the box.
    #[inline]
    pub fn contains(&self, i: i32, j: i32) -> bool {
        i >= self.lo[0] && i <= self.hi[0] && j >= self.lo[1] && j <= self.hi[1]
    }

    /// Whether `other` lies entirely inside this box.
    #[inline]
    pub fn contains_box(&self, other: &IndexBox) -> bool {
        self.contains(other.lo[0], other.lo[1]) && self.contains(other.hi[0], other.hi[1])
    }

    /// The box grown by `n` indices on every side.
    #[inline]
    pub fn grow(&self, n: i32) -> IndexBox {
        IndexBox::new(
            [self.lo[0] - n, self.lo[1] - n],
            [self.hi[0] + n, self.hi[1] + n],
        )
    }

    /// The box of faces normal to `axis` bounding these cells.
    ///
    /// One larger than the cell box along `axis`: cells `lo..=hi` have
    /// faces `lo..=hi+1`.
    #[inline]
    pub fn faces(&self, axis: Axis) -> IndexBox {
        let mut hi = self.hi;
        hi[axis.index()] += 1;
        IndexBox::new(self.lo, hi)
    }

    /// The box of cell corners bounding these cells.
    ///
    /// Corner (i, j) is the lower-left corner of cell (i, j), so the corner
    /// box is one larger than the cell box along both axes.
    #[inline]
    pub fn corners(&self) -> IndexBox {
        IndexBox::new(self.lo, [self.hi[0] + 1, self.hi[1] + 1])
    }
}

/// Uniform grid geometry for one patch: cell spacing and the valid
/// (physical-domain) cell index bounds.
///
/// Immutable for the duration of a kernel call. The valid box describes the
/// physical domain; ghost cells live outside it.
#[derive(Clone, Copy, Debug)]
pub struct Geometry2D {
    cell_box: IndexBox,
    spacing: [f64; 2],
}

impl Geometry2D {
    /// Create geometry from the valid cell box and per-axis spacing.
    ///
    /// # Panics
    /// Panics if a spacing is not strictly positive.
    pub fn new(cell_box: IndexBox, spacing: [f64; 2]) -> Self {
        assert!(
            spacing[0] > 0.0 && spacing[1] > 0.0,
            "cell spacing must be positive, got {spacing:?}"
        );
        Self { cell_box, spacing }
    }

    /// The valid (interior) cell box of the domain.
    #[inline]
    pub fn cell_box(&self) -> IndexBox {
        self.cell_box
    }

    /// Cell spacing along `axis`.
    #[inline]
    pub fn spacing(&self, axis: Axis) -> f64 {
        self.spacing[axis.index()]
    }

    /// Low domain index bound along `axis`.
    #[inline]
    pub fn domain_lo(&self, axis: Axis) -> i32 {
        self.cell_box.lo[axis.index()]
    }

    /// High domain index bound along `axis`.
    #[inline]
    pub fn domain_hi(&self, axis: Axis) -> i32 {
        self.cell_box.hi[axis.index()]
    }
}
