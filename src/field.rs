//! Grid function storage: cell-centered, face-centered, and slope fields.
//!
//! All fields are dense row-major `Vec<f64>` blocks over an [`IndexBox`]
//! that already includes any ghost region the caller maintains. Kernels in
//! this crate never resize or reinterpret a field; inputs are read-only and
//! outputs are written exactly once per index per call.
//!
//! Layout: `data[((j - lo_j) * nx + (i - lo_i)) * ncomp + n]` for cell
//! (i, j), component n.

use crate::grid::{Axis, IndexBox};

/// Multi-component cell-centered scalar field over an index box.
///
/// Used for the transported state (any number of components), the forcing
/// field, and the cell-centered velocity divergence. The box includes ghost
/// cells; filling them is the caller's responsibility.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField2D {
    bounds: IndexBox,
    ncomp: usize,
    data: Vec<f64>,
}

impl ScalarField2D {
    /// Create a zero-initialized field.
    pub fn new(bounds: IndexBox, ncomp: usize) -> Self {
        assert!(ncomp > 0, "field needs at least one component");
        Self {
            bounds,
            ncomp,
            data: vec![0.0; bounds.len() * ncomp],
        }
    }

    /// Create a field by evaluating `f(i, j, n)` at every index.
    pub fn from_fn<F>(bounds: IndexBox, ncomp: usize, mut f: F) -> Self
    where
        F: FnMut(i32, i32, usize) -> f64,
    {
        let mut field = Self::new(bounds, ncomp);
        for j in bounds.lo[1]..=bounds.hi[1] {
            for i in bounds.lo[0]..=bounds.hi[0] {
                for n in 0..ncomp {
                    let idx = field.offset(i, j, n);
                    field.data[idx] = f(i, j, n);
                }
            }
        }
        field
    }

    /// The index box covered by this field (ghosts included).
    #[inline]
    pub fn bounds(&self) -> IndexBox {
        self.bounds
    }

    /// Number of components.
    #[inline]
    pub fn ncomp(&self) -> usize {
        self.ncomp
    }

    #[inline]
    fn offset(&self, i: i32, j: i32, n: usize) -> usize {
        debug_assert!(
            self.bounds.contains(i, j),
            "index ({i}, {j}) outside field bounds {:?}",
            self.bounds
        );
        debug_assert!(n < self.ncomp);
        let nx = self.bounds.extent(Axis::X);
        let di = (i - self.bounds.lo[0]) as usize;
        let dj = (j - self.bounds.lo[1]) as usize;
        (dj * nx + di) * self.ncomp + n
    }

    /// Value at cell (i, j), component n.
    #[inline]
    pub fn get(&self, i: i32, j: i32, n: usize) -> f64 {
        self.data[self.offset(i, j, n)]
    }

    /// Set the value at cell (i, j), component n.
    #[inline]
    pub fn set(&mut self, i: i32, j: i32, n: usize, value: f64) {
        let idx = self.offset(i, j, n);
        self.data[idx] = value;
    }

    /// Number of `f64` entries per j-row (used by the row-parallel passes).
    #[cfg(feature = "parallel")]
    #[inline]
    pub(crate) fn row_len(&self) -> usize {
        self.bounds.extent(Axis::X) * self.ncomp
    }

    /// Mutable access to the raw storage, row-major as documented above.
    #[cfg(feature = "parallel")]
    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }
}

/// Per-cell coefficients of the limited bilinear reconstruction.
///
/// Component order is fixed: `[sx, sy, sxy]`. The first-order coefficient
/// along an axis is at that axis' component position, so
/// `get(i, j)[axis.index()]` reads the normal slope for faces of `axis`.
#[derive(Clone, Debug)]
pub struct SlopeField2D {
    field: ScalarField2D,
}

/// Number of slope coefficients per cell in 2D (sx, sy, sxy).
pub const NUM_SLOPES_2D: usize = 3;

impl SlopeField2D {
    /// Create a zero-initialized slope field over `bounds`.
    pub fn new(bounds: IndexBox) -> Self {
        Self {
            field: ScalarField2D::new(bounds, NUM_SLOPES_2D),
        }
    }

    /// The cell box covered by this slope field.
    #[inline]
    pub fn bounds(&self) -> IndexBox {
        self.field.bounds()
    }

    /// All three coefficients `[sx, sy, sxy]` at cell (i, j).
    #[inline]
    pub fn get(&self, i: i32, j: i32) -> [f64; 3] {
        [
            self.field.get(i, j, 0),
            self.field.get(i, j, 1),
            self.field.get(i, j, 2),
        ]
    }

    /// Store all three coefficients at cell (i, j).
    #[inline]
    pub fn set(&mut self, i: i32, j: i32, coeffs: [f64; 3]) {
        self.field.set(i, j, 0, coeffs[0]);
        self.field.set(i, j, 1, coeffs[1]);
        self.field.set(i, j, 2, coeffs[2]);
    }

    #[cfg(feature = "parallel")]
    #[inline]
    pub(crate) fn row_len(&self) -> usize {
        self.field.row_len()
    }

    #[cfg(feature = "parallel")]
    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        self.field.data_mut()
    }
}

/// Single-component field on the faces normal to one axis.
///
/// Face (i, j) of `Axis::X` sits between cells (i-1, j) and (i, j); face
/// (i, j) of `Axis::Y` between cells (i, j-1) and (i, j). Used for the
/// signed normal face velocities (input) and for edge states (output).
#[derive(Clone, Debug, PartialEq)]
pub struct FaceField2D {
    axis: Axis,
    field: ScalarField2D,
}

impl FaceField2D {
    /// Create a zero-initialized face field covering all faces of `axis`
    /// bounding the cells of `cell_box`.
    pub fn new(axis: Axis, cell_box: IndexBox) -> Self {
        Self {
            axis,
            field: ScalarField2D::new(cell_box.faces(axis), 1),
        }
    }

    /// Create a face field by evaluating `f(i, j)` at every face index.
    pub fn from_fn<F>(axis: Axis, cell_box: IndexBox, mut f: F) -> Self
    where
        F: FnMut(i32, i32) -> f64,
    {
        Self {
            axis,
            field: ScalarField2D::from_fn(cell_box.faces(axis), 1, |i, j, _| f(i, j)),
        }
    }

    /// The axis this field's faces are normal to.
    #[inline]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// The face index box covered by this field.
    #[inline]
    pub fn bounds(&self) -> IndexBox {
        self.field.bounds()
    }

    /// Value at face (i, j).
    #[inline]
    pub fn get(&self, i: i32, j: i32) -> f64 {
        self.field.get(i, j, 0)
    }

    /// Set the value at face (i, j).
    #[inline]
    pub fn set(&mut self, i: i32, j: i32, value: f64) {
        self.field.set(i, j, 0, value);
    }

    #[cfg(feature = "parallel")]
    #[inline]
    pub(crate) fn row_len(&self) -> usize {
        self.field.row_len()
    }

    #[cfg(feature = "parallel")]
    #[inline]
    pub(crate) fn data_mut(&mut self) -> &mut [f64] {
        self.field.data_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_field_round_trip() {
        let bounds = IndexBox::new([-2, -2], [5, 5]);
        let mut s = ScalarField2D::new(bounds, 2);
        s.set(-2, -2, 0, 1.5);
        s.set(5, 5, 1, -3.0);
        assert_eq!(s.get(-2, -2, 0), 1.5);
        assert_eq!(s.get(5, 5, 1), -3.0);
        assert_eq!(s.get(0, 0, 0), 0.0);
    }

    #[test]
    fn test_scalar_field_from_fn() {
        let bounds = IndexBox::new([0, 0], [3, 3]);
        let s = ScalarField2D::from_fn(bounds, 1, |i, j, _| (i + 10 * j) as f64);
        assert_eq!(s.get(2, 1, 0), 12.0);
        assert_eq!(s.get(3, 3, 0), 33.0);
    }

    #[test]
    fn test_slope_field_component_order() {
        let mut slopes = SlopeField2D::new(IndexBox::new([0, 0], [1, 1]));
        slopes.set(1, 0, [1.0, 2.0, 3.0]);
        let c = slopes.get(1, 0);
        // sx at the X position, sy at the Y position, sxy last.
        assert_eq!(c[Axis::X.index()], 1.0);
        assert_eq!(c[Axis::Y.index()], 2.0);
        assert_eq!(c[2], 3.0);
    }

    #[test]
    fn test_face_field_staggering() {
        let cells = IndexBox::new([0, 0], [3, 3]);
        let xf = FaceField2D::new(Axis::X, cells);
        let yf = FaceField2D::new(Axis::Y, cells);
        // One extra face along the normal axis only.
        assert_eq!(xf.bounds(), IndexBox::new([0, 0], [4, 3]));
        assert_eq!(yf.bounds(), IndexBox::new([0, 0], [3, 4]));
        assert_eq!(xf.axis(), Axis::X);
    }

    #[test]
    fn test_face_field_from_fn() {
        let cells = IndexBox::new([0, 0], [2, 2]);
        let xf = FaceField2D::from_fn(Axis::X, cells, |i, j| (i * 100 + j) as f64);
        assert_eq!(xf.get(3, 2), 302.0);
    }
}
