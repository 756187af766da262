//! Limited bilinear slope estimation for the BDS reconstruction.
//!
//! Sub-cell variation of the transported scalar is modeled per cell as
//!
//! s(x, y) = s̄ + sx·(x − x_c) + sy·(y − y_c) + sxy·(x − x_c)(y − y_c)
//!
//! with the coefficients derived from fourth-order corner interpolants and
//! then limited so that no corner of the reconstruction leaves the range of
//! the four cell averages sharing that corner. The limiter redistributes
//! any clipped mass among the remaining corners, so the cell average is
//! conserved exactly.
//!
//! Stencil footprint: each corner interpolant reads a fixed 4×4 cell block,
//! so the state must extend two cells beyond the requested slope box.

use crate::field::{ScalarField2D, SlopeField2D};
use crate::grid::{Axis, Geometry2D, IndexBox};

/// Tolerance below which a corner is considered uncorrectable by the
/// redistribution loop.
pub const DEFAULT_SLOPE_TOLERANCE: f64 = 1.0e-8;

/// Number of redistribution sweeps. Fixed for bounded cost; three sweeps
/// leave a residual far below the tolerance in practice.
const LIMITER_ITERATIONS: usize = 3;

/// Runtime configuration for the slope estimator.
#[derive(Clone, Copy, Debug)]
pub struct SlopeConfig {
    /// Apply the monotonicity limiter. Disable only for validation runs;
    /// unlimited slopes can introduce new extrema at cell corners.
    pub limit_slopes: bool,
    /// Tolerance deciding whether a corner still needs correction.
    pub tolerance: f64,
}

impl Default for SlopeConfig {
    fn default() -> Self {
        Self {
            limit_slopes: true,
            tolerance: DEFAULT_SLOPE_TOLERANCE,
        }
    }
}

/// Fourth-order interpolation of the state to one cell corner.
///
/// Corner (i, j) is the lower-left corner of cell (i, j). The 16-cell
/// stencil is exact for polynomials up to cubic on a uniform grid:
/// weight +1 on the four diagonal-far cells, −7 on the eight adjacent
/// cells, +49 on the four cells nearest the corner, normalized by 144.
#[inline]
fn corner_value(s: &ScalarField2D, comp: usize, i: i32, j: i32) -> f64 {
    (s.get(i - 2, j - 2, comp)
        + s.get(i - 2, j + 1, comp)
        + s.get(i + 1, j - 2, comp)
        + s.get(i + 1, j + 1, comp)
        - 7.0 * (s.get(i - 2, j - 1, comp)
            + s.get(i - 2, j, comp)
            + s.get(i - 1, j - 2, comp)
            + s.get(i, j - 2, comp)
            + s.get(i - 1, j + 1, comp)
            + s.get(i, j + 1, comp)
            + s.get(i + 1, j - 1, comp)
            + s.get(i + 1, j, comp))
        + 49.0
            * (s.get(i - 1, j - 1, comp)
                + s.get(i, j - 1, comp)
                + s.get(i - 1, j, comp)
                + s.get(i, j, comp)))
        / 144.0
}

/// Evaluate the bilinear reconstruction at the four corners of a cell.
///
/// The ordering is part of the slope contract and must not change:
/// `[++, +−, −+, −−]`, i.e. (high x, high y) first, (low x, low y) last.
#[inline]
pub fn extrapolate_corners(cell_value: f64, hx: f64, hy: f64, coeffs: [f64; 3]) -> [f64; 4] {
    let [sx, sy, sxy] = coeffs;
    [
        cell_value + 0.5 * (hx * sx + hy * sy) + 0.25 * hx * hy * sxy,
        cell_value + 0.5 * (hx * sx - hy * sy) - 0.25 * hx * hy * sxy,
        cell_value - 0.5 * (hx * sx - hy * sy) - 0.25 * hx * hy * sxy,
        cell_value - 0.5 * (hx * sx + hy * sy) + 0.25 * hx * hy * sxy,
    ]
}

/// Min/max of the four cell averages sharing each corner of cell (i, j),
/// in the same `[++, +−, −+, −−]` order as [`extrapolate_corners`].
#[inline]
fn neighbor_bounds(s: &ScalarField2D, comp: usize, i: i32, j: i32) -> ([f64; 4], [f64; 4]) {
    let quad = |di: i32, dj: i32| {
        [
            s.get(i, j, comp),
            s.get(i + di, j, comp),
            s.get(i, j + dj, comp),
            s.get(i + di, j + dj, comp),
        ]
    };
    let mut smin = [0.0; 4];
    let mut smax = [0.0; 4];
    for (m, (di, dj)) in [(1, 1), (1, -1), (-1, 1), (-1, -1)].into_iter().enumerate() {
        let q = quad(di, dj);
        smin[m] = q[0].min(q[1]).min(q[2]).min(q[3]);
        smax[m] = q[0].max(q[1]).max(q[2]).max(q[3]);
    }
    (smin, smax)
}

/// Slope coefficients `[sx, sy, sxy]` for one cell, limited per `config`.
fn slopes_at(
    s: &ScalarField2D,
    comp: usize,
    corners: &ScalarField2D,
    i: i32,
    j: i32,
    hx: f64,
    hy: f64,
    config: &SlopeConfig,
) -> [f64; 3] {
    let c_mm = corners.get(i, j, 0);
    let c_pm = corners.get(i + 1, j, 0);
    let c_mp = corners.get(i, j + 1, 0);
    let c_pp = corners.get(i + 1, j + 1, 0);

    // Raw slopes from the unlimited corner interpolants.
    let mut sx = 0.5 * (c_pp + c_pm - c_mp - c_mm) / hx;
    let mut sy = 0.5 * (c_pp - c_pm + c_mp - c_mm) / hy;
    let mut sxy = (c_pp - c_pm - c_mp + c_mm) / (hx * hy);

    if config.limit_slopes {
        let cell = s.get(i, j, comp);
        let mut sc = extrapolate_corners(cell, hx, hy, [sx, sy, sxy]);
        let (smin, smax) = neighbor_bounds(s, comp, i, j);

        for m in 0..4 {
            sc[m] = sc[m].clamp(smin[m], smax[m]);
        }

        // Redistribute the clipping deficit among corners that still have
        // headroom, keeping the corner average (the cell average) fixed.
        for _ in 0..LIMITER_ITERATIONS {
            let sumloc = 0.25 * (sc[0] + sc[1] + sc[2] + sc[3]);
            let mut sumdif = (sumloc - cell) * 4.0;
            let sgndif = 1.0_f64.copysign(sumdif);

            let mut diff = [0.0; 4];
            for m in 0..4 {
                diff[m] = (sc[m] - cell) * sgndif;
            }

            // Corners still correctable in the deficit direction.
            let mut kdp = diff.iter().filter(|&&d| d > config.tolerance).count() as i32;

            for m in 0..4 {
                let div = if kdp < 1 { 1.0 } else { f64::from(kdp) };
                let mut redfac = if diff[m] > config.tolerance {
                    kdp -= 1;
                    sumdif * sgndif / div
                } else {
                    0.0
                };
                let redmax = if sgndif > 0.0 {
                    sc[m] - smin[m]
                } else {
                    smax[m] - sc[m]
                };
                redfac = redfac.min(redmax);
                sumdif -= redfac * sgndif;
                sc[m] -= redfac * sgndif;
            }
        }

        // Recompose the slopes from the corrected corner values.
        sx = 0.5 * (sc[0] + sc[1] - sc[3] - sc[2]) / hx;
        sy = 0.5 * (sc[0] + sc[2] - sc[3] - sc[1]) / hy;
        sxy = (sc[3] + sc[0] - sc[2] - sc[1]) / (hx * hy);
    }

    [sx, sy, sxy]
}

fn interpolate_corner_box(s: &ScalarField2D, comp: usize, corner_box: IndexBox) -> ScalarField2D {
    let mut corners = ScalarField2D::new(corner_box, 1);
    for j in corner_box.lo[1]..=corner_box.hi[1] {
        for i in corner_box.lo[0]..=corner_box.hi[0] {
            corners.set(i, j, 0, corner_value(s, comp, i, j));
        }
    }
    corners
}

/// Compute limited bilinear slopes over `target`.
///
/// Pure function of its inputs: repeated calls on unmodified data produce
/// identical output.
///
/// # Arguments
/// * `s` - State field; must cover `target` grown by two cells.
/// * `comp` - Component of `s` to operate on.
/// * `target` - Cell box the slope field is produced on.
/// * `geom` - Grid geometry (only the spacing is used here).
/// * `config` - Limiter toggle and tolerance.
///
/// # Panics
/// Panics if `s` does not cover the stencil footprint of `target`.
pub fn compute_slopes(
    s: &ScalarField2D,
    comp: usize,
    target: IndexBox,
    geom: &Geometry2D,
    config: &SlopeConfig,
) -> SlopeField2D {
    assert!(
        s.bounds().contains_box(&target.grow(2)),
        "state bounds {:?} too small for slope box {:?} (need two ghost cells)",
        s.bounds(),
        target
    );

    let hx = geom.spacing(Axis::X);
    let hy = geom.spacing(Axis::Y);
    let corners = interpolate_corner_box(s, comp, target.corners());

    let mut slopes = SlopeField2D::new(target);
    for j in target.lo[1]..=target.hi[1] {
        for i in target.lo[0]..=target.hi[0] {
            slopes.set(i, j, slopes_at(s, comp, &corners, i, j, hx, hy, config));
        }
    }
    slopes
}

/// Row-parallel variant of [`compute_slopes`].
///
/// Computes the same result; rows of the corner and slope fields are
/// disjoint write sets, so they are filled with a parallel-for over j.
#[cfg(feature = "parallel")]
pub fn compute_slopes_parallel(
    s: &ScalarField2D,
    comp: usize,
    target: IndexBox,
    geom: &Geometry2D,
    config: &SlopeConfig,
) -> SlopeField2D {
    use rayon::prelude::*;

    assert!(
        s.bounds().contains_box(&target.grow(2)),
        "state bounds {:?} too small for slope box {:?} (need two ghost cells)",
        s.bounds(),
        target
    );

    let hx = geom.spacing(Axis::X);
    let hy = geom.spacing(Axis::Y);

    let corner_box = target.corners();
    let mut corners = ScalarField2D::new(corner_box, 1);
    let row = corners.row_len();
    corners
        .data_mut()
        .par_chunks_mut(row)
        .enumerate()
        .for_each(|(dj, row)| {
            let j = corner_box.lo[1] + dj as i32;
            for (di, out) in row.iter_mut().enumerate() {
                *out = corner_value(s, comp, corner_box.lo[0] + di as i32, j);
            }
        });

    let mut slopes = SlopeField2D::new(target);
    let row = slopes.row_len();
    slopes
        .data_mut()
        .par_chunks_mut(row)
        .enumerate()
        .for_each(|(dj, row)| {
            let j = target.lo[1] + dj as i32;
            for (di, out) in row.chunks_exact_mut(3).enumerate() {
                let i = target.lo[0] + di as i32;
                let coeffs = slopes_at(s, comp, &corners, i, j, hx, hy, config);
                out.copy_from_slice(&coeffs);
            }
        });
    slopes
}
