//! Integration tests for the BDS edge-state kernels.
//!
//! These tests exercise the public API end to end:
//! - Analytic slope recovery and limiter guarantees on full patches
//! - Edge-state reconstruction against hand-derived values
//! - Symmetry of the axis-parameterized reconstruction under transposition
//! - The conservative-form-only guard
//! - Transverse boundary correction

use approx::assert_relative_eq;
use bds_rs::{
    apply_transverse_bc, compute_edge_states, compute_edge_states_with_slopes, compute_slopes,
    extrapolate_corners, Axis, BdsError, BoundaryKind, EdgeStateConfig, EdgeStateInputs,
    FaceField2D, Geometry2D, IndexBox, ScalarField2D, SlopeConfig, TransversePair,
};

const H: f64 = 0.125;
const DT: f64 = 0.03;

fn geometry(n: i32) -> Geometry2D {
    Geometry2D::new(IndexBox::new([0, 0], [n - 1, n - 1]), [H, H])
}

/// Deterministic rough data, different in every cell.
fn rough(i: i32, j: i32) -> f64 {
    (1.9 * i as f64).sin() * (0.7 * j as f64).cos() * 4.0 + (i - j) as f64 * 0.1
}

struct Problem {
    state: ScalarField2D,
    umac: FaceField2D,
    vmac: FaceField2D,
    forcing: ScalarField2D,
    divu: ScalarField2D,
    geom: Geometry2D,
}

impl Problem {
    fn new<S, U, V>(n: i32, mut s: S, u: U, v: V) -> Self
    where
        S: FnMut(i32, i32) -> f64,
        U: FnMut(i32, i32) -> f64,
        V: FnMut(i32, i32) -> f64,
    {
        let geom = geometry(n);
        let valid = geom.cell_box();
        Self {
            state: ScalarField2D::from_fn(valid.grow(3), 1, |i, j, _| s(i, j)),
            umac: FaceField2D::from_fn(Axis::X, valid.grow(1), u),
            vmac: FaceField2D::from_fn(Axis::Y, valid.grow(1), v),
            forcing: ScalarField2D::new(valid.grow(1), 1),
            divu: ScalarField2D::new(valid.grow(1), 1),
            geom,
        }
    }

    fn inputs(&self) -> EdgeStateInputs<'_> {
        EdgeStateInputs {
            state: &self.state,
            comp: 0,
            umac: &self.umac,
            vmac: &self.vmac,
            forcing: &self.forcing,
            forcing_comp: 0,
            divu: &self.divu,
        }
    }
}

#[test]
fn slopes_recover_gradient_of_bilinear_data() {
    let geom = geometry(12);
    let target = geom.cell_box();
    let s = ScalarField2D::from_fn(target.grow(2), 1, |i, j, _| {
        let x = (i as f64 + 0.5) * H;
        let y = (j as f64 + 0.5) * H;
        0.5 - 1.5 * x + 2.5 * y + 2.0 * x * y
    });

    let slopes = compute_slopes(&s, 0, target, &geom, &SlopeConfig::default());
    for j in target.lo[1]..=target.hi[1] {
        for i in target.lo[0]..=target.hi[0] {
            let x = (i as f64 + 0.5) * H;
            let y = (j as f64 + 0.5) * H;
            let [sx, sy, sxy] = slopes.get(i, j);
            assert_relative_eq!(sx, -1.5 + 2.0 * y, epsilon = 1e-11);
            assert_relative_eq!(sy, 2.5 + 2.0 * x, epsilon = 1e-11);
            assert_relative_eq!(sxy, 2.0, epsilon = 1e-10);
        }
    }
}

#[test]
fn limited_slopes_conserve_and_bound_rough_data() {
    let geom = geometry(16);
    let target = geom.cell_box();
    let s = ScalarField2D::from_fn(target.grow(2), 1, |i, j, _| rough(i, j));

    let slopes = compute_slopes(&s, 0, target, &geom, &SlopeConfig::default());
    for j in target.lo[1]..=target.hi[1] {
        for i in target.lo[0]..=target.hi[0] {
            let cell = s.get(i, j, 0);
            let sc = extrapolate_corners(cell, H, H, slopes.get(i, j));

            // Conservation of the cell average.
            let avg = 0.25 * (sc[0] + sc[1] + sc[2] + sc[3]);
            assert!((avg - cell).abs() < 1e-8);

            // No corner outside the range of the cells sharing it,
            // checked in the fixed (++, +-, -+, --) corner order.
            for (m, (di, dj)) in [(1, 1), (1, -1), (-1, 1), (-1, -1)].into_iter().enumerate() {
                let quad = [
                    cell,
                    s.get(i + di, j, 0),
                    s.get(i, j + dj, 0),
                    s.get(i + di, j + dj, 0),
                ];
                let lo = quad.iter().cloned().fold(f64::INFINITY, f64::min);
                let hi = quad.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                assert!(
                    sc[m] >= lo - 1e-12 && sc[m] <= hi + 1e-12,
                    "corner {m} at ({i}, {j}) escaped [{lo}, {hi}]: {}",
                    sc[m]
                );
            }
        }
    }
}

#[test]
fn uniform_advection_reproduces_upwind_value() {
    let problem = Problem::new(10, |_, _| 3.5, |_, _| 1.0, |_, _| 0.0);
    let (xedge, yedge) =
        compute_edge_states(&problem.inputs(), &problem.geom, &EdgeStateConfig::new(DT)).unwrap();

    let xf = xedge.bounds();
    for j in xf.lo[1]..=xf.hi[1] {
        for i in xf.lo[0]..=xf.hi[0] {
            assert_relative_eq!(xedge.get(i, j), 3.5, epsilon = 1e-13);
        }
    }
    let yf = yedge.bounds();
    for j in yf.lo[1]..=yf.hi[1] {
        for i in yf.lo[0]..=yf.hi[0] {
            assert_relative_eq!(yedge.get(i, j), 3.5, epsilon = 1e-13);
        }
    }
}

#[test]
fn linear_profile_gets_analytic_half_step_correction() {
    let (a, b) = (1.0, -2.0);
    let problem = Problem::new(
        10,
        move |i, _| a + b * (i as f64 + 0.5) * H,
        |_, _| 1.0,
        |_, _| 0.0,
    );
    let (xedge, _) =
        compute_edge_states(&problem.inputs(), &problem.geom, &EdgeStateConfig::new(DT)).unwrap();

    let xf = xedge.bounds();
    for j in xf.lo[1]..=xf.hi[1] {
        for i in xf.lo[0]..=xf.hi[0] {
            let expected = a + b * (i as f64 * H) - 0.5 * b * DT;
            assert_relative_eq!(xedge.get(i, j), expected, epsilon = 1e-12);
        }
    }
}

#[test]
fn reconstruction_is_symmetric_under_transposition() {
    // The x- and y-face passes are one routine under an axis permutation,
    // so transposing every input must exactly transpose the outputs.
    let n = 12;
    let problem = Problem::new(
        n,
        |i, j| rough(i, j),
        |i, j| (0.4 * (i + 2 * j) as f64).sin(),
        |i, j| (0.3 * (2 * i - j) as f64).cos(),
    );
    let transposed = {
        let mut p = Problem::new(
            n,
            |i, j| rough(j, i),
            |i, j| (0.3 * (2 * j - i) as f64).cos(),
            |i, j| (0.4 * (j + 2 * i) as f64).sin(),
        );
        p.forcing = ScalarField2D::from_fn(p.forcing.bounds(), 1, |i, j, _| (j - i) as f64 * 0.2);
        p.divu = ScalarField2D::from_fn(p.divu.bounds(), 1, |i, j, _| (i * j) as f64 * 0.01);
        p
    };
    let mut problem = problem;
    problem.forcing =
        ScalarField2D::from_fn(problem.forcing.bounds(), 1, |i, j, _| (i - j) as f64 * 0.2);
    problem.divu =
        ScalarField2D::from_fn(problem.divu.bounds(), 1, |i, j, _| (i * j) as f64 * 0.01);

    let config = EdgeStateConfig::new(DT);
    let (xedge, yedge) = compute_edge_states(&problem.inputs(), &problem.geom, &config).unwrap();
    let (xedge_t, yedge_t) =
        compute_edge_states(&transposed.inputs(), &transposed.geom, &config).unwrap();

    // Not bitwise: summation order inside the corner stencil differs
    // under transposition.
    let xf = xedge.bounds();
    for j in xf.lo[1]..=xf.hi[1] {
        for i in xf.lo[0]..=xf.hi[0] {
            assert_relative_eq!(
                xedge.get(i, j),
                yedge_t.get(j, i),
                epsilon = 1e-10,
                max_relative = 1e-9
            );
        }
    }
    let yf = yedge.bounds();
    for j in yf.lo[1]..=yf.hi[1] {
        for i in yf.lo[0]..=yf.hi[0] {
            assert_relative_eq!(
                yedge.get(i, j),
                xedge_t.get(j, i),
                epsilon = 1e-10,
                max_relative = 1e-9
            );
        }
    }
}

#[test]
fn convective_form_fails_fast() {
    let problem = Problem::new(8, |_, _| 1.0, |_, _| 1.0, |_, _| 0.0);
    let config = EdgeStateConfig {
        conservative: false,
        ..EdgeStateConfig::new(DT)
    };
    assert_eq!(
        compute_edge_states(&problem.inputs(), &problem.geom, &config),
        Err(BdsError::ConvectiveFormUnsupported)
    );

    // Same guard on the slope-reuse entry point.
    let slopes = compute_slopes(
        &problem.state,
        0,
        problem.geom.cell_box().grow(1),
        &problem.geom,
        &SlopeConfig::default(),
    );
    assert!(
        compute_edge_states_with_slopes(&problem.inputs(), &slopes, &problem.geom, &config)
            .is_err()
    );
}

#[test]
fn slope_reuse_is_equivalent_and_idempotent() {
    let problem = Problem::new(
        10,
        |i, j| rough(i, j),
        |i, j| ((i + j) % 3) as f64 - 1.0,
        |i, j| ((i * j) % 4) as f64 * 0.5 - 1.0,
    );
    let config = EdgeStateConfig::new(DT);

    let slopes_a = compute_slopes(
        &problem.state,
        0,
        problem.geom.cell_box().grow(1),
        &problem.geom,
        &config.slopes,
    );
    let slopes_b = compute_slopes(
        &problem.state,
        0,
        problem.geom.cell_box().grow(1),
        &problem.geom,
        &config.slopes,
    );

    let (ax, ay) = compute_edge_states(&problem.inputs(), &problem.geom, &config).unwrap();
    let (bx, by) =
        compute_edge_states_with_slopes(&problem.inputs(), &slopes_a, &problem.geom, &config)
            .unwrap();

    let sb = slopes_a.bounds();
    for j in sb.lo[1]..=sb.hi[1] {
        for i in sb.lo[0]..=sb.hi[0] {
            assert_eq!(slopes_a.get(i, j), slopes_b.get(i, j));
        }
    }
    let xf = ax.bounds();
    for j in xf.lo[1]..=xf.hi[1] {
        for i in xf.lo[0]..=xf.hi[0] {
            assert_eq!(ax.get(i, j), bx.get(i, j));
        }
    }
    let yf = ay.bounds();
    for j in yf.lo[1]..=yf.hi[1] {
        for i in yf.lo[0]..=yf.hi[0] {
            assert_eq!(ay.get(i, j), by.get(i, j));
        }
    }
}

#[test]
fn reflect_odd_boundary_zeroes_transverse_pair() {
    let state = ScalarField2D::from_fn(IndexBox::new([-1, -1], [8, 8]), 1, |i, j, _| {
        rough(i, j)
    });

    for axis in [Axis::X, Axis::Y] {
        for value in [-3.0, 0.0, 17.5] {
            let mut pair = TransversePair {
                lo: value,
                hi: -value,
            };
            let index = axis.cell(0, 4);
            apply_transverse_bc(
                axis,
                index,
                0,
                &state,
                &mut pair,
                BoundaryKind::ReflectOdd,
                BoundaryKind::Interior,
                0,
                7,
                true,
            );
            assert_eq!(pair, TransversePair { lo: 0.0, hi: 0.0 });
        }
    }
}

#[test]
fn dirichlet_boundary_pins_aligned_velocity() {
    let state = ScalarField2D::from_fn(IndexBox::new([-1, -1], [8, 8]), 1, |i, j, _| {
        if i < 0 { -2.5 } else { rough(i, j) }
    });

    // A non-velocity component keeps its interior-side extrapolation.
    let mut pair = TransversePair { lo: 1.0, hi: 2.0 };
    apply_transverse_bc(
        Axis::X,
        [0, 3],
        0,
        &state,
        &mut pair,
        BoundaryKind::ExtDir,
        BoundaryKind::Interior,
        0,
        7,
        false,
    );
    assert_eq!(pair, TransversePair { lo: -2.5, hi: 2.0 });

    // The axis-aligned velocity is pinned on both sides.
    let mut pair = TransversePair { lo: 1.0, hi: 2.0 };
    apply_transverse_bc(
        Axis::X,
        [0, 3],
        0,
        &state,
        &mut pair,
        BoundaryKind::ExtDir,
        BoundaryKind::Interior,
        0,
        7,
        true,
    );
    assert_eq!(pair, TransversePair { lo: -2.5, hi: -2.5 });
}

#[cfg(feature = "parallel")]
#[test]
fn parallel_pipeline_matches_serial() {
    use bds_rs::compute_edge_states_parallel;

    let problem = Problem::new(
        16,
        |i, j| rough(i, j),
        |i, j| (0.4 * (i + 2 * j) as f64).sin(),
        |i, j| (0.3 * (2 * i - j) as f64).cos(),
    );
    let config = EdgeStateConfig::new(DT);
    let (ax, ay) = compute_edge_states(&problem.inputs(), &problem.geom, &config).unwrap();
    let (bx, by) = compute_edge_states_parallel(&problem.inputs(), &problem.geom, &config).unwrap();

    let xf = ax.bounds();
    for j in xf.lo[1]..=xf.hi[1] {
        for i in xf.lo[0]..=xf.hi[0] {
            assert_eq!(ax.get(i, j), bx.get(i, j));
        }
    }
    let yf = ay.bounds();
    for j in yf.lo[1]..=yf.hi[1] {
        for i in yf.lo[0]..=yf.hi[0] {
            assert_eq!(ay.get(i, j), by.get(i, j));
        }
    }
}
