//! Unsplit Godunov edge-state reconstruction (BDS).
//!
//! For each face, the transported scalar arriving at the face over a half
//! time step is estimated from the upwind ("donor") cell's limited bilinear
//! reconstruction, with a transverse-advection ("Gamma") correction folded
//! into the same unsplit update. Each Gamma term is a second-order Taylor
//! backtrace of the reconstruction toward the face corner it is advected
//! from; their difference, scaled by the transverse velocity, accounts for
//! transverse shear without a separate dimensional sweep.
//!
//! The x- and y-face passes are mirror images under swapping the index
//! roles, so a single routine handles both, parameterized by [`Axis`]:
//! the normal direction is the face axis, the transverse direction the
//! other one.
//!
//! Only the conservative (divergence) form is supported in 2D; requesting
//! the convective form is a fatal configuration error reported before any
//! output is produced.

use crate::error::BdsError;
use crate::field::{FaceField2D, ScalarField2D, SlopeField2D};
use crate::grid::{Axis, Geometry2D};
use crate::slopes::{compute_slopes, SlopeConfig};

/// Read-only inputs to the edge-state reconstruction.
///
/// All fields are borrowed from the caller; ghost regions must be filled
/// before the call (a precondition, not enforced here).
#[derive(Clone, Copy)]
pub struct EdgeStateInputs<'a> {
    /// Transported state; must cover the valid box grown by three cells
    /// (one for donor/transverse offsets, two more for the slope stencil).
    pub state: &'a ScalarField2D,
    /// Component of `state` to reconstruct.
    pub comp: usize,
    /// Signed normal velocities on x-faces, covering the valid box grown
    /// by one cell.
    pub umac: &'a FaceField2D,
    /// Signed normal velocities on y-faces, covering the valid box grown
    /// by one cell.
    pub vmac: &'a FaceField2D,
    /// Forcing field, sampled at the donor cell.
    pub forcing: &'a ScalarField2D,
    /// Component of `forcing` to use.
    pub forcing_comp: usize,
    /// Cell-centered velocity divergence, sampled at the donor cell for
    /// the conservative source correction.
    pub divu: &'a ScalarField2D,
}

/// Configuration for the edge-state reconstruction.
#[derive(Clone, Copy, Debug)]
pub struct EdgeStateConfig {
    /// Time step.
    pub dt: f64,
    /// Conservative (divergence) form. The 2D reconstruction supports only
    /// `true`; `false` is a fatal configuration error.
    pub conservative: bool,
    /// Slope estimator configuration.
    pub slopes: SlopeConfig,
}

impl EdgeStateConfig {
    /// Conservative-form configuration with default limiting.
    pub fn new(dt: f64) -> Self {
        Self {
            dt,
            conservative: true,
            slopes: SlopeConfig::default(),
        }
    }
}

/// Reconstructed state at one face of `axis`.
///
/// `face_n`/`face_t` are the face index components in (normal, transverse)
/// roles; the slope field must cover the valid box grown by one cell.
#[allow(clippy::too_many_arguments)]
fn edge_state_at(
    axis: Axis,
    face_n: i32,
    face_t: i32,
    inputs: &EdgeStateInputs<'_>,
    slopes: &SlopeField2D,
    hn: f64,
    ht: f64,
    dt: f64,
) -> f64 {
    let t_axis = axis.transverse();
    let (vel_n, vel_t) = match axis {
        Axis::X => (inputs.umac, inputs.vmac),
        Axis::Y => (inputs.vmac, inputs.umac),
    };

    // Normal-face velocity at (normal face n, transverse cell t).
    let un = |n: i32, t: i32| {
        let f = axis.cell(n, t);
        vel_n.get(f[0], f[1])
    };
    // Transverse-face velocity at (normal cell n, transverse face t).
    let ut = |n: i32, t: i32| {
        let f = axis.cell(n, t);
        vel_t.get(f[0], f[1])
    };
    let sval = |n: i32, t: i32| {
        let c = axis.cell(n, t);
        inputs.state.get(c[0], c[1], inputs.comp)
    };
    // Slope coefficients in (normal, transverse, cross) roles.
    let slope = |n: i32, t: i32| {
        let c = axis.cell(n, t);
        let coeffs = slopes.get(c[0], c[1]);
        (coeffs[axis.index()], coeffs[t_axis.index()], coeffs[2])
    };

    let gamma = |nup: i32,
                 tup: i32,
                 nsign: f64,
                 tsign: f64,
                 u1: f64,
                 u2: f64,
                 vv: f64| {
        let hns = hn * nsign;
        let hts = ht * tsign;
        let (sn, st, sxy) = slope(nup, tup);
        sval(nup, tup)
            + (0.5 * hns - (u1 + u2) * dt / 3.0) * sn
            + (0.5 * hts - vv * dt / 3.0) * st
            + (3.0 * hns * hts - 2.0 * (u1 + u2) * dt * hts - 2.0 * vv * hns * dt
                + vv * (2.0 * u2 + u1) * dt * dt)
                * sxy
                / 12.0
    };

    // Donor cell from the sign of the face-normal velocity. Strictly
    // positive selects the low side; zero ties break to the high side.
    let u1 = un(face_n, face_t);
    let (nup, nsign) = if u1 > 0.0 {
        (face_n - 1, 1.0)
    } else {
        (face_n, -1.0)
    };

    // Gamma plus: transverse advection through the high transverse face of
    // the donor cell.
    let gamp = {
        let vtrans = ut(nup, face_t + 1);
        let (tup, tsign, u2) = if vtrans > 0.0 {
            (face_t, 1.0, u1)
        } else {
            let opposite = un(face_n, face_t + 1);
            let u2 = if u1 * opposite > 0.0 { opposite } else { 0.0 };
            (face_t + 1, -1.0, u2)
        };
        gamma(nup, tup, nsign, tsign, u1, u2, vtrans)
    };

    // Gamma minus: through the low transverse face of the donor cell.
    let gamm = {
        let vtrans = ut(nup, face_t);
        let (tup, tsign, u2) = if vtrans > 0.0 {
            let opposite = un(face_n, face_t - 1);
            let u2 = if u1 * opposite > 0.0 { opposite } else { 0.0 };
            (face_t - 1, 1.0, u2)
        } else {
            (face_t, -1.0, u1)
        };
        gamma(nup, tup, nsign, tsign, u1, u2, vtrans)
    };

    // Transverse-flux-divergence correction.
    let vdif = 0.5 * dt * (ut(nup, face_t + 1) * gamp - ut(nup, face_t) * gamm) / ht;

    // Donor value extrapolated a half step toward the face.
    let (sn, _, _) = slope(nup, face_t);
    let stem = sval(nup, face_t) + (nsign * hn - u1 * dt) * 0.5 * sn;

    // Velocity-divergence correction and conservative source term.
    let vaddif = stem * 0.5 * dt * (un(nup + 1, face_t) - un(nup, face_t)) / hn;
    let donor = axis.cell(nup, face_t);
    let div = inputs.divu.get(donor[0], donor[1], 0);
    let force = inputs.forcing.get(donor[0], donor[1], inputs.forcing_comp);

    stem - vdif - vaddif + 0.5 * dt * stem * div + 0.5 * dt * force
}

fn check_input_bounds(inputs: &EdgeStateInputs<'_>, slopes: &SlopeField2D, geom: &Geometry2D) {
    let valid = geom.cell_box();
    assert_eq!(inputs.umac.axis(), Axis::X, "umac must hold x-face data");
    assert_eq!(inputs.vmac.axis(), Axis::Y, "vmac must hold y-face data");
    assert!(
        inputs.state.bounds().contains_box(&valid.grow(1)),
        "state must cover the valid box grown by one cell"
    );
    assert!(
        slopes.bounds().contains_box(&valid.grow(1)),
        "slopes must cover the valid box grown by one cell"
    );
    assert!(
        inputs.umac.bounds().contains_box(&valid.grow(1).faces(Axis::X))
            && inputs.vmac.bounds().contains_box(&valid.grow(1).faces(Axis::Y)),
        "face velocities must cover the valid box grown by one cell"
    );
    assert!(
        inputs.forcing.bounds().contains_box(&valid.grow(1))
            && inputs.divu.bounds().contains_box(&valid.grow(1)),
        "forcing and divergence must cover the valid box grown by one cell"
    );
}

fn reconstruct_axis(
    axis: Axis,
    inputs: &EdgeStateInputs<'_>,
    slopes: &SlopeField2D,
    geom: &Geometry2D,
    dt: f64,
) -> FaceField2D {
    let hn = geom.spacing(axis);
    let ht = geom.spacing(axis.transverse());
    let mut edges = FaceField2D::new(axis, geom.cell_box());
    let faces = edges.bounds();
    for j in faces.lo[1]..=faces.hi[1] {
        for i in faces.lo[0]..=faces.hi[0] {
            let idx = [i, j];
            let n = idx[axis.index()];
            let t = idx[axis.transverse().index()];
            edges.set(i, j, edge_state_at(axis, n, t, inputs, slopes, hn, ht, dt));
        }
    }
    edges
}

/// Compute BDS edge states on the x- and y-faces of the valid box.
///
/// Slopes are computed internally on the valid box grown by one cell; use
/// [`compute_edge_states_with_slopes`] to reuse a precomputed slope field.
///
/// # Errors
/// [`BdsError::ConvectiveFormUnsupported`] if `config.conservative` is
/// false. The error is returned before any output is allocated or written.
pub fn compute_edge_states(
    inputs: &EdgeStateInputs<'_>,
    geom: &Geometry2D,
    config: &EdgeStateConfig,
) -> Result<(FaceField2D, FaceField2D), BdsError> {
    if !config.conservative {
        return Err(BdsError::ConvectiveFormUnsupported);
    }
    let slopes = compute_slopes(
        inputs.state,
        inputs.comp,
        geom.cell_box().grow(1),
        geom,
        &config.slopes,
    );
    compute_edge_states_with_slopes(inputs, &slopes, geom, config)
}

/// Compute BDS edge states from a caller-provided slope field.
///
/// The slope field must cover the valid box grown by one cell and belong
/// to the same state component; reusing it across calls with unchanged
/// inputs gives identical edge states.
///
/// # Errors
/// [`BdsError::ConvectiveFormUnsupported`] if `config.conservative` is
/// false.
pub fn compute_edge_states_with_slopes(
    inputs: &EdgeStateInputs<'_>,
    slopes: &SlopeField2D,
    geom: &Geometry2D,
    config: &EdgeStateConfig,
) -> Result<(FaceField2D, FaceField2D), BdsError> {
    if !config.conservative {
        return Err(BdsError::ConvectiveFormUnsupported);
    }
    check_input_bounds(inputs, slopes, geom);

    let xedge = reconstruct_axis(Axis::X, inputs, slopes, geom, config.dt);
    let yedge = reconstruct_axis(Axis::Y, inputs, slopes, geom, config.dt);
    Ok((xedge, yedge))
}

/// Row-parallel variant of [`compute_edge_states`].
///
/// Each face row is a disjoint write set, so the per-axis passes are
/// parallel-for loops over the transverse index. Produces the same result
/// as the serial driver.
#[cfg(feature = "parallel")]
pub fn compute_edge_states_parallel(
    inputs: &EdgeStateInputs<'_>,
    geom: &Geometry2D,
    config: &EdgeStateConfig,
) -> Result<(FaceField2D, FaceField2D), BdsError> {
    use rayon::prelude::*;

    if !config.conservative {
        return Err(BdsError::ConvectiveFormUnsupported);
    }
    let slopes = crate::slopes::compute_slopes_parallel(
        inputs.state,
        inputs.comp,
        geom.cell_box().grow(1),
        geom,
        &config.slopes,
    );
    check_input_bounds(inputs, &slopes, geom);

    let reconstruct = |axis: Axis| {
        let hn = geom.spacing(axis);
        let ht = geom.spacing(axis.transverse());
        let mut edges = FaceField2D::new(axis, geom.cell_box());
        let faces = edges.bounds();
        let row = edges.row_len();
        edges
            .data_mut()
            .par_chunks_mut(row)
            .enumerate()
            .for_each(|(dj, row)| {
                let j = faces.lo[1] + dj as i32;
                for (di, value) in row.iter_mut().enumerate() {
                    let idx = [faces.lo[0] + di as i32, j];
                    let n = idx[axis.index()];
                    let t = idx[axis.transverse().index()];
                    *value = edge_state_at(axis, n, t, inputs, &slopes, hn, ht, config.dt);
                }
            });
        edges
    };
    Ok((reconstruct(Axis::X), reconstruct(Axis::Y)))
}
