//! Reference-coordinate inversion: physical point -> `(r, s, t)` inside a
//! hex element (spec §4.6). A bespoke Newton variant, not a reuse of
//! [`oga_base::newton::solve`]: each step is clamped to `[-1.01, 1.01]`
//! (points are allowed to probe slightly outside the element before the
//! caller rejects them) and iteration stops early once the step stalls,
//! rather than only on convergence or trial-count exhaustion.
use oga_base::cgmath64::*;
use oga_base::linalg::{adj3, det3};

use crate::element::Element;

const MAX_TRIALS: usize = 20;
const CLAMP: f64 = 1.01;

/// Outcome of [`ref_loc_newton`]: the best reference coordinates found, and
/// whether Newton iteration converged to the element-scaled tolerance
/// (spec §4.6 step 1: `tol = 1e-10 * h`) before stalling or exhausting its
/// trial budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefLoc {
    pub r: f64,
    pub s: f64,
    pub t: f64,
    pub converged: bool,
}

fn clamp(x: f64) -> f64 {
    x.clamp(-CLAMP, CLAMP)
}

/// Finds `(r, s, t)` such that `elem.physical_point(r, s, t) == target`,
/// Newton-iterating from `initial` (defaulting to the element center).
pub fn ref_loc_newton(elem: &Element, target: Point3, initial: Option<(f64, f64, f64)>) -> RefLoc {
    ref_loc_newton_with_trials(elem, target, initial, MAX_TRIALS)
}

/// As [`ref_loc_newton`], with an explicit trial budget (spec §5's
/// `max_newton_trials` knob).
pub fn ref_loc_newton_with_trials(elem: &Element, target: Point3, initial: Option<(f64, f64, f64)>, max_trials: usize) -> RefLoc {
    let extent = elem.bounding_box().diagonal();
    let h = extent.x.min(extent.y).min(extent.z);
    let tol = 1e-10 * h;

    let (mut r, mut s, mut t) = initial.unwrap_or((0.0, 0.0, 0.0));
    let mut residual = match elem.physical_point(r, s, t) {
        Ok(p) => (p - target).magnitude2(),
        Err(_) => return RefLoc { r, s, t, converged: false },
    };
    let mut norm_prev = f64::INFINITY;

    for iter in 0..max_trials {
        if residual < tol * tol {
            return RefLoc { r, s, t, converged: true };
        }
        let Ok(p) = elem.physical_point(r, s, t) else {
            return RefLoc { r, s, t, converged: false };
        };
        let Ok(j) = elem.jacobian(r, s, t) else {
            return RefLoc { r, s, t, converged: false };
        };
        let det = det3(j);
        if det.abs() < oga_base::tolerance::TOLERANCE2 {
            return RefLoc { r, s, t, converged: false };
        }
        // J^-1 * v == adj(J) * v / det(J); avoids a second pass over J.
        let delta = (adj3(j) * (p - target)) / det;

        let new_r = clamp(r - delta.x);
        let new_s = clamp(s - delta.y);
        let new_t = clamp(t - delta.z);
        let norm = ((new_r - r).powi(2) + (new_s - s).powi(2) + (new_t - t).powi(2)).sqrt();

        let new_residual = match elem.physical_point(new_r, new_s, new_t) {
            Ok(np) => (np - target).magnitude2(),
            Err(_) => return RefLoc { r, s, t, converged: false },
        };

        r = new_r;
        s = new_s;
        t = new_t;

        // A step that isn't shrinking relative to the previous one (spec
        // §4.6 step 3d) means Newton has stalled, typically on a nearly
        // singular Jacobian; take what convergence check already applies.
        if iter > 1 && norm > 0.99 * norm_prev {
            let converged = new_residual < tol * tol;
            return RefLoc { r, s, t, converged };
        }
        norm_prev = norm;
        residual = new_residual;
    }
    RefLoc { r, s, t, converged: residual < tol * tol }
}

/// `true` if `(r, s, t)` lies within the reference element (unclamped
/// tolerance, `[-1, 1]` to within [`oga_base::tolerance::TOLERANCE`]).
pub fn is_inside_reference(r: f64, s: f64, t: f64) -> bool {
    let bound = 1.0 + oga_base::tolerance::TOLERANCE;
    r.abs() <= bound && s.abs() <= bound && t.abs() <= bound
}
