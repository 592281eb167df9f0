//! Constrained Nelder-Mead simplex search (spec §4.9): the fallback used
//! when [`crate::refloc::ref_loc_newton`]'s Newton iteration fails to converge,
//! e.g. for a badly skewed or near-degenerate element. Derivative-free, so
//! the box constraint `[-1, 1]^3` is enforced with a barrier term added to
//! the objective rather than a projection step.
use oga_base::cgmath64::Point3;

use crate::element::Element;
use crate::refloc::RefLoc;

const REFLECT: f64 = 1.0;
const EXPAND: f64 = 2.0;
const CONTRACT: f64 = 0.5;
const SHRINK: f64 = 0.5;

#[derive(Debug, Clone, Copy)]
pub struct NelderMeadConfig {
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        NelderMeadConfig { max_iter: 200, tol: 2e-8 }
    }
}

/// A regular simplex of `dim + 1` vertices with every edge of length
/// `edge`, one vertex at the origin (spec §4.9: "a regular simplex of
/// edge length 0.75 (2-D) or 0.3 (3-D) centered on the origin"). Standard
/// construction (Spendley, Hext & Himsworth 1962).
fn regular_simplex(dim: usize, edge: f64) -> Vec<Vec<f64>> {
    let n = dim as f64;
    let c = edge / (n * 2f64.sqrt()) * ((n + 1.0).sqrt() - 1.0);
    let b = c + edge / 2f64.sqrt();
    let mut simplex = vec![vec![0.0; dim]];
    for i in 0..dim {
        let mut p = vec![c; dim];
        p[i] = b;
        simplex.push(p);
    }
    simplex
}

/// Adds a quadratic penalty for any component outside `[-bound, bound]`,
/// turning a box-constrained search into an unconstrained one.
fn barrier_penalty(x: &[f64], bound: f64) -> f64 {
    x.iter()
        .map(|&xi| {
            if xi > bound {
                (xi - bound).powi(2) * 1e4
            } else if xi < -bound {
                (xi + bound).powi(2) * 1e4
            } else {
                0.0
            }
        })
        .sum()
}

/// Minimizes `f` (already including any barrier term) over an
/// `initial.len()`-dimensional regular simplex centered on the origin
/// (spec §4.9) — `initial`'s values are not themselves used as a starting
/// point, only its dimension. Returns the best point and its value.
pub fn minimize(f: impl Fn(&[f64]) -> f64, initial: &[f64], config: &NelderMeadConfig) -> (Vec<f64>, f64) {
    let dim = initial.len();
    let edge = if dim == 3 { 0.3 } else { 0.75 };
    let mut simplex = regular_simplex(dim, edge);
    let mut values: Vec<f64> = simplex.iter().map(|p| f(p)).collect();

    for _ in 0..config.max_iter {
        let mut order: Vec<usize> = (0..=dim).collect();
        order.sort_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap());
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        if values[0] < config.tol {
            break;
        }

        let centroid: Vec<f64> = (0..dim)
            .map(|d| simplex[..dim].iter().map(|p| p[d]).sum::<f64>() / dim as f64)
            .collect();
        let reflect = |point: &[f64], factor: f64| -> Vec<f64> {
            (0..dim).map(|d| centroid[d] + factor * (centroid[d] - point[d])).collect()
        };

        let worst = &simplex[dim];
        let xr = reflect(worst, REFLECT);
        let fr = f(&xr);

        if fr < values[0] {
            let xe = reflect(worst, EXPAND);
            let fe = f(&xe);
            if fe < fr {
                simplex[dim] = xe;
                values[dim] = fe;
            } else {
                simplex[dim] = xr;
                values[dim] = fr;
            }
            continue;
        }
        if fr < values[dim - 1] {
            simplex[dim] = xr;
            values[dim] = fr;
            continue;
        }

        let xc = reflect(worst, -CONTRACT);
        let fc = f(&xc);
        if fc < values[dim] {
            simplex[dim] = xc;
            values[dim] = fc;
            continue;
        }

        let best = simplex[0].clone();
        for i in 1..=dim {
            simplex[i] = (0..dim).map(|d| best[d] + SHRINK * (simplex[i][d] - best[d])).collect();
            values[i] = f(&simplex[i]);
        }
    }

    let best_idx = (0..=dim).min_by(|&a, &b| values[a].partial_cmp(&values[b]).unwrap()).unwrap();
    (simplex[best_idx].clone(), values[best_idx])
}

/// Falls back to a barrier-constrained Nelder-Mead search for the
/// reference coordinates of `target` inside `elem`, minimizing squared
/// physical distance. Used when Newton iteration does not converge.
pub fn locate(elem: &Element, target: Point3, initial: (f64, f64, f64)) -> RefLoc {
    let objective = |x: &[f64]| -> f64 {
        let penalty = barrier_penalty(x, 1.01);
        let residual = match elem.physical_point(x[0], x[1], x[2]) {
            Ok(p) => (p - target).x.powi(2) + (p - target).y.powi(2) + (p - target).z.powi(2),
            Err(_) => return f64::INFINITY,
        };
        residual + penalty
    };
    let (best, value) = minimize(objective, &[initial.0, initial.1, initial.2], &NelderMeadConfig::default());
    RefLoc { r: best[0].clamp(-1.01, 1.01), s: best[1].clamp(-1.01, 1.01), t: best[2].clamp(-1.01, 1.01), converged: value < NelderMeadConfig::default().tol }
}
