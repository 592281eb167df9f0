//! Gauss-Legendre volume quadrature for (possibly curved) hex elements
//! (spec §4.10). No direct teacher analogue in the retrieval pack; written
//! in the pack's general closed-form-table style (cf. the serendipity hex
//! shape tables in [`crate::shape`]) rather than a generic recursive rule
//! generator, since only 1-, 2- and 3-point rules are ever needed here.
use oga_base::{Error, Result};

use crate::element::Element;

/// `(points, weights)` of the `n`-point 1-D Gauss-Legendre rule on `[-1, 1]`,
/// for `n` in `1..=3`.
fn rule(n: usize) -> (&'static [f64], &'static [f64]) {
    match n {
        1 => (&[0.0], &[2.0]),
        2 => {
            const P: f64 = 0.5773502691896258; // 1/sqrt(3)
            (&[-P, P], &[1.0, 1.0])
        }
        3 => {
            const P: f64 = 0.7745966692414834; // sqrt(3/5)
            (&[-P, 0.0, P], &[0.5555555555555556, 0.8888888888888888, 0.5555555555555556])
        }
        _ => unreachable!("quadrature order must be 1, 2 or 3"),
    }
}

/// Integrates `det(J)` over the reference cube with an `n`-point-per-axis
/// tensor-product Gauss-Legendre rule, i.e. the element's physical volume.
/// Errors on any quadrature point where `det(J) < 0`: the element is
/// tangled or inverted (spec §4.10).
pub fn compute_volume(elem: &Element, n: usize) -> Result<f64> {
    let (pts, wts) = rule(n);
    let mut volume = 0.0;
    for (&r, &wr) in pts.iter().zip(wts) {
        for (&s, &ws) in pts.iter().zip(wts) {
            for (&t, &wt) in pts.iter().zip(wts) {
                let det = elem.jacobian_det(r, s, t)?;
                if det < 0.0 {
                    return Err(Error::NegativeJacobian(det));
                }
                volume += det * wr * ws * wt;
            }
        }
    }
    Ok(volume)
}

#[cfg(test)]
mod tests {
    use super::*;
    use oga_base::cgmath64::Point3;

    fn axis_aligned_hex(side: f64) -> Element {
        let h = side / 2.0;
        Element::new(vec![
            Point3::new(-h, -h, -h),
            Point3::new(h, -h, -h),
            Point3::new(h, h, -h),
            Point3::new(-h, h, -h),
            Point3::new(-h, -h, h),
            Point3::new(h, -h, h),
            Point3::new(h, h, h),
            Point3::new(-h, h, h),
        ])
    }

    #[test]
    fn axis_aligned_hex_volume_is_side_cubed() {
        for &n in &[1usize, 2, 3] {
            let vol = compute_volume(&axis_aligned_hex(2.5), n).unwrap();
            assert!((vol - 2.5_f64.powi(3)).abs() < 1e-9, "n={n} vol={vol}");
        }
    }

    #[test]
    fn inverted_hex_reports_negative_jacobian() {
        let mut nodes = axis_aligned_hex(1.0).nodes().to_vec();
        nodes.swap(0, 1); // flip one bottom edge: tangles the element
        let tangled = Element::new(nodes);
        assert!(matches!(compute_volume(&tangled, 2), Err(Error::NegativeJacobian(_))));
    }
}
