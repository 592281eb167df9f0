//! Tensor-product Lagrange shape functions on quads and hexes (spec §4.3),
//! evaluated in the external "gmsh" node order via [`crate::ordering`], plus
//! the 20-node serendipity hex as a closed-form special case (grounded on
//! the CalculiX C3D20 element in the retrieval pack: corners, then the 12
//! edge midside nodes, no interior node).
use oga_base::{Error, Result};

use crate::lagrange;
use crate::ordering;

pub use crate::lagrange::{dshape_line, shape_line};

fn permute(structured: &[f64], fwd: &[usize]) -> Vec<f64> {
    fwd.iter().map(|&s| structured[s]).collect()
}

fn permute2(structured: &[[f64; 2]], fwd: &[usize]) -> Vec<[f64; 2]> {
    fwd.iter().map(|&s| structured[s]).collect()
}

fn permute3(structured: &[[f64; 3]], fwd: &[usize]) -> Vec<[f64; 3]> {
    fwd.iter().map(|&s| structured[s]).collect()
}

/// The 8 non-center row-major positions of a 3x3 grid, as `(-1, 0, 1)`
/// natural coordinates, in the same order as [`ordering::gmsh_to_structured_quad`]'s
/// `n == 8` structured indexing.
fn serendipity_quad8_coords() -> [(f64, f64); 8] {
    let c = |idx: usize| idx as f64 - 1.0;
    [(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)]
        .map(|(i, j)| (c(i), c(j)))
}

fn shape_quad8_structured(r: f64, s: f64) -> [f64; 8] {
    let mut out = [0.0; 8];
    for (k, &(xi, eta)) in serendipity_quad8_coords().iter().enumerate() {
        out[k] = if xi != 0.0 && eta != 0.0 {
            0.25 * (1.0 + r * xi) * (1.0 + s * eta) * (r * xi + s * eta - 1.0)
        } else if xi == 0.0 {
            0.5 * (1.0 - r * r) * (1.0 + s * eta)
        } else {
            0.5 * (1.0 + r * xi) * (1.0 - s * s)
        };
    }
    out
}

fn dshape_quad8_structured(r: f64, s: f64) -> [[f64; 2]; 8] {
    let mut out = [[0.0; 2]; 8];
    for (k, &(xi, eta)) in serendipity_quad8_coords().iter().enumerate() {
        out[k] = if xi != 0.0 && eta != 0.0 {
            let dr = 0.25 * xi * (1.0 + s * eta) * (2.0 * r * xi + s * eta);
            let ds = 0.25 * eta * (1.0 + r * xi) * (r * xi + 2.0 * s * eta);
            [dr, ds]
        } else if xi == 0.0 {
            [-r * (1.0 + s * eta), 0.5 * (1.0 - r * r) * eta]
        } else {
            [0.5 * xi * (1.0 - s * s), -(1.0 + r * xi) * s]
        };
    }
    out
}

/// Natural coordinates of the 20 serendipity hex nodes, in gmsh/Abaqus
/// C3D20 order: 8 corners, 4 bottom midedges, 4 vertical midedges, 4 top
/// midedges.
fn serendipity_hex20_coords() -> [(f64, f64, f64); 20] {
    [
        (-1.0, -1.0, -1.0),
        (1.0, -1.0, -1.0),
        (1.0, 1.0, -1.0),
        (-1.0, 1.0, -1.0),
        (-1.0, -1.0, 1.0),
        (1.0, -1.0, 1.0),
        (1.0, 1.0, 1.0),
        (-1.0, 1.0, 1.0),
        (0.0, -1.0, -1.0),
        (1.0, 0.0, -1.0),
        (0.0, 1.0, -1.0),
        (-1.0, 0.0, -1.0),
        (-1.0, -1.0, 0.0),
        (1.0, -1.0, 0.0),
        (1.0, 1.0, 0.0),
        (-1.0, 1.0, 0.0),
        (0.0, -1.0, 1.0),
        (1.0, 0.0, 1.0),
        (0.0, 1.0, 1.0),
        (-1.0, 0.0, 1.0),
    ]
}

fn shape_hex20(r: f64, s: f64, t: f64) -> [f64; 20] {
    let mut out = [0.0; 20];
    for (k, &(xi, eta, zeta)) in serendipity_hex20_coords().iter().enumerate() {
        let zeros = [xi, eta, zeta].iter().filter(|&&c| c == 0.0).count();
        out[k] = if zeros == 0 {
            0.125
                * (1.0 + r * xi)
                * (1.0 + s * eta)
                * (1.0 + t * zeta)
                * (r * xi + s * eta + t * zeta - 2.0)
        } else if xi == 0.0 {
            0.25 * (1.0 - r * r) * (1.0 + s * eta) * (1.0 + t * zeta)
        } else if eta == 0.0 {
            0.25 * (1.0 + r * xi) * (1.0 - s * s) * (1.0 + t * zeta)
        } else {
            0.25 * (1.0 + r * xi) * (1.0 + s * eta) * (1.0 - t * t)
        };
    }
    out
}

fn dshape_hex20(r: f64, s: f64, t: f64) -> [[f64; 3]; 20] {
    let mut out = [[0.0; 3]; 20];
    for (k, &(xi, eta, zeta)) in serendipity_hex20_coords().iter().enumerate() {
        let zeros = [xi, eta, zeta].iter().filter(|&&c| c == 0.0).count();
        out[k] = if zeros == 0 {
            let a = 1.0 + r * xi;
            let b = 1.0 + s * eta;
            let c = 1.0 + t * zeta;
            let lin = r * xi + s * eta + t * zeta - 2.0;
            [
                0.125 * xi * b * c * (lin + a),
                0.125 * eta * a * c * (lin + b),
                0.125 * zeta * a * b * (lin + c),
            ]
        } else if xi == 0.0 {
            let b = 1.0 + s * eta;
            let c = 1.0 + t * zeta;
            [-0.5 * r * b * c, 0.25 * (1.0 - r * r) * eta * c, 0.25 * (1.0 - r * r) * b * zeta]
        } else if eta == 0.0 {
            let a = 1.0 + r * xi;
            let c = 1.0 + t * zeta;
            [0.25 * xi * (1.0 - s * s) * c, -0.5 * s * a * c, 0.25 * a * (1.0 - s * s) * zeta]
        } else {
            let a = 1.0 + r * xi;
            let b = 1.0 + s * eta;
            [0.25 * xi * b * (1.0 - t * t), 0.25 * a * eta * (1.0 - t * t), -0.5 * t * a * b]
        };
    }
    out
}

/// `n` shape function values at `(r, s)`, in external (gmsh) node order.
pub fn shape_quad(r: f64, s: f64, n: usize) -> Result<Vec<f64>> {
    if n == 8 {
        let structured = shape_quad8_structured(r, s);
        let fwd = ordering::gmsh_to_structured_quad(n)?;
        return Ok(permute(&structured, &fwd));
    }
    let side = crate::ordering::quad_side(n)?;
    let ls = lagrange::shape_line(r, side);
    let lt = lagrange::shape_line(s, side);
    let structured: Vec<f64> = (0..side * side).map(|idx| ls[idx % side] * lt[idx / side]).collect();
    let fwd = ordering::gmsh_to_structured_quad(n)?;
    Ok(permute(&structured, &fwd))
}

/// `(dN/dr, dN/ds)` for all `n` quad shape functions, external node order.
pub fn dshape_quad(r: f64, s: f64, n: usize) -> Result<Vec<[f64; 2]>> {
    if n == 8 {
        let structured = dshape_quad8_structured(r, s);
        let fwd = ordering::gmsh_to_structured_quad(n)?;
        return Ok(permute2(&structured, &fwd));
    }
    let side = crate::ordering::quad_side(n)?;
    let ls = lagrange::shape_line(r, side);
    let lt = lagrange::shape_line(s, side);
    let dls = lagrange::dshape_line(r, side);
    let dlt = lagrange::dshape_line(s, side);
    let structured: Vec<[f64; 2]> = (0..side * side)
        .map(|idx| {
            let (i, j) = (idx % side, idx / side);
            [dls[i] * lt[j], ls[i] * dlt[j]]
        })
        .collect();
    let fwd = ordering::gmsh_to_structured_quad(n)?;
    Ok(permute2(&structured, &fwd))
}

/// `n` shape function values at `(r, s, t)`, in external (gmsh) node order.
pub fn shape_hex(r: f64, s: f64, t: f64, n: usize) -> Result<Vec<f64>> {
    if n == 20 {
        return Ok(shape_hex20(r, s, t).to_vec());
    }
    let side = crate::ordering::hex_side(n)?;
    let lr = lagrange::shape_line(r, side);
    let ls = lagrange::shape_line(s, side);
    let lt = lagrange::shape_line(t, side);
    let structured: Vec<f64> = (0..side * side * side)
        .map(|idx| {
            let i = idx % side;
            let j = (idx / side) % side;
            let k = idx / (side * side);
            lr[i] * ls[j] * lt[k]
        })
        .collect();
    let fwd = ordering::gmsh_to_structured_hex(n)?;
    Ok(permute(&structured, &fwd))
}

/// `(dN/dr, dN/ds, dN/dt)` for all `n` hex shape functions, external node order.
pub fn dshape_hex(r: f64, s: f64, t: f64, n: usize) -> Result<Vec<[f64; 3]>> {
    if n == 20 {
        return Ok(dshape_hex20(r, s, t).to_vec());
    }
    let side = crate::ordering::hex_side(n)?;
    let lr = lagrange::shape_line(r, side);
    let ls = lagrange::shape_line(s, side);
    let lt = lagrange::shape_line(t, side);
    let dlr = lagrange::dshape_line(r, side);
    let dls = lagrange::dshape_line(s, side);
    let dlt = lagrange::dshape_line(t, side);
    let structured: Vec<[f64; 3]> = (0..side * side * side)
        .map(|idx| {
            let i = idx % side;
            let j = (idx / side) % side;
            let k = idx / (side * side);
            [dlr[i] * ls[j] * lt[k], lr[i] * dls[j] * lt[k], lr[i] * ls[j] * dlt[k]]
        })
        .collect();
    let fwd = ordering::gmsh_to_structured_hex(n)?;
    Ok(permute3(&structured, &fwd))
}

/// Rejects node counts that are neither `(p+1)^2`/`(p+1)^3` nor a
/// recognised serendipity exception.
pub fn validate_node_count(n: usize, dims: u32) -> Result<()> {
    let side_ok = match dims {
        2 => crate::ordering::quad_side(n).is_ok(),
        3 => crate::ordering::hex_side(n).is_ok(),
        _ => unreachable!(),
    };
    if side_ok || (dims == 2 && n == 8) || (dims == 3 && n == 20) {
        Ok(())
    } else {
        Err(Error::ShapeOrderMismatch(n, dims as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_of_unity_quad() {
        for n in [4usize, 9, 16, 8] {
            for &(r, s) in &[(-1.0, -1.0), (0.3, -0.7), (0.0, 0.0), (1.0, 1.0)] {
                let sum: f64 = shape_quad(r, s, n).unwrap().iter().sum();
                assert!((sum - 1.0).abs() < 1e-10, "n={n} r={r} s={s} sum={sum}");
            }
        }
    }

    #[test]
    fn partition_of_unity_hex() {
        for n in [8usize, 27, 20] {
            for &(r, s, t) in &[(-1.0, -1.0, -1.0), (0.2, -0.4, 0.6), (1.0, 1.0, 1.0)] {
                let sum: f64 = shape_hex(r, s, t, n).unwrap().iter().sum();
                assert!((sum - 1.0).abs() < 1e-9, "n={n} sum={sum}");
            }
        }
    }

    #[test]
    fn partition_of_derivatives_is_zero_quad() {
        for n in [9usize, 8] {
            for &(r, s) in &[(-0.3, 0.5), (0.0, 0.0)] {
                let d = dshape_quad(r, s, n).unwrap();
                let dr: f64 = d.iter().map(|p| p[0]).sum();
                let ds: f64 = d.iter().map(|p| p[1]).sum();
                assert!(dr.abs() < 1e-9 && ds.abs() < 1e-9, "n={n} dr={dr} ds={ds}");
            }
        }
    }

    #[test]
    fn partition_of_derivatives_is_zero_hex() {
        for n in [27usize, 20] {
            let d = dshape_hex(0.1, -0.2, 0.3, n).unwrap();
            let dr: f64 = d.iter().map(|p| p[0]).sum();
            let ds: f64 = d.iter().map(|p| p[1]).sum();
            let dt: f64 = d.iter().map(|p| p[2]).sum();
            assert!(dr.abs() < 1e-9 && ds.abs() < 1e-9 && dt.abs() < 1e-9, "n={n}");
        }
    }

    #[test]
    fn kronecker_delta_structured_quad9() {
        let nodes = lagrange::uniform_nodes(3);
        let fwd = ordering::gmsh_to_structured_quad(9).unwrap();
        for (ext, &structured_idx) in fwd.iter().enumerate() {
            let i = structured_idx % 3;
            let j = structured_idx / 3;
            let values = shape_quad(nodes[i], nodes[j], 9).unwrap();
            for (k, &v) in values.iter().enumerate() {
                let want = if k == ext { 1.0 } else { 0.0 };
                assert!((v - want).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn rejects_non_tensor_node_count() {
        assert!(validate_node_count(7, 2).is_err());
        assert!(validate_node_count(9, 2).is_ok());
        assert!(validate_node_count(20, 3).is_ok());
    }
}
