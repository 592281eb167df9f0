//! 1-D Lagrange basis on an arbitrary (in this system, always uniform)
//! node set (spec §4.1). No tolerances: numerical breakdown if two nodes
//! coincide, which callers must not do, and callers must not pass `n < 2`.

/// The `n` uniformly-spaced nodes on `[-1, 1]` used throughout the shape
/// engine: `x[i] = -1 + 2i/(n-1)`.
pub fn uniform_nodes(n: usize) -> Vec<f64> {
    debug_assert!(n >= 2, "Lagrange basis needs at least 2 nodes");
    (0..n).map(|i| -1.0 + 2.0 * i as f64 / (n - 1) as f64).collect()
}

/// `L_m(y) = prod_{i != m} (y - x_i) / (x_m - x_i)`.
pub fn value(nodes: &[f64], m: usize, y: f64) -> f64 {
    nodes
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != m)
        .fold(1.0, |acc, (_, &xi)| acc * (y - xi) / (nodes[m] - xi))
}

/// `L'_m(y) = sum_{i != m} 1/(x_m - x_i) * prod_{j != m, j != i} (y - x_j)/(x_m - x_j)`.
pub fn derivative(nodes: &[f64], m: usize, y: f64) -> f64 {
    nodes
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != m)
        .fold(0.0, |acc, (i, &xi)| {
            let term = nodes
                .iter()
                .enumerate()
                .filter(|&(j, _)| j != m && j != i)
                .fold(1.0, |p, (_, &xj)| p * (y - xj) / (nodes[m] - xj));
            acc + term / (nodes[m] - xi)
        })
}

/// All `n` values of the uniform Lagrange basis at `y`, i.e. `shape_line`.
pub fn shape_line(y: f64, n: usize) -> Vec<f64> {
    let nodes = uniform_nodes(n);
    (0..n).map(|m| value(&nodes, m, y)).collect()
}

/// All `n` derivatives of the uniform Lagrange basis at `y`.
pub fn dshape_line(y: f64, n: usize) -> Vec<f64> {
    let nodes = uniform_nodes(n);
    (0..n).map(|m| derivative(&nodes, m, y)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kronecker_delta_at_nodes() {
        let nodes = uniform_nodes(4);
        for (m, &xm) in nodes.iter().enumerate() {
            for (k, &xk) in nodes.iter().enumerate() {
                let v = value(&nodes, m, xk);
                let want = if m == k { 1.0 } else { 0.0 };
                assert!((v - want).abs() < 1e-12, "L_{m}({xk}) = {v}, xm={xm}");
            }
        }
    }

    #[test]
    fn partition_of_unity() {
        for &y in &[-1.0, -0.3, 0.0, 0.4, 1.0] {
            let sum: f64 = shape_line(y, 5).iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn partition_of_derivatives_is_zero() {
        for &y in &[-0.9, 0.1, 0.8] {
            let sum: f64 = dshape_line(y, 6).iter().sum();
            assert!(sum.abs() < 1e-10);
        }
    }

    #[test]
    fn derivative_matches_finite_difference() {
        let nodes = uniform_nodes(5);
        let h = 1e-6;
        for m in 0..5 {
            let y = 0.37;
            let fd = (value(&nodes, m, y + h) - value(&nodes, m, y - h)) / (2.0 * h);
            let ana = derivative(&nodes, m, y);
            assert!((fd - ana).abs() < 1e-5, "m={m}: fd={fd}, ana={ana}");
        }
    }
}
