//! The crate's error type, following `truck-modeling`/`truck-geometry`'s
//! `errors.rs` pattern: a flat `thiserror`-derived enum plus a `Result` alias.
use thiserror::Error;

/// Result alias for fallible kernel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the geometric kernel.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    /// `nNodes` is not `(p+1)^d` for any polynomial order `p`, nor the
    /// 20-node serendipity exception in 3-D.
    #[error("node count {0} is not (p+1)^{1} for any polynomial order, nor the 20-node serendipity hex")]
    ShapeOrderMismatch(usize, usize),
    /// Volume quadrature found `det(J) < 0` at a quadrature point: the
    /// element is tangled or inverted.
    #[error("negative Jacobian determinant {0} at a quadrature point: element is tangled or inverted")]
    NegativeJacobian(f64),
    /// Newton iteration did not converge within its trial budget. Not fatal
    /// in the reference-coordinate solver or the classifier: both treat this
    /// as "point not inside" and continue with the last iterate.
    #[error("Newton iteration failed to converge within {0} trials")]
    NonConvergence(usize),
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn messages_render() {
        assert!(Error::ShapeOrderMismatch(7, 3).to_string().contains('7'));
        assert!(Error::NegativeJacobian(-0.5).to_string().contains("negative"));
        assert!(Error::NonConvergence(20).to_string().contains("20"));
    }
}
