//! Numeric foundation for the overset-grid assembly kernel: f64 cgmath
//! re-exports, tolerance traits, bounding boxes, and a small dense
//! linear-algebra kernel. Mirrors the role `truck-base` plays for
//! `truck-geotrait` in the teacher codebase this workspace is modeled on.

/// Redefines vectors, matrices and points with scalar = f64.
pub mod cgmath64;
/// Bounding boxes over cgmath point types.
pub mod bounding_box;
/// The crate's error type.
pub mod error;
/// Closed-form and generic determinant/adjoint.
pub mod linalg;
/// Floating-point tolerance traits.
pub mod tolerance;

pub use error::{Error, Result};
