//! The kernel's data model (spec §3): volume elements, cutting facets, and
//! the per-element classification accumulator.
use oga_base::cgmath64::*;
use oga_base::bounding_box::BoundingBox;
use oga_base::{Error, Result};

use crate::shape;

/// A single hexahedral (or, for 2-D work, quadrilateral) volume element:
/// physical node coordinates in external (gmsh) order.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Element {
    nodes: Vec<Point3>,
}

impl Element {
    /// Builds an element from its physical nodes, in external node order.
    /// Does not itself validate `nodes.len()`; callers that need the
    /// `(p+1)^3`/20-node contract should call [`shape::validate_node_count`].
    pub fn new(nodes: Vec<Point3>) -> Self {
        Element { nodes }
    }

    pub fn nodes(&self) -> &[Point3] {
        &self.nodes
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Maps reference coordinates `(r, s, t) in [-1, 1]^3` to the physical
    /// point via the tensor-product (or serendipity) shape functions.
    pub fn physical_point(&self, r: f64, s: f64, t: f64) -> Result<Point3> {
        let n = shape::shape_hex(r, s, t, self.nodes.len())?;
        let p = n
            .iter()
            .zip(&self.nodes)
            .fold(Vector3::new(0.0, 0.0, 0.0), |acc, (&ni, node)| acc + node.to_vec() * ni);
        Ok(Point3::from_vec(p))
    }

    /// The 3x3 Jacobian `d(x,y,z)/d(r,s,t)` at the given reference point.
    pub fn jacobian(&self, r: f64, s: f64, t: f64) -> Result<Matrix3> {
        let dn = shape::dshape_hex(r, s, t, self.nodes.len())?;
        let mut cols = [Vector3::new(0.0, 0.0, 0.0); 3];
        for (dni, node) in dn.iter().zip(&self.nodes) {
            for axis in 0..3 {
                cols[axis] += node.to_vec() * dni[axis];
            }
        }
        // cgmath::Matrix3::from_cols builds a column-major matrix, and
        // row i of J is d(x_i)/d(r,s,t); our `cols[axis]` already holds
        // d(x,y,z)/d(axis), i.e. exactly column `axis` of J.
        Ok(Matrix3::from_cols(cols[0], cols[1], cols[2]))
    }

    /// `det(J)` at the reference point; a negative value means the element
    /// is tangled or inverted.
    pub fn jacobian_det(&self, r: f64, s: f64, t: f64) -> Result<f64> {
        Ok(self.jacobian(r, s, t)?.determinant())
    }

    pub fn bounding_box(&self) -> BoundingBox<Point3> {
        self.nodes.iter().collect()
    }
}

/// A planar or curved surface element with `nfv` vertices (spec §3): a
/// line segment in 2-D, a quad in 3-D. Used both as a cutting facet and,
/// via one of an [`Element`]'s six hex faces, as the surface the direct-cut
/// classifier samples.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Facet {
    vertices: Vec<Point3>,
}

impl Facet {
    pub fn new(vertices: Vec<Point3>) -> Self {
        assert!(vertices.len() >= 2, "a facet needs at least 2 vertices");
        Facet { vertices }
    }

    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    pub fn nfv(&self) -> usize {
        self.vertices.len()
    }

    pub fn centroid(&self) -> Point3 {
        let n = self.vertices.len() as f64;
        let sum = self.vertices.iter().fold(Vector3::new(0.0, 0.0, 0.0), |acc, p| acc + p.to_vec());
        Point3::from_vec(sum / n)
    }

    pub fn bounding_box(&self) -> BoundingBox<Point3> {
        self.vertices.iter().collect()
    }

    /// Sub-samples this facet into a `order x order` grid of sub-quads
    /// (spec §4.8 step 3c), each split into two triangles. A plain
    /// triangle (`nfv == 3`) has no quad parametrization to sub-sample and
    /// is returned as a single [`Triangle`]; `order` is clamped to at
    /// least 1.
    pub fn sample_triangles(&self, order: usize) -> Vec<Triangle> {
        if self.vertices.len() == 3 {
            return vec![Triangle::new(self.vertices[0], self.vertices[1], self.vertices[2])];
        }
        assert_eq!(self.vertices.len(), 4, "sub-sampling is only defined for a quad facet");
        let (v00, v10, v11, v01) = (self.vertices[0], self.vertices[1], self.vertices[2], self.vertices[3]);
        let bilinear = |u: f64, v: f64| -> Point3 {
            Point3::from_vec(
                v00.to_vec() * (1.0 - u) * (1.0 - v)
                    + v10.to_vec() * u * (1.0 - v)
                    + v11.to_vec() * u * v
                    + v01.to_vec() * (1.0 - u) * v,
            )
        };
        let n = order.max(1);
        let mut triangles = Vec::with_capacity(n * n * 2);
        for i in 0..n {
            for j in 0..n {
                let u0 = i as f64 / n as f64;
                let u1 = (i + 1) as f64 / n as f64;
                let v0 = j as f64 / n as f64;
                let v1 = (j + 1) as f64 / n as f64;
                let c00 = bilinear(u0, v0);
                let c10 = bilinear(u1, v0);
                let c11 = bilinear(u1, v1);
                let c01 = bilinear(u0, v1);
                triangles.push(Triangle::new(c00, c10, c11));
                triangles.push(Triangle::new(c00, c11, c01));
            }
        }
        triangles
    }
}

/// Exactly three vertices: the primitive the triangle-triangle distance
/// kernel (spec §4.7) operates on. [`Facet`]s are sub-sampled into these
/// before being handed to it.
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub p: [Point3; 3],
}

impl Triangle {
    pub fn new(p0: Point3, p1: Point3, p2: Point3) -> Self {
        Triangle { p: [p0, p1, p2] }
    }

    pub fn bounding_box(&self) -> BoundingBox<Point3> {
        self.p.iter().collect()
    }
}

/// Classification outcome of a direct-cut element test. The discriminants
/// are part of the external wire contract (spec §6): callers persisting or
/// exchanging this value across a process boundary should go through
/// [`CutFlag::as_u8`]/[`CutFlag::try_from`], not `serde`'s default
/// string-variant encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum CutFlag {
    #[default]
    Unassigned = 0,
    Normal = 1,
    Hole = 2,
    Cut = 3,
}

impl CutFlag {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for CutFlag {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, u8> {
        match value {
            0 => Ok(CutFlag::Unassigned),
            1 => Ok(CutFlag::Normal),
            2 => Ok(CutFlag::Hole),
            3 => Ok(CutFlag::Cut),
            other => Err(other),
        }
    }
}

/// Per-element running state for the direct-cut classifier: the closest
/// cutting facet seen so far, its signed distance and normal, and how many
/// facets have contributed.
#[derive(Debug, Clone, Copy)]
pub struct CutAccumulator {
    pub flag: CutFlag,
    pub dist: f64,
    pub normal: Vector3,
    pub count: u32,
}

impl Default for CutAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl CutAccumulator {
    pub fn new() -> Self {
        CutAccumulator { flag: CutFlag::Unassigned, dist: f64::INFINITY, normal: Vector3::new(0.0, 0.0, 0.0), count: 0 }
    }

    /// Folds in one element-to-facet minimum-distance observation (spec
    /// §4.8 steps 3d-3g). `distance` is the unsigned triangle-triangle
    /// distance already minimized over every sub-sampled triangle pair for
    /// this facet; `normal` is the facet's outward normal (already flipped
    /// per `cutType`); `separation_vector` is the distance kernel's own
    /// `p_on_T2 - p_on_T1` output for the closest pair.
    ///
    /// `btol`/`dtol` are the element-scaled tolerances from step 2:
    /// `distance < 1e-8 * btol` wins outright as `Cut`; a facet strictly
    /// closer than the current winner by more than `dtol` replaces it; one
    /// within `dtol` of the current winner is folded into a running
    /// average normal instead.
    pub fn accumulate(&mut self, distance: f64, btol: f64, dtol: f64, normal: Vector3, separation_vector: Vector3) {
        if self.flag == CutFlag::Cut {
            return;
        }
        if distance < 1e-8 * btol {
            self.flag = CutFlag::Cut;
            self.dist = 0.0;
            return;
        }
        if self.flag == CutFlag::Unassigned || distance < self.dist - dtol {
            self.dist = distance;
            self.normal = normal;
            self.count = 1;
            let dot = normal.dot(separation_vector);
            self.flag = if dot < 0.0 { CutFlag::Hole } else { CutFlag::Normal };
        } else if (distance - self.dist).abs() <= dtol {
            let new_count = self.count + 1;
            self.normal = (self.normal * self.count as f64 + normal) / new_count as f64;
            self.count = new_count;
            let dot = self.normal.dot(separation_vector);
            self.flag = if dot < 0.0 { CutFlag::Hole } else { CutFlag::Normal };
        }
        // else: strictly farther facet (step 3g) — ignore.
    }
}

pub fn validate_hex(n_nodes: usize) -> Result<()> {
    shape::validate_node_count(n_nodes, 3).map_err(|_| Error::ShapeOrderMismatch(n_nodes, 3))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube_nodes() -> Vec<Point3> {
        vec![
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
            Point3::new(1.0, -1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn identity_hex_round_trips_reference_point() {
        let elem = Element::new(unit_cube_nodes());
        for &(r, s, t) in &[(0.0, 0.0, 0.0), (0.3, -0.6, 0.9), (-1.0, 1.0, -1.0)] {
            let p = elem.physical_point(r, s, t).unwrap();
            assert!((p.x - r).abs() < 1e-10);
            assert!((p.y - s).abs() < 1e-10);
            assert!((p.z - t).abs() < 1e-10);
        }
    }

    #[test]
    fn identity_hex_jacobian_is_identity() {
        let elem = Element::new(unit_cube_nodes());
        let j = elem.jacobian(0.1, 0.2, -0.3).unwrap();
        assert!((j.determinant() - 1.0).abs() < 1e-10);
    }

    #[test]
    fn scaled_hex_volume_matches_side_cubed() {
        let side = 3.0;
        let nodes: Vec<Point3> =
            unit_cube_nodes().iter().map(|p| Point3::from_vec(p.to_vec() * (side / 2.0))).collect();
        let elem = Element::new(nodes);
        let det = elem.jacobian_det(0.0, 0.0, 0.0).unwrap();
        // |J| is constant for a parallelepiped hex: (side/2)^3 * 2^3 = side^3.
        assert!((det - side.powi(3)).abs() < 1e-9);
    }

    #[test]
    fn accumulator_prefers_clearly_closer_facet() {
        let mut acc = CutAccumulator::new();
        let btol = 10.0;
        let dtol = 1e-3 * btol;
        // normal away from the element (dot with separation positive) -> Normal.
        acc.accumulate(0.5, btol, dtol, Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(acc.flag, CutFlag::Normal);
        assert_eq!(acc.count, 1);
        // clearly closer (0.1 < 0.5 - dtol): replaces the winner outright,
        // resetting count rather than averaging into it.
        acc.accumulate(0.1, btol, dtol, Vector3::new(0.0, 0.0, -1.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(acc.flag, CutFlag::Hole);
        assert!((acc.dist - 0.1).abs() < 1e-12);
        assert_eq!(acc.count, 1);
    }

    #[test]
    fn accumulator_averages_tied_facets() {
        let mut acc = CutAccumulator::new();
        let btol = 10.0;
        let dtol = 1e-3 * btol;
        acc.accumulate(0.5, btol, dtol, Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(acc.count, 1);
        // within dtol of the current winner: folds into the averaged normal
        // instead of replacing it.
        acc.accumulate(0.5 + dtol / 2.0, btol, dtol, Vector3::new(0.0, 0.0, -1.0), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(acc.count, 2);
        assert!((acc.dist - 0.5).abs() < 1e-12, "tied facets do not move dist");
    }

    #[test]
    fn accumulator_ignores_strictly_farther_facet() {
        let mut acc = CutAccumulator::new();
        let btol = 10.0;
        let dtol = 1e-3 * btol;
        acc.accumulate(1.0, btol, dtol, Vector3::new(0.0, 0.0, 1.0), Vector3::new(0.0, 0.0, 1.0));
        acc.accumulate(5.0, btol, dtol, Vector3::new(0.0, 0.0, -1.0), Vector3::new(0.0, 0.0, 1.0));
        assert!((acc.dist - 1.0).abs() < 1e-12);
        assert_eq!(acc.count, 1);
    }

    #[test]
    fn accumulator_flags_near_zero_distance_as_cut() {
        let mut acc = CutAccumulator::new();
        acc.accumulate(1e-9, 10.0, 0.01, Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(acc.flag, CutFlag::Cut);
    }

    #[test]
    fn accumulator_skips_further_facets_once_cut() {
        let mut acc = CutAccumulator::new();
        acc.accumulate(0.0, 10.0, 0.01, Vector3::new(1.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0));
        assert_eq!(acc.flag, CutFlag::Cut);
        acc.accumulate(5.0, 10.0, 0.01, Vector3::new(0.0, 1.0, 0.0), Vector3::new(0.0, 1.0, 0.0));
        assert_eq!(acc.flag, CutFlag::Cut);
        assert_eq!(acc.dist, 0.0);
    }

    #[test]
    fn cut_flag_numeric_contract_round_trips() {
        for (flag, code) in [
            (CutFlag::Unassigned, 0u8),
            (CutFlag::Normal, 1),
            (CutFlag::Hole, 2),
            (CutFlag::Cut, 3),
        ] {
            assert_eq!(flag.as_u8(), code);
            assert_eq!(CutFlag::try_from(code), Ok(flag));
        }
        assert_eq!(CutFlag::try_from(4), Err(4));
    }
}
