//! Outward face normals for hex elements and general triangle/quad facets
//! (spec §4.5). Used by the classifier to decide which side of a cutting
//! facet an element centroid sits on.
use oga_base::cgmath64::*;

use crate::element::Element;

/// The 8 linear-hex corner node indices bounding each of the 6 faces, in
/// the corner order `(-1,-1,-1) .. (-1,1,1)` used throughout [`crate::shape`]
/// and [`crate::ordering`]: `{-r, +r, -s, +s, -t, +t}`.
pub const HEX_FACES: [[usize; 4]; 6] = [
    [0, 3, 7, 4], // r = -1
    [1, 2, 6, 5], // r = +1
    [0, 1, 5, 4], // s = -1
    [3, 2, 6, 7], // s = +1
    [0, 1, 2, 3], // t = -1
    [4, 5, 6, 7], // t = +1
];

/// Newell's method: the area-weighted normal of a (possibly non-planar)
/// quad, traversed CCW as seen from the outward side.
pub fn quad_normal(p: [Point3; 4]) -> Vector3 {
    let mut n = Vector3::new(0.0, 0.0, 0.0);
    for i in 0..4 {
        let a = p[i];
        let b = p[(i + 1) % 4];
        n.x += (a.y - b.y) * (a.z + b.z);
        n.y += (a.z - b.z) * (a.x + b.x);
        n.z += (a.x - b.x) * (a.y + b.y);
    }
    n
}

/// The (non-normalized) normal of a triangle, CCW winding.
pub fn triangle_normal(p0: Point3, p1: Point3, p2: Point3) -> Vector3 {
    (p1 - p0).cross(p2 - p0)
}

/// The outward normal of one of an 8-node hex's 6 faces, evaluated from
/// its 4 corner nodes (Newell's method, robust to a mildly warped face).
/// `face` indexes [`HEX_FACES`].
pub fn hex_face_normal(elem: &Element, face: usize) -> Vector3 {
    let idx = HEX_FACES[face];
    let nodes = elem.nodes();
    quad_normal([nodes[idx[0]], nodes[idx[1]], nodes[idx[2]], nodes[idx[3]]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Element;

    fn unit_cube() -> Element {
        Element::new(vec![
            Point3::new(-1.0, -1.0, -1.0),
            Point3::new(1.0, -1.0, -1.0),
            Point3::new(1.0, 1.0, -1.0),
            Point3::new(-1.0, 1.0, -1.0),
            Point3::new(-1.0, -1.0, 1.0),
            Point3::new(1.0, -1.0, 1.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(-1.0, 1.0, 1.0),
        ])
    }

    #[test]
    fn unit_cube_face_normals_point_outward() {
        let cube = unit_cube();
        let expected = [
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 0.0, 1.0),
        ];
        for face in 0..6 {
            let n = hex_face_normal(&cube, face).normalize();
            assert!((n - expected[face]).magnitude() < 1e-9, "face {face}: {n:?}");
        }
    }

    #[test]
    fn triangle_normal_matches_right_hand_rule() {
        let n = triangle_normal(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert!((n - Vector3::new(0.0, 0.0, 1.0)).magnitude() < 1e-12);
    }
}
