//! Triangle-triangle minimum distance (spec §4.7): a modified Möller
//! triangle-triangle test — signed vertex distances to the opposite plane,
//! a coplanar/no-crossing/piercing classification, and (unlike Möller's
//! original intersection-only test) a real distance *and* separation
//! vector in the no-crossing case, taken as the minimum over edge-edge and
//! vertex-to-triangle distances. Grounded on the sweep/reject structure of
//! the teacher's `truck-meshalgo` triangle collision pass.
use oga_base::cgmath64::*;
use oga_base::tolerance::TOLERANCE;

use crate::element::Triangle;

const PLANE_SNAP: f64 = 1e-10;

fn plane_normal(tri: &Triangle) -> Vector3 {
    (tri.p[1] - tri.p[0]).cross(tri.p[2] - tri.p[0])
}

/// Signed distance of each vertex of `tri` to the plane through
/// `plane_point` with the given *unit* normal; magnitudes below
/// [`PLANE_SNAP`] are rounded to exactly 0 (spec §4.7 step 2).
fn signed_dists(tri: &Triangle, plane_point: Point3, unit_normal: Vector3) -> [f64; 3] {
    tri.p.map(|v| {
        let d = unit_normal.dot(v - plane_point);
        if d.abs() < PLANE_SNAP { 0.0 } else { d }
    })
}

fn same_sign_nonzero(d: [f64; 3]) -> bool {
    (d[0] > 0.0 && d[1] > 0.0 && d[2] > 0.0) || (d[0] < 0.0 && d[1] < 0.0 && d[2] < 0.0)
}

/// Closest points and distance between segments `(p1, q1)` and `(p2, q2)`.
fn segment_segment_closest(p1: Point3, q1: Point3, p2: Point3, q2: Point3) -> (f64, Point3, Point3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.dot(d1);
    let e = d2.dot(d2);
    let f = d2.dot(r);

    let (mut s, mut t);
    if a <= TOLERANCE && e <= TOLERANCE {
        s = 0.0;
        t = 0.0;
    } else if a <= TOLERANCE {
        s = 0.0;
        t = (f / e).clamp(0.0, 1.0);
    } else {
        let c = d1.dot(r);
        if e <= TOLERANCE {
            t = 0.0;
            s = (-c / a).clamp(0.0, 1.0);
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            s = if denom.abs() > TOLERANCE { ((b * f - c * e) / denom).clamp(0.0, 1.0) } else { 0.0 };
            t = (b * s + f) / e;
            if t < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            }
        }
    }
    let closest1 = p1 + d1 * s;
    let closest2 = p2 + d2 * t;
    ((closest1 - closest2).magnitude(), closest1, closest2)
}

/// Closest point on the (filled) triangle `tri` to `p`, and the distance.
fn point_triangle_closest(p: Point3, tri: &Triangle) -> (f64, Point3) {
    let [a, b, c] = tri.p;
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return ((p - a).magnitude(), a);
    }
    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return ((p - b).magnitude(), b);
    }
    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        let q = a + ab * v;
        return ((p - q).magnitude(), q);
    }
    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return ((p - c).magnitude(), c);
    }
    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        let q = a + ac * w;
        return ((p - q).magnitude(), q);
    }
    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        let q = b + (c - b) * w;
        return ((p - q).magnitude(), q);
    }
    let denom = 1.0 / (va + vb + vc);
    let v = vb * denom;
    let w = vc * denom;
    let q = a + ab * v + ac * w;
    ((p - q).magnitude(), q)
}

fn tangent_basis(n: Vector3) -> (Vector3, Vector3) {
    let n = n.normalize();
    let helper = if n.x.abs() < 0.9 { Vector3::new(1.0, 0.0, 0.0) } else { Vector3::new(0.0, 1.0, 0.0) };
    let u = n.cross(helper).normalize();
    let v = n.cross(u);
    (u, v)
}

/// `true` if `p` (known to lie in the plane of `tri`, normal `n`) falls
/// inside `tri` as seen from that plane.
fn point_in_triangle_plane(p: Point3, tri: &Triangle, n: Vector3) -> bool {
    let (u, v) = tangent_basis(n);
    let project = |q: Point3| (u.dot(q - tri.p[0]), v.dot(q - tri.p[0]));
    let [pa, pb, pc] = tri.p.map(project);
    let pp = project(p);
    let cross = |o: (f64, f64), a: (f64, f64), b: (f64, f64)| (a.0 - o.0) * (b.1 - o.1) - (a.1 - o.1) * (b.0 - o.0);
    let d = [cross(pa, pb, pp), cross(pb, pc, pp), cross(pc, pa, pp)];
    d.iter().all(|&x| x >= -TOLERANCE) || d.iter().all(|&x| x <= TOLERANCE)
}

fn triangles_2d_overlap(a: [(f64, f64); 3], b: [(f64, f64); 3]) -> bool {
    let cross = |o: (f64, f64), p: (f64, f64), q: (f64, f64)| (p.0 - o.0) * (q.1 - o.1) - (p.1 - o.1) * (q.0 - o.0);
    let segments_intersect = |p1, p2, p3, p4| {
        let d1 = cross(p3, p4, p1);
        let d2 = cross(p3, p4, p2);
        let d3 = cross(p1, p2, p3);
        let d4 = cross(p1, p2, p4);
        (d1 * d2 < 0.0) && (d3 * d4 < 0.0)
    };
    for i in 0..3 {
        for j in 0..3 {
            if segments_intersect(a[i], a[(i + 1) % 3], b[j], b[(j + 1) % 3]) {
                return true;
            }
        }
    }
    let point_in_triangle = |p: (f64, f64), t: [(f64, f64); 3]| {
        let d = [cross(t[0], t[1], p), cross(t[1], t[2], p), cross(t[2], t[0], p)];
        (d.iter().all(|&x| x >= -TOLERANCE)) || (d.iter().all(|&x| x <= TOLERANCE))
    };
    point_in_triangle(a[0], b) || point_in_triangle(b[0], a)
}

/// Coplanar overlap test (spec §4.7 step 3): any vertex of one triangle
/// lying inside the other, checked via a shared 2-D tangent-plane basis.
fn coplanar_overlap(a: &Triangle, b: &Triangle, normal: Vector3) -> bool {
    let (u, v) = tangent_basis(normal);
    let project = |tri: &Triangle| tri.p.map(|p| (u.dot(p - a.p[0]), v.dot(p - a.p[0])));
    triangles_2d_overlap(project(a), project(b))
}

/// Minimum distance and separation vector between two triangles (spec
/// §4.7). `distance >= 0`; when positive, `separation_vector` points from
/// `a` toward `b` (`p_on_b - p_on_a`).
pub fn triangle_triangle_distance(a: &Triangle, b: &Triangle, tol: f64) -> (f64, Vector3) {
    // Step 1: nine edge-edge distances; snap to 0 within `tol`.
    let mut best_dist = f64::INFINITY;
    let mut best_sep = Vector3::new(0.0, 0.0, 0.0);
    for i in 0..3 {
        for j in 0..3 {
            let (d, c1, c2) = segment_segment_closest(a.p[i], a.p[(i + 1) % 3], b.p[j], b.p[(j + 1) % 3]);
            if d < best_dist {
                best_dist = d;
                best_sep = c2 - c1;
            }
        }
    }
    if best_dist <= tol {
        return (0.0, Vector3::new(0.0, 0.0, 0.0));
    }
    for &v in &a.p {
        let (d, q) = point_triangle_closest(v, b);
        if d < best_dist {
            best_dist = d;
            best_sep = q - v;
        }
    }
    for &v in &b.p {
        let (d, q) = point_triangle_closest(v, a);
        if d < best_dist {
            best_dist = d;
            best_sep = v - q;
        }
    }

    // Step 2: signed vertex distances to the opposite plane.
    let n_b = plane_normal(b).normalize();
    let d_a = signed_dists(a, b.p[0], n_b);
    let n_a = plane_normal(a).normalize();
    let d_b = signed_dists(b, a.p[0], n_a);

    // Step 3: coplanar branch.
    if d_a.iter().all(|&d| d == 0.0) && d_b.iter().all(|&d| d == 0.0) && coplanar_overlap(a, b, n_a) {
        return (0.0, Vector3::new(0.0, 0.0, 0.0));
    }

    let a_one_side = same_sign_nonzero(d_a);
    let b_one_side = same_sign_nonzero(d_b);

    // Step 4: no-crossing branches - project straddling-free vertices onto
    // the opposite plane and test containment.
    if a_one_side {
        for i in 0..3 {
            if point_in_triangle_plane(a.p[i] - n_b * d_a[i], b, n_b) && d_a[i].abs() < best_dist {
                best_dist = d_a[i].abs();
                best_sep = -n_b * d_a[i];
            }
        }
    }
    if b_one_side {
        for j in 0..3 {
            if point_in_triangle_plane(b.p[j] - n_a * d_b[j], a, n_a) && d_b[j].abs() < best_dist {
                best_dist = d_b[j].abs();
                best_sep = n_a * d_b[j];
            }
        }
    }

    // Step 5: if either triangle lies entirely on one side of the other's
    // plane, no intersection is possible; the best candidate above stands.
    if a_one_side || b_one_side {
        return (best_dist, best_sep);
    }

    // Step 6: piercing branch. Both triangles straddle the other's plane;
    // intersect each with the line L = N1 x N2 and test interval overlap.
    let line_dir = n_a.cross(n_b);
    if line_dir.magnitude2() <= TOLERANCE * TOLERANCE {
        // Degenerate (near-parallel planes with both sides straddling is
        // only possible for near-coplanar triangles); fall back to the
        // coplanar overlap test.
        if coplanar_overlap(a, b, n_a) {
            return (0.0, Vector3::new(0.0, 0.0, 0.0));
        }
        return (best_dist, best_sep);
    }

    let project = |tri: &Triangle, d: [f64; 3], origin: Point3| -> Option<(f64, f64)> {
        let t: Vec<f64> = (0..3)
            .filter_map(|i| {
                let j = (i + 1) % 3;
                if d[i] * d[j] < 0.0 || (d[i] - d[j]).abs() > TOLERANCE {
                    let pi = line_dir.dot(tri.p[i] - origin);
                    let pj = line_dir.dot(tri.p[j] - origin);
                    Some(pi + (pj - pi) * (d[i] / (d[i] - d[j])))
                } else {
                    None
                }
            })
            .collect();
        if t.len() < 2 {
            None
        } else {
            Some((t[0].min(t[1]), t[0].max(t[1])))
        }
    };

    let origin = a.p[0];
    let (Some((a0, a1)), Some((b0, b1))) = (project(a, d_a, origin), project(b, d_b, origin)) else {
        return (best_dist, best_sep);
    };

    if a0 <= b1 + TOLERANCE && b0 <= a1 + TOLERANCE {
        return (0.0, Vector3::new(0.0, 0.0, 0.0));
    }

    let l_unit = line_dir.normalize();
    let (gap, sep) = if (a0 - b1).abs() <= (b0 - a1).abs() {
        ((a0 - b1).abs(), if a0 > b1 { -l_unit } else { l_unit })
    } else {
        ((b0 - a1).abs(), if b0 > a1 { l_unit } else { -l_unit })
    };
    if gap < best_dist {
        (gap, sep * gap)
    } else {
        (best_dist, best_sep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(p0: Point3, p1: Point3, p2: Point3) -> Triangle {
        Triangle::new(p0, p1, p2)
    }

    #[test]
    fn self_distance_is_zero() {
        let t = tri(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0));
        assert!(triangle_triangle_distance(&t, &t, 1e-9).0 < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = tri(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0));
        let b = tri(Point3::new(0.0, 0.0, 5.0), Point3::new(1.0, 0.0, 5.0), Point3::new(0.0, 1.0, 5.0));
        let (d_ab, sep_ab) = triangle_triangle_distance(&a, &b, 1e-9);
        let (d_ba, sep_ba) = triangle_triangle_distance(&b, &a, 1e-9);
        assert!((d_ab - d_ba).abs() < 1e-9);
        assert!((sep_ab + sep_ba).magnitude() < 1e-6, "separation vectors should be opposite: {sep_ab:?} vs {sep_ba:?}");
    }

    #[test]
    fn parallel_offset_triangles_measure_plane_gap() {
        let a = tri(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0));
        let b = tri(Point3::new(0.0, 0.0, 3.0), Point3::new(1.0, 0.0, 3.0), Point3::new(0.0, 1.0, 3.0));
        let (d, sep) = triangle_triangle_distance(&a, &b, 1e-9);
        assert!((d - 3.0).abs() < 1e-6);
        assert!((sep.z - 3.0).abs() < 1e-6, "separation should point +z toward b: {sep:?}");
    }

    #[test]
    fn piercing_triangles_have_zero_distance() {
        let a = tri(Point3::new(-1.0, -1.0, 0.0), Point3::new(2.0, -1.0, 0.0), Point3::new(-1.0, 2.0, 0.0));
        let b = tri(Point3::new(0.0, 0.0, -1.0), Point3::new(0.0, 0.0, 1.0), Point3::new(0.5, 0.5, 0.0));
        assert!(triangle_triangle_distance(&a, &b, 1e-9).0 < 1e-6);
    }

    #[test]
    fn disjoint_non_parallel_triangles_are_nonzero() {
        let a = tri(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0));
        let b = tri(Point3::new(5.0, 5.0, 5.0), Point3::new(6.0, 5.0, 5.0), Point3::new(5.0, 6.0, 6.0));
        assert!(triangle_triangle_distance(&a, &b, 1e-9).0 > 1.0);
    }

    #[test]
    fn scenario_separated_triangles_distance_two() {
        let t1 = tri(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0));
        let t2 = tri(Point3::new(0.0, 0.0, 2.0), Point3::new(1.0, 0.0, 2.0), Point3::new(0.0, 1.0, 2.0));
        let (d, sep) = triangle_triangle_distance(&t1, &t2, 1e-9);
        assert!((d - 2.0).abs() < 1e-9);
        assert!(sep.z > 0.0 && sep.x.abs() < 1e-9 && sep.y.abs() < 1e-9, "sep should be parallel to +z: {sep:?}");
    }

    #[test]
    fn scenario_touching_triangles_distance_zero() {
        let t1 = tri(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0));
        let t2 = tri(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 1.0, 0.0), Point3::new(0.0, 0.0, 1.0));
        assert!(triangle_triangle_distance(&t1, &t2, 1e-9).0 < 1e-9);
    }

    #[test]
    fn scenario_coplanar_nested_distance_zero() {
        let t1 = tri(Point3::new(0.0, 0.0, 0.0), Point3::new(4.0, 0.0, 0.0), Point3::new(0.0, 4.0, 0.0));
        let t2 = tri(Point3::new(1.0, 1.0, 0.0), Point3::new(2.0, 1.0, 0.0), Point3::new(1.0, 2.0, 0.0));
        assert!(triangle_triangle_distance(&t1, &t2, 1e-9).0 < 1e-9);
    }
}
