//! Direct-cut element classification (spec §4.8): for every element, the
//! cutting facets within `btol` of its bounding box decide whether the
//! element is blanked out (`Hole`), kept (`Normal`), or sits on the
//! boundary (`Cut`). The outer per-element loop is embarrassingly
//! parallel — [`classify_elements`] and [`classify_elements_parallel`] must agree
//! bit-for-bit, since each element's accumulation only ever touches its
//! own [`CutAccumulator`] and facets are visited in the same order either
//! way (spec §5/§9).
use oga_base::cgmath64::*;

use crate::config::ClassifierConfig;
use crate::element::{CutAccumulator, CutFlag, Element, Facet, Triangle};
use crate::face_normal::{quad_normal, triangle_normal, HEX_FACES};
use crate::tritri::triangle_triangle_distance;

fn centroid(elem: &Element) -> Point3 {
    let sum = elem.nodes().iter().take(8).fold(Vector3::new(0.0, 0.0, 0.0), |acc, p| acc + p.to_vec());
    Point3::from_vec(sum / 8.0)
}

/// The outward normal of a facet with 3 or 4 vertices (spec §3's `nfv`).
fn facet_normal(facet: &Facet) -> Vector3 {
    let v = facet.vertices();
    match v.len() {
        3 => triangle_normal(v[0], v[1], v[2]),
        4 => quad_normal([v[0], v[1], v[2], v[3]]),
        n => panic!("classifier only supports 3- or 4-vertex facets, got {n}"),
    }
    .normalize()
}

/// The element's 6 hex faces, each sub-sampled into `order^2` sub-quads of
/// 2 triangles apiece (spec §4.8 step 3c), from its first 8 (corner) nodes.
fn surface_triangles(elem: &Element, order: usize) -> Vec<Triangle> {
    let nodes = elem.nodes();
    HEX_FACES
        .iter()
        .flat_map(|face| {
            let quad = Facet::new(vec![nodes[face[0]], nodes[face[1]], nodes[face[2]], nodes[face[3]]]);
            quad.sample_triangles(order)
        })
        .collect()
}

/// Classifies one element against every facet of the cutting surface (spec
/// §4.8). `cut_type` selects the facet-normal orientation: `0` flips the
/// facet's computed outward normal, `1` leaves it as-is.
pub fn classify_element(elem: &Element, facets: &[Facet], config: &ClassifierConfig, cut_type: u8) -> CutAccumulator {
    let mut acc = CutAccumulator::new();
    let elem_bb = elem.bounding_box();
    let extent = elem_bb.diagonal();
    let btol = extent.x.abs() + extent.y.abs() + extent.z.abs();
    let dtol = 1e-3 * btol;
    let surface = surface_triangles(elem, config.surface_sub_order);

    for facet in facets {
        if acc.flag == CutFlag::Cut {
            break;
        }
        if elem_bb.gap_squared(&facet.bounding_box()) > btol * btol {
            continue;
        }
        let mut normal = facet_normal(facet);
        if cut_type == 0 {
            normal = -normal;
        }
        let facet_triangles = facet.sample_triangles(config.facet_sub_order);
        let mut best_dist = f64::INFINITY;
        let mut best_sep = Vector3::new(0.0, 0.0, 0.0);
        for s in &surface {
            for f in &facet_triangles {
                let (d, sep) = triangle_triangle_distance(s, f, config.tritri_tol);
                if d < best_dist {
                    best_dist = d;
                    best_sep = sep;
                }
            }
        }
        acc.accumulate(best_dist, btol, dtol, normal, best_sep);
    }

    // Step 4: no facet was ever within btol of this element. Record the
    // globally nearest facet by centroid distance for diagnostic value,
    // but leave the flag Unassigned: this element was never geometrically
    // validated against any facet's surface.
    if acc.flag == CutFlag::Unassigned {
        let c = centroid(elem);
        if let Some(nearest) = facets
            .iter()
            .min_by(|a, b| (a.centroid() - c).magnitude2().partial_cmp(&(b.centroid() - c).magnitude2()).unwrap())
        {
            let fc = nearest.centroid();
            acc.dist = (fc - c).magnitude();
            if acc.dist > 0.0 {
                acc.normal = (c - fc) / acc.dist;
            }
        }
    }
    acc
}

/// Classifies every element sequentially.
pub fn classify_elements(elements: &[Element], facets: &[Facet], config: &ClassifierConfig, cut_type: u8) -> Vec<CutAccumulator> {
    elements.iter().map(|elem| classify_element(elem, facets, config, cut_type)).collect()
}

/// Classifies every element in parallel over a rayon thread pool. Produces
/// results identical to [`classify_elements`]: the per-element reduction is
/// independent of classification order across elements, and the facet
/// loop inside [`classify_element`] always runs in slice order.
pub fn classify_elements_parallel(elements: &[Element], facets: &[Facet], config: &ClassifierConfig, cut_type: u8) -> Vec<CutAccumulator> {
    use rayon::prelude::*;
    elements.par_iter().map(|elem| classify_element(elem, facets, config, cut_type)).collect()
}
