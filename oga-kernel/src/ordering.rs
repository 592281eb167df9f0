//! Bidirectional maps between the structured `(i, j[, k])` node layout and
//! the external "gmsh" recursive layout (spec §4.2): at each recursion
//! level, from the outside in, emit that level's corners, then its edges,
//! then — for hexes only — each of the six faces recursed as a quad, then
//! a single center node if the remaining side length is odd.
//!
//! The maps are pure functions of the node count `n` and are published
//! once into a process-wide, read-after-publish cache: a concurrent cache
//! miss recomputing the same permutation twice is harmless (spec §5/§9),
//! so the cache uses the same `once_cell` + `parking_lot` + `rustc-hash`
//! trio already present in the teacher pack (`truck_topology`,
//! `truck-geometry::t_spline`, `truck-base::entry_map`).
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use oga_base::Error;

type Perm = Arc<Vec<usize>>;
type PermCache = Lazy<RwLock<FxHashMap<usize, Perm>>>;

static QUAD_FWD: PermCache = Lazy::new(|| RwLock::new(FxHashMap::default()));
static QUAD_INV: PermCache = Lazy::new(|| RwLock::new(FxHashMap::default()));
static HEX_FWD: PermCache = Lazy::new(|| RwLock::new(FxHashMap::default()));
static HEX_INV: PermCache = Lazy::new(|| RwLock::new(FxHashMap::default()));

fn cached(cache: &PermCache, n: usize, compute: impl FnOnce() -> Vec<usize>) -> Perm {
    if let Some(hit) = cache.read().get(&n) {
        return hit.clone();
    }
    let computed = Arc::new(compute());
    cache.write().entry(n).or_insert_with(|| computed.clone());
    cache.read()[&n].clone()
}

fn invert(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0usize; perm.len()];
    perm.iter().enumerate().for_each(|(ext, &structured)| inv[structured] = ext);
    inv
}

/// Integer side length `p+1` such that `side^dims == n`, or `None`.
fn integer_root(n: usize, dims: u32) -> Option<usize> {
    if n == 0 {
        return None;
    }
    let approx = (n as f64).powf(1.0 / dims as f64).round() as usize;
    (approx.saturating_sub(1)..=approx + 1)
        .find(|&s| s.checked_pow(dims).map(|p| p == n) == Some(true))
}

/// The integer side length `p+1` for an `n`-node quad, or
/// [`Error::ShapeOrderMismatch`] if `n` is not a perfect square.
pub fn quad_side(n: usize) -> oga_base::Result<usize> {
    integer_root(n, 2).ok_or(Error::ShapeOrderMismatch(n, 2))
}

/// The integer side length `p+1` for an `n`-node hex, or
/// [`Error::ShapeOrderMismatch`] if `n` is not a perfect cube.
pub fn hex_side(n: usize) -> oga_base::Result<usize> {
    integer_root(n, 3).ok_or(Error::ShapeOrderMismatch(n, 3))
}

/// The fixed 8-entry permutation for the serendipity quad (spec §4.2):
/// structured position `k` indexes the 8 non-center nodes of a 3x3 grid,
/// enumerated row-major; the external order is that same grid's gmsh
/// corners-then-edges recursion (i.e. the 9-node recursion with its
/// trailing center entry dropped).
fn serendipity_quad8_positions() -> [(usize, usize); 8] {
    [(0, 0), (1, 0), (2, 0), (0, 1), (2, 1), (0, 2), (1, 2), (2, 2)]
}

fn quad_shells(side: usize) -> Vec<(usize, usize)> {
    let mut order = Vec::with_capacity(side * side);
    let mut level = 0usize;
    loop {
        if 2 * level >= side {
            break;
        }
        let m = side - 2 * level;
        let lo = level;
        let hi = side - 1 - level;
        if m == 1 {
            order.push((lo, lo));
            break;
        }
        order.push((lo, lo));
        order.push((hi, lo));
        order.push((hi, hi));
        order.push((lo, hi));
        (lo + 1..hi).for_each(|i| order.push((i, lo)));
        (lo + 1..hi).for_each(|j| order.push((hi, j)));
        (lo + 1..hi).rev().for_each(|i| order.push((i, hi)));
        (lo + 1..hi).rev().for_each(|j| order.push((lo, j)));
        level += 1;
    }
    order
}

fn edge_interior(a: (usize, usize, usize), b: (usize, usize, usize)) -> Vec<(usize, usize, usize)> {
    let step = |from: usize, to: usize| -> Vec<usize> {
        if from < to { (from + 1..to).collect() } else { (to + 1..from).rev().collect() }
    };
    if a.0 != b.0 {
        step(a.0, b.0).into_iter().map(|x| (x, a.1, a.2)).collect()
    } else if a.1 != b.1 {
        step(a.1, b.1).into_iter().map(|y| (a.0, y, a.2)).collect()
    } else {
        step(a.2, b.2).into_iter().map(|z| (a.0, a.1, z)).collect()
    }
}

fn hex_shells(side: usize) -> Vec<(usize, usize, usize)> {
    let mut order = Vec::with_capacity(side * side * side);
    let mut level = 0usize;
    loop {
        if 2 * level >= side {
            break;
        }
        let m = side - 2 * level;
        let lo = level;
        let hi = side - 1 - level;
        if m == 1 {
            order.push((lo, lo, lo));
            break;
        }
        let bottom = [(lo, lo, lo), (hi, lo, lo), (hi, hi, lo), (lo, hi, lo)];
        let top = [(lo, lo, hi), (hi, lo, hi), (hi, hi, hi), (lo, hi, hi)];
        order.extend(bottom);
        order.extend(top);
        (0..4).for_each(|w| order.extend(edge_interior(bottom[w], bottom[(w + 1) % 4])));
        (0..4).for_each(|w| order.extend(edge_interior(bottom[w], top[w])));
        (0..4).for_each(|w| order.extend(edge_interior(top[w], top[(w + 1) % 4])));
        if m >= 3 {
            let inner = m - 2;
            let face = quad_shells(inner);
            face.iter().for_each(|&(a, b)| order.push((lo + 1 + a, lo + 1 + b, lo)));
            face.iter().for_each(|&(a, b)| order.push((lo + 1 + a, lo + 1 + b, hi)));
            face.iter().for_each(|&(a, b)| order.push((lo + 1 + a, lo, lo + 1 + b)));
            face.iter().for_each(|&(a, b)| order.push((lo + 1 + a, hi, lo + 1 + b)));
            face.iter().for_each(|&(a, b)| order.push((lo, lo + 1 + a, lo + 1 + b)));
            face.iter().for_each(|&(a, b)| order.push((hi, lo + 1 + a, lo + 1 + b)));
        }
        level += 1;
    }
    order
}

/// External (gmsh) index -> structured index, for an `n`-node quad.
pub fn gmsh_to_structured_quad(n: usize) -> oga_base::Result<Perm> {
    if n == 8 {
        let positions = serendipity_quad8_positions();
        let full = quad_shells(3);
        return Ok(cached(&QUAD_FWD, n, move || {
            full[..8]
                .iter()
                .map(|pos| positions.iter().position(|p| p == pos).unwrap())
                .collect()
        }));
    }
    let side = quad_side(n)?;
    Ok(cached(&QUAD_FWD, n, move || {
        quad_shells(side).into_iter().map(|(i, j)| i + side * j).collect()
    }))
}

/// Structured index -> external (gmsh) index, for an `n`-node quad.
pub fn structured_to_gmsh_quad(n: usize) -> oga_base::Result<Perm> {
    if let Some(hit) = QUAD_INV.read().get(&n) {
        return Ok(hit.clone());
    }
    let fwd = gmsh_to_structured_quad(n)?;
    Ok(cached(&QUAD_INV, n, || invert(&fwd)))
}

/// External (gmsh) index -> structured index, for an `n`-node hex (`n != 20`;
/// the 20-node serendipity hex bypasses ordering maps entirely, per spec §4.3/§4.9).
pub fn gmsh_to_structured_hex(n: usize) -> oga_base::Result<Perm> {
    let side = hex_side(n)?;
    Ok(cached(&HEX_FWD, n, move || {
        hex_shells(side).into_iter().map(|(i, j, k)| i + side * j + side * side * k).collect()
    }))
}

/// Structured index -> external (gmsh) index, for an `n`-node hex.
pub fn structured_to_gmsh_hex(n: usize) -> oga_base::Result<Perm> {
    if let Some(hit) = HEX_INV.read().get(&n) {
        return Ok(hit.clone());
    }
    let fwd = gmsh_to_structured_hex(n)?;
    Ok(cached(&HEX_INV, n, || invert(&fwd)))
}
