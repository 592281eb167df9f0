//! Tunable knobs for a classification run (spec §5), grouped the way the
//! teacher groups algorithm parameters into a plain `serde`-derived struct
//! rather than scattering free constants through the call graph.
use serde::{Deserialize, Serialize};

/// Configuration for a single direct-cut classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Gauss-Legendre points per axis used for volume quadrature (1-3).
    pub quadrature_order: usize,
    /// Trial budget for [`crate::refloc::ref_loc_newton`]'s Newton iteration
    /// before falling back to [`crate::nelder_mead::locate`].
    pub max_newton_trials: usize,
    /// Run [`crate::classify::classify_elements_parallel`] instead of the
    /// serial loop. Both are required to agree bit-for-bit (spec §5/§9),
    /// so this only affects wall-clock time.
    pub use_parallel: bool,
    /// Sub-sampling order `sorder` for an element's own hex-face surfaces
    /// (spec §4.8 step 3c): each face is split into `sorder^2` sub-quads,
    /// each triangulated, before the triangle-triangle kernel runs.
    pub surface_sub_order: usize,
    /// Sub-sampling order `sorderF` for a cutting facet, same as
    /// `surface_sub_order` but applied to the facet side of the pair.
    pub facet_sub_order: usize,
    /// `tol` passed to [`crate::tritri::triangle_triangle_distance`] (spec
    /// §4.7 step 1): edge-edge distances within this are snapped to 0.
    pub tritri_tol: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig {
            quadrature_order: 2,
            max_newton_trials: 20,
            use_parallel: true,
            surface_sub_order: 1,
            facet_sub_order: 1,
            tritri_tol: 1e-9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let cfg = ClassifierConfig::default();
        assert!((1..=3).contains(&cfg.quadrature_order));
        assert!(cfg.max_newton_trials > 0);
    }
}
