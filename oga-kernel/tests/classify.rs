use oga_base::cgmath64::Point3;
use oga_kernel::{classify, ClassifierConfig, CutFlag, Element, Facet};

fn cube_at(cx: f64, cy: f64, cz: f64, half: f64) -> Element {
    Element::new(
        [
            (-1.0, -1.0, -1.0),
            (1.0, -1.0, -1.0),
            (1.0, 1.0, -1.0),
            (-1.0, 1.0, -1.0),
            (-1.0, -1.0, 1.0),
            (1.0, -1.0, 1.0),
            (1.0, 1.0, 1.0),
            (-1.0, 1.0, 1.0),
        ]
        .into_iter()
        .map(|(x, y, z)| Point3::new(cx + x * half, cy + y * half, cz + z * half))
        .collect(),
    )
}

fn cutting_plane_at(z: f64) -> Vec<Facet> {
    vec![Facet::new(vec![
        Point3::new(-20.0, -20.0, z),
        Point3::new(20.0, -20.0, z),
        Point3::new(20.0, 20.0, z),
        Point3::new(-20.0, 20.0, z),
    ])]
}

#[test]
fn a_donor_block_split_by_a_hole_boundary_is_classified_on_both_sides() {
    let donor_block = vec![cube_at(0.0, 0.0, -5.0, 1.0), cube_at(0.0, 0.0, 5.0, 1.0)];
    let hole_boundary = cutting_plane_at(0.0);
    let config = ClassifierConfig::default();

    let results = classify(&donor_block, &hole_boundary, &config, 1);
    assert_ne!(results[0].flag, CutFlag::Unassigned);
    assert_ne!(results[1].flag, CutFlag::Unassigned);
    assert_ne!(results[0].flag, results[1].flag);
}

#[test]
fn an_element_straddling_the_cutting_surface_is_flagged_cut() {
    let straddling = vec![cube_at(0.0, 0.0, 0.0, 1.0)];
    let hole_boundary = cutting_plane_at(0.0);
    let config = ClassifierConfig::default();

    let results = classify(&straddling, &hole_boundary, &config, 1);
    assert_eq!(results[0].flag, CutFlag::Cut);
}

#[test]
fn an_element_with_no_nearby_cutting_facets_is_unassigned() {
    let isolated = vec![cube_at(1000.0, 1000.0, 1000.0, 1.0)];
    let hole_boundary = cutting_plane_at(0.0);
    let config = ClassifierConfig::default();

    let results = classify(&isolated, &hole_boundary, &config, 1);
    assert_eq!(results[0].flag, CutFlag::Unassigned);
}

#[test]
fn cut_type_flips_which_side_is_the_hole() {
    let below = vec![cube_at(0.0, 0.0, -5.0, 1.0)];
    let hole_boundary = cutting_plane_at(0.0);
    let config = ClassifierConfig::default();

    let with_cut_type_1 = classify(&below, &hole_boundary, &config, 1)[0].flag;
    let with_cut_type_0 = classify(&below, &hole_boundary, &config, 0)[0].flag;
    assert_ne!(with_cut_type_1, with_cut_type_0);
}
