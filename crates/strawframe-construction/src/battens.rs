//! Triangular batten layout.
//!
//! Battens run along the corners where the wall faces meet the surrounding
//! frame: up the start and end edges, and along the bottom and top. Each one
//! is a right triangle with both legs on frame faces, so the hypotenuse
//! faces into the wall cavity.

use strawframe_math::{Point2, Transform, Vec3};

use crate::area::WallConstructionArea;
use crate::config::TriangularBattenConfig;
use crate::element::{
    ConstructionElement, ExtrusionPlane, IdSequence, PartInfo, PartKind, Shape, Tag,
};
use crate::results::ConstructionResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    Inside,
    Outside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    End,
    Bottom,
    Top,
}

/// Lay out triangular battens for `area`.
///
/// Runs shorter than `config.min_length` are skipped, as are top battens on
/// walls whose top edge slopes.
pub fn construct_triangular_battens(
    area: &WallConstructionArea,
    config: &TriangularBattenConfig,
) -> impl Iterator<Item = ConstructionResult> {
    let mut ids = IdSequence::new("triangular-batten");
    let mut results = Vec::new();

    let faces = [(Face::Inside, config.inside), (Face::Outside, config.outside)];
    for (face, enabled) in faces {
        if !enabled {
            continue;
        }
        for edge in [Edge::Start, Edge::End, Edge::Bottom, Edge::Top] {
            if edge == Edge::Top && !area.is_flat_top() {
                tracing::debug!(?face, "sloped top, no top batten");
                continue;
            }
            let length = run_length(area, edge, config.size);
            if length < config.min_length {
                tracing::debug!(?face, ?edge, length, "batten run too short");
                continue;
            }
            let element = batten(&mut ids, area, config, face, edge, length);
            results.push(ConstructionResult::Element(element));
        }
    }
    results.into_iter()
}

fn run_length(area: &WallConstructionArea, edge: Edge, size: f64) -> f64 {
    match edge {
        Edge::Start => area.height_at_start() - 2.0 * size,
        Edge::End => area.height_at_end() - 2.0 * size,
        Edge::Bottom | Edge::Top => area.width() - 2.0 * size,
    }
}

fn batten(
    ids: &mut IdSequence,
    area: &WallConstructionArea,
    config: &TriangularBattenConfig,
    face: Face,
    edge: Edge,
    length: f64,
) -> ConstructionElement {
    let s = config.size;

    // Across the wall the inside face is at y = 0, the outside face at y = depth.
    let (v, dv) = match face {
        Face::Inside => (0.0, 1.0),
        Face::Outside => (area.depth(), -1.0),
    };

    // Vertical battens are drawn in plan (x, y) and swept up from z = s;
    // horizontal ones in section (y, z) and swept along from x = s.
    let (plane, corner, legs, start) = match edge {
        Edge::Start => (
            ExtrusionPlane::Xy,
            (0.0, v),
            (1.0, dv),
            Vec3::new(0.0, 0.0, s),
        ),
        Edge::End => (
            ExtrusionPlane::Xy,
            (area.width(), v),
            (-1.0, dv),
            Vec3::new(0.0, 0.0, s),
        ),
        Edge::Bottom => (
            ExtrusionPlane::Yz,
            (v, 0.0),
            (dv, 1.0),
            Vec3::new(s, 0.0, 0.0),
        ),
        Edge::Top => (
            ExtrusionPlane::Yz,
            (v, area.height()),
            (dv, -1.0),
            Vec3::new(s, 0.0, 0.0),
        ),
    };

    let shape = Shape::ExtrudedPolygon {
        outline: triangle(corner, legs, s),
        plane,
        extrude_length: length,
    };
    let transform = area.placement().then(&Transform::translation_by(&start));
    let side = match face {
        Face::Inside => Tag::Inside,
        Face::Outside => Tag::Outside,
    };

    ConstructionElement::new(ids.next_id(), config.material.clone(), shape, transform)
        .with_tags([Tag::TriangularBatten, side])
        .with_part(PartInfo::new(PartKind::TriangularBatten, Vec3::new(s, s, length)))
}

/// Right triangle with its right angle at `corner` and legs of `size` along
/// the directions `legs`, wound counter-clockwise.
fn triangle(corner: (f64, f64), legs: (f64, f64), size: f64) -> Vec<Point2> {
    let (cu, cv) = corner;
    let (du, dv) = legs;
    let right_angle = Point2::new(cu, cv);
    let along_u = Point2::new(cu + du * size, cv);
    let along_v = Point2::new(cu, cv + dv * size);
    if du * dv > 0.0 {
        vec![right_angle, along_u, along_v]
    } else {
        vec![right_angle, along_v, along_u]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::aggregate_results;
    use approx::assert_abs_diff_eq;
    use strawframe_math::Point3;

    fn config(min_length: f64) -> TriangularBattenConfig {
        TriangularBattenConfig {
            size: 30.0,
            material: "batten".into(),
            inside: true,
            outside: true,
            min_length,
        }
    }

    fn area(width: f64, height: f64) -> WallConstructionArea {
        WallConstructionArea::new(Point3::new(0.0, 0.0, 0.0), Vec3::new(width, 360.0, height))
    }

    fn signed_area(outline: &[Point2]) -> f64 {
        let n = outline.len();
        (0..n)
            .map(|i| {
                let (a, b) = (outline[i], outline[(i + 1) % n]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            / 2.0
    }

    #[test]
    fn test_all_eight_battens() {
        let wall = area(1000.0, 2500.0);
        let results = aggregate_results(construct_triangular_battens(&wall, &config(0.0)));
        assert_eq!(results.elements.len(), 8);
        let inside = results.elements.iter().filter(|e| e.has_tag(Tag::Inside));
        assert_eq!(inside.count(), 4);
        for element in &results.elements {
            assert!(element.has_tag(Tag::TriangularBatten));
            let Shape::ExtrudedPolygon { outline, .. } = element.shape() else {
                panic!("batten must be extruded");
            };
            assert_abs_diff_eq!(signed_area(outline), 450.0);
        }
    }

    #[test]
    fn test_vertical_batten_geometry() {
        let wall = area(1000.0, 2500.0);
        let results = aggregate_results(construct_triangular_battens(&wall, &config(0.0)));
        let start_inside = &results.elements[0];
        let b = start_inside.bounds();
        assert_abs_diff_eq!(b.min.x, 0.0);
        assert_abs_diff_eq!(b.max.x, 30.0);
        assert_abs_diff_eq!(b.min.y, 0.0);
        assert_abs_diff_eq!(b.max.y, 30.0);
        assert_abs_diff_eq!(b.min.z, 30.0);
        assert_abs_diff_eq!(b.max.z, 2470.0);

        let end_outside = &results.elements[5];
        let b = end_outside.bounds();
        assert_abs_diff_eq!(b.min.x, 970.0);
        assert_abs_diff_eq!(b.max.x, 1000.0);
        assert_abs_diff_eq!(b.min.y, 330.0);
        assert_abs_diff_eq!(b.max.y, 360.0);
    }

    #[test]
    fn test_horizontal_batten_geometry() {
        let wall = area(1000.0, 2500.0);
        let results = aggregate_results(construct_triangular_battens(&wall, &config(0.0)));
        let top_inside = &results.elements[3];
        let b = top_inside.bounds();
        assert_abs_diff_eq!(b.min.x, 30.0);
        assert_abs_diff_eq!(b.max.x, 970.0);
        assert_abs_diff_eq!(b.min.z, 2470.0);
        assert_abs_diff_eq!(b.max.z, 2500.0);
        assert_eq!(top_inside.part().unwrap().size, Vec3::new(30.0, 30.0, 940.0));
    }

    #[test]
    fn test_orientations_are_distinct() {
        let wall = area(1000.0, 2500.0);
        let results = aggregate_results(construct_triangular_battens(&wall, &config(0.0)));
        let outlines: Vec<_> = results
            .elements
            .iter()
            .map(|e| match e.shape() {
                Shape::ExtrudedPolygon { outline, plane, .. } => (*plane, outline.clone()),
                Shape::Cuboid { .. } => unreachable!(),
            })
            .collect();
        for (i, a) in outlines.iter().enumerate() {
            for b in &outlines[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_min_length_gating() {
        // vertical runs 2500 - 60 = 2440, horizontal 160 - 60 = 100
        let wall = area(160.0, 2500.0);
        let emitted = aggregate_results(construct_triangular_battens(&wall, &config(100.0)));
        assert_eq!(emitted.elements.len(), 8);

        let wall = area(159.0, 2500.0);
        let omitted = aggregate_results(construct_triangular_battens(&wall, &config(100.0)));
        assert_eq!(omitted.elements.len(), 4);
        assert!(omitted.elements.iter().all(|e| e.bounds().size().z > 100.0));
    }

    #[test]
    fn test_sloped_wall_skips_top_and_shortens_end() {
        let wall = area(1000.0, 2500.0).with_top_offsets(0.0, -500.0);
        let results = aggregate_results(construct_triangular_battens(&wall, &config(0.0)));
        assert_eq!(results.elements.len(), 6);
        let end_inside = &results.elements[1];
        assert_abs_diff_eq!(end_inside.bounds().max.z, 1970.0);
    }

    #[test]
    fn test_loaded_positive_offset_stays_inside_area() {
        let json = r#"{
            "position": [0.0, 0.0, 0.0],
            "size": [1000.0, 360.0, 2500.0],
            "top_offsets": [300.0, 0.0]
        }"#;
        let wall: WallConstructionArea = serde_json::from_str(json).unwrap();
        let mut cfg = config(0.0);
        cfg.outside = false;

        let results = aggregate_results(construct_triangular_battens(&wall, &cfg));
        assert_eq!(results.elements.len(), 4);
        let outer = wall.bounds();
        for element in &results.elements {
            assert!(element.bounds().max.z <= outer.max.z + 1e-9);
        }
        assert_abs_diff_eq!(results.elements[0].bounds().max.z, 2470.0);
    }

    #[test]
    fn test_faces_can_be_disabled() {
        let mut cfg = config(0.0);
        cfg.outside = false;
        let results = aggregate_results(construct_triangular_battens(&area(1000.0, 2500.0), &cfg));
        assert_eq!(results.elements.len(), 4);
        assert!(results.elements.iter().all(|e| e.has_tag(Tag::Inside)));

        cfg.inside = false;
        let results = aggregate_results(construct_triangular_battens(&area(1000.0, 2500.0), &cfg));
        assert!(results.is_empty());
    }
}
