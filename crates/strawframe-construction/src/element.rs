//! Construction elements: the leaf parts every layout emits.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use strawframe_materials::MaterialId;
use strawframe_math::{Bounds3, Point2, Point3, Transform, Vec3};

/// Identifier of an emitted element.
///
/// Ids are assigned from a per-invocation counter, so the same inputs always
/// yield the same ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hands out `<prefix>-<n>` ids for one layout invocation.
#[derive(Debug, Clone)]
pub(crate) struct IdSequence {
    prefix: &'static str,
    next: usize,
}

impl IdSequence {
    pub(crate) fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 0 }
    }

    pub(crate) fn next_id(&mut self) -> ElementId {
        let id = ElementId(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// Descriptive tag attached to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Tag {
    /// Load-bearing post.
    Post,
    /// Filler between two posts.
    Infill,
    /// Stands in for geometry that could not be laid out.
    Placeholder,
    /// Any straw element.
    Strawbale,
    /// Bale within tolerance of nominal size.
    FullBale,
    /// Bale cut down in one dimension.
    PartialBale,
    /// Strip of bale flakes.
    StrawFlakes,
    /// Loose straw stuffed into a gap.
    StrawStuffed,
    /// Diagonal corner batten.
    TriangularBatten,
    /// Sits on the inside face of the wall.
    Inside,
    /// Sits on the outside face of the wall.
    Outside,
}

impl Tag {
    /// Kebab-case name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Post => "post",
            Tag::Infill => "infill",
            Tag::Placeholder => "placeholder",
            Tag::Strawbale => "strawbale",
            Tag::FullBale => "full-bale",
            Tag::PartialBale => "partial-bale",
            Tag::StrawFlakes => "straw-flakes",
            Tag::StrawStuffed => "straw-stuffed",
            Tag::TriangularBatten => "triangular-batten",
            Tag::Inside => "inside",
            Tag::Outside => "outside",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The plane an extrusion outline is drawn in. The extrusion runs along the
/// remaining axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtrusionPlane {
    /// Outline in (x, y), extruded along z.
    Xy,
    /// Outline in (y, z), extruded along x.
    Yz,
}

impl ExtrusionPlane {
    /// Lift an outline point to 3D at `depth` along the extrusion axis.
    pub fn lift(&self, p: &Point2, depth: f64) -> Point3 {
        match self {
            ExtrusionPlane::Xy => Point3::new(p.x, p.y, depth),
            ExtrusionPlane::Yz => Point3::new(depth, p.x, p.y),
        }
    }
}

/// Geometry of an element in its local frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// Axis-aligned box spanning `offset .. offset + size`.
    Cuboid {
        /// Minimum corner.
        offset: Vec3,
        /// Extents along x, y, z.
        size: Vec3,
    },
    /// Planar polygon swept along the plane normal from 0 to `extrude_length`.
    ExtrudedPolygon {
        /// Closed outline, counter-clockwise in plane coordinates.
        outline: Vec<Point2>,
        /// Plane of the outline.
        plane: ExtrusionPlane,
        /// Sweep distance.
        extrude_length: f64,
    },
}

impl Shape {
    /// Vertices of the shape's convex hull in the local frame.
    fn hull_vertices(&self) -> Vec<Point3> {
        match self {
            Shape::Cuboid { offset, size } => {
                let mut corners = Vec::with_capacity(8);
                for dx in [0.0, size.x] {
                    for dy in [0.0, size.y] {
                        for dz in [0.0, size.z] {
                            corners.push(Point3::new(offset.x + dx, offset.y + dy, offset.z + dz));
                        }
                    }
                }
                corners
            }
            Shape::ExtrudedPolygon {
                outline,
                plane,
                extrude_length,
            } => outline
                .iter()
                .flat_map(|p| [plane.lift(p, 0.0), plane.lift(p, *extrude_length)])
                .collect(),
        }
    }
}

/// What an element is for the parts list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PartKind {
    /// Timber post.
    Post,
    /// Infill between double posts.
    Infill,
    /// Uncut straw bale.
    FullBale,
    /// Straw bale cut to size.
    PartialBale,
    /// Flakes pulled from a bale.
    StrawFlakes,
    /// Loose straw.
    StuffedStraw,
    /// Triangular batten.
    TriangularBatten,
}

impl PartKind {
    /// Kebab-case name, as serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            PartKind::Post => "post",
            PartKind::Infill => "infill",
            PartKind::FullBale => "full-bale",
            PartKind::PartialBale => "partial-bale",
            PartKind::StrawFlakes => "straw-flakes",
            PartKind::StuffedStraw => "stuffed-straw",
            PartKind::TriangularBatten => "triangular-batten",
        }
    }
}

/// Bill-of-materials metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PartInfo {
    /// Kind of part.
    pub kind: PartKind,
    /// Nominal dimensions of the part.
    pub size: Vec3,
}

impl PartInfo {
    /// Create part metadata.
    pub fn new(kind: PartKind, size: Vec3) -> Self {
        Self { kind, size }
    }
}

/// A leaf physical part produced by a layout.
///
/// Elements are immutable: the bounds are computed from the shape and
/// transform when the element is created and cannot go stale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructionElement {
    id: ElementId,
    material: MaterialId,
    shape: Shape,
    transform: Transform,
    tags: BTreeSet<Tag>,
    bounds: Bounds3,
    #[serde(skip_serializing_if = "Option::is_none")]
    part: Option<PartInfo>,
}

impl ConstructionElement {
    /// Create an element with no tags and no part metadata.
    pub fn new(id: ElementId, material: MaterialId, shape: Shape, transform: Transform) -> Self {
        let world: Vec<Point3> = shape
            .hull_vertices()
            .iter()
            .map(|p| transform.apply_point(p))
            .collect();
        let bounds = Bounds3::from_points(&world);
        Self {
            id,
            material,
            shape,
            transform,
            tags: BTreeSet::new(),
            bounds,
            part: None,
        }
    }

    /// Create a box element spanning `offset .. offset + size` before the transform.
    pub fn cuboid(
        id: ElementId,
        material: MaterialId,
        offset: Vec3,
        size: Vec3,
        transform: Transform,
    ) -> Self {
        Self::new(id, material, Shape::Cuboid { offset, size }, transform)
    }

    /// Add tags.
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        self.tags.extend(tags);
        self
    }

    /// Attach part metadata.
    pub fn with_part(mut self, part: PartInfo) -> Self {
        self.part = Some(part);
        self
    }

    /// Element id.
    pub fn id(&self) -> &ElementId {
        &self.id
    }

    /// Material reference.
    pub fn material(&self) -> &MaterialId {
        &self.material
    }

    /// Local geometry.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Placement transform.
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Tags in sorted order.
    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    /// True if the element carries `tag`.
    pub fn has_tag(&self, tag: Tag) -> bool {
        self.tags.contains(&tag)
    }

    /// World-space axis-aligned bounds.
    pub fn bounds(&self) -> &Bounds3 {
        &self.bounds
    }

    /// Part metadata, if any.
    pub fn part(&self) -> Option<&PartInfo> {
        self.part.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_id_sequence_is_deterministic() {
        let mut ids = IdSequence::new("post");
        assert_eq!(ids.next_id().as_str(), "post-0");
        assert_eq!(ids.next_id().as_str(), "post-1");
        assert_eq!(IdSequence::new("post").next_id().as_str(), "post-0");
    }

    #[test]
    fn test_cuboid_bounds_follow_transform() {
        let element = ConstructionElement::cuboid(
            IdSequence::new("t").next_id(),
            "timber".into(),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(60.0, 120.0, 2500.0),
            Transform::translation(1000.0, 500.0, 0.0),
        );
        let b = element.bounds();
        assert_abs_diff_eq!(b.min.x, 1010.0);
        assert_abs_diff_eq!(b.min.y, 500.0);
        assert_abs_diff_eq!(b.max.x, 1070.0);
        assert_abs_diff_eq!(b.max.y, 620.0);
        assert_abs_diff_eq!(b.max.z, 2500.0);
    }

    #[test]
    fn test_extruded_polygon_bounds() {
        let shape = Shape::ExtrudedPolygon {
            outline: vec![
                Point2::new(0.0, 0.0),
                Point2::new(30.0, 0.0),
                Point2::new(0.0, 30.0),
            ],
            plane: ExtrusionPlane::Yz,
            extrude_length: 940.0,
        };
        let element = ConstructionElement::new(
            IdSequence::new("b").next_id(),
            "batten".into(),
            shape,
            Transform::translation(30.0, 0.0, 0.0),
        );
        let b = element.bounds();
        assert_abs_diff_eq!(b.min.x, 30.0);
        assert_abs_diff_eq!(b.max.x, 970.0);
        assert_abs_diff_eq!(b.max.y, 30.0);
        assert_abs_diff_eq!(b.max.z, 30.0);
    }

    #[test]
    fn test_tags_are_a_sorted_set() {
        let element = ConstructionElement::cuboid(
            IdSequence::new("s").next_id(),
            "straw".into(),
            Vec3::zeros(),
            Vec3::new(1.0, 1.0, 1.0),
            Transform::identity(),
        )
        .with_tags([Tag::FullBale, Tag::Strawbale, Tag::FullBale]);
        let tags: Vec<_> = element.tags().iter().map(Tag::as_str).collect();
        assert_eq!(tags, ["strawbale", "full-bale"]);
        assert!(element.has_tag(Tag::Strawbale));
        assert!(element.part().is_none());
    }
}
