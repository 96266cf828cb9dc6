//! The wall region a layout fills.

use serde::{Deserialize, Deserializer, Serialize};
use strawframe_math::{Bounds3, Point3, Transform, Vec3};

/// A wall segment's construction region.
///
/// Local axes: x runs along the wall (width), y across it (depth), z up
/// (height). Sloped tops are described by non-positive offsets of the top
/// edge at the start and end of the wall, relative to `size.z`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallConstructionArea {
    /// World position of the local origin.
    pub position: Point3,
    /// Width, depth and height.
    pub size: Vec3,
    /// Top edge offsets `[start, end]` for sloped walls. Positive offsets
    /// are clamped to zero on load.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "non_positive_offsets"
    )]
    pub top_offsets: Option<[f64; 2]>,
}

fn non_positive_offsets<'de, D>(deserializer: D) -> Result<Option<[f64; 2]>, D::Error>
where
    D: Deserializer<'de>,
{
    let offsets = Option::<[f64; 2]>::deserialize(deserializer)?;
    Ok(offsets.map(|o| o.map(|v| v.min(0.0))))
}

impl WallConstructionArea {
    /// A box-shaped area.
    pub fn new(position: Point3, size: Vec3) -> Self {
        Self {
            position,
            size,
            top_offsets: None,
        }
    }

    /// A sloped area whose top drops by `start` / `end` at either edge.
    /// Positive offsets are clamped to zero.
    pub fn with_top_offsets(mut self, start: f64, end: f64) -> Self {
        self.top_offsets = Some([start.min(0.0), end.min(0.0)]);
        self
    }

    /// Extent along the wall.
    pub fn width(&self) -> f64 {
        self.size.x
    }

    /// Extent across the wall.
    pub fn depth(&self) -> f64 {
        self.size.y
    }

    /// Full height of the bounding box.
    pub fn height(&self) -> f64 {
        self.size.z
    }

    /// Height of the top edge at the start of the wall.
    pub fn height_at_start(&self) -> f64 {
        self.size.z + self.top_offsets.map_or(0.0, |o| o[0].min(0.0))
    }

    /// Height of the top edge at the end of the wall.
    pub fn height_at_end(&self) -> f64 {
        self.size.z + self.top_offsets.map_or(0.0, |o| o[1].min(0.0))
    }

    /// Lowest point of the top edge.
    pub fn min_height(&self) -> f64 {
        self.height_at_start().min(self.height_at_end())
    }

    /// True unless the top edge drops anywhere (gable or shed walls).
    pub fn is_flat_top(&self) -> bool {
        self.min_height() == self.height()
    }

    /// Transform placing local coordinates in the world.
    pub fn placement(&self) -> Transform {
        Transform::translation_by(&self.position.coords)
    }

    /// World-space bounds of the area.
    pub fn bounds(&self) -> Bounds3 {
        Bounds3::from_origin_size(&self.position, &self.size)
    }
}
