#![warn(missing_docs)]

//! Math types for the strawframe construction engine.
//!
//! Thin wrappers around nalgebra providing the geometry the layout
//! algorithms consume: points, vectors, placement transforms, axis-aligned
//! bounds, and the linear tolerance.

use nalgebra::{Matrix4, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A point in a 2D plane (extrusion outlines).
pub type Point2 = nalgebra::Point2<f64>;

/// A 4x4 affine placement transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Identity transform.
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Translation by a vector.
    pub fn translation_by(offset: &Vec3) -> Self {
        Self::translation(offset.x, offset.y, offset.z)
    }

    /// Compose: `self` then `other` (self * other).
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in mm.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (1e-6 mm).
    pub const DEFAULT: Self = Self { linear: 1e-6 };
}

/// Axis-aligned bounding box in 3D.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds3 {
    /// Minimum corner.
    pub min: Point3,
    /// Maximum corner.
    pub max: Point3,
}

impl Bounds3 {
    /// Create bounds from min and max corners.
    pub fn new(min: Point3, max: Point3) -> Self {
        Self { min, max }
    }

    /// Bounds of a box starting at `origin` with extents `size`.
    pub fn from_origin_size(origin: &Point3, size: &Vec3) -> Self {
        Self::new(*origin, origin + size)
    }

    /// Create empty (inverted) bounds suitable for expansion.
    pub fn empty() -> Self {
        Self {
            min: Point3::new(f64::INFINITY, f64::INFINITY, f64::INFINITY),
            max: Point3::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Tight bounds of a set of points. Empty when there are none.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point3>) -> Self {
        let mut bounds = Self::empty();
        for p in points {
            bounds.include_point(p);
        }
        bounds
    }

    /// True if no point was ever included.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Expand to include a point.
    pub fn include_point(&mut self, p: &Point3) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.min.z = self.min.z.min(p.z);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
        self.max.z = self.max.z.max(p.z);
    }

    /// Smallest bounds containing both.
    pub fn union(&self, other: &Bounds3) -> Bounds3 {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let mut merged = *self;
        merged.include_point(&other.min);
        merged.include_point(&other.max);
        merged
    }

    /// Extent along each axis (zero for empty bounds).
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            return Vec3::zeros();
        }
        self.max - self.min
    }

    /// Enclosed volume.
    pub fn volume(&self) -> f64 {
        let s = self.size();
        s.x * s.y * s.z
    }

    /// Test if the interiors of two boxes overlap by more than `tol` on
    /// every axis. Touching faces do not count.
    pub fn overlaps_interior(&self, other: &Bounds3, tol: f64) -> bool {
        self.min.x < other.max.x - tol
            && self.max.x > other.min.x + tol
            && self.min.y < other.max.y - tol
            && self.max.y > other.min.y + tol
            && self.min.z < other.max.z - tol
            && self.max.z > other.min.z + tol
    }

    /// Corner-wise comparison within `tol`.
    pub fn approx_eq(&self, other: &Bounds3, tol: f64) -> bool {
        (self.min - other.min).abs().max() <= tol && (self.max - other.max).abs().max() <= tol
    }
}
