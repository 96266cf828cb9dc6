//! Layout configuration.

use serde::{Deserialize, Serialize};
use strawframe_materials::{MaterialId, MaterialLookup, DEFAULT_STRAWBALE};

use crate::error::{ConstructionError, Result};

/// Post configuration, discriminated by `type`.
///
/// Unknown `type` tags fail to deserialize, which is the only way an
/// unrecognized post variant can reach the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PostConfig {
    /// One post spanning the full wall depth.
    Full(FullPostConfig),
    /// Two posts at the wall faces with infill between them.
    Double(DoublePostConfig),
}

/// A single post as deep as the wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullPostConfig {
    /// Post width along the wall (mm).
    pub width: f64,
    /// Post material.
    pub material: MaterialId,
}

/// Two posts flush with the wall faces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoublePostConfig {
    /// Post width along the wall (mm).
    pub width: f64,
    /// Thickness of each post across the wall (mm).
    pub thickness: f64,
    /// Post material.
    pub material: MaterialId,
    /// Material between the posts.
    pub infill_material: MaterialId,
}

impl PostConfig {
    /// Parse from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ConstructionError::Config(e.to_string()))
    }

    /// Validate dimensions.
    pub fn validate(&self) -> Result<()> {
        let (width, thickness) = match self {
            PostConfig::Full(c) => (c.width, None),
            PostConfig::Double(c) => (c.width, Some(c.thickness)),
        };
        if width <= 0.0 {
            return Err(ConstructionError::Config(
                "post width must be positive".into(),
            ));
        }
        if thickness.is_some_and(|t| t <= 0.0) {
            return Err(ConstructionError::Config(
                "post thickness must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Triangular corner battens along the wall faces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangularBattenConfig {
    /// Leg length of the triangular cross-section (mm).
    pub size: f64,
    /// Batten material.
    pub material: MaterialId,
    /// Place battens on the inside face.
    #[serde(default = "default_true")]
    pub inside: bool,
    /// Place battens on the outside face.
    #[serde(default = "default_true")]
    pub outside: bool,
    /// Shorter runs are skipped (mm).
    #[serde(default)]
    pub min_length: f64,
}

fn default_true() -> bool {
    true
}

impl TriangularBattenConfig {
    /// Validate dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.size <= 0.0 {
            return Err(ConstructionError::Config(
                "batten size must be positive".into(),
            ));
        }
        if self.min_length < 0.0 {
            return Err(ConstructionError::Config(
                "batten min_length must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Engine-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionSettings {
    /// Straw material used when a straw layout names none.
    pub default_straw_material: MaterialId,
}

impl Default for ConstructionSettings {
    fn default() -> Self {
        Self {
            default_straw_material: MaterialId::new(DEFAULT_STRAWBALE),
        }
    }
}

/// Collaborators a layout reads from.
#[derive(Clone, Copy)]
pub struct ConstructionContext<'a> {
    /// Material lookup.
    pub materials: &'a dyn MaterialLookup,
    /// Engine settings.
    pub settings: &'a ConstructionSettings,
}

impl<'a> ConstructionContext<'a> {
    /// Bundle a lookup and settings.
    pub fn new(materials: &'a dyn MaterialLookup, settings: &'a ConstructionSettings) -> Self {
        Self {
            materials,
            settings,
        }
    }
}
