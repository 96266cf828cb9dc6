//! Material records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::MaterialError;

/// Identifier of a material in a catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(pub String);

impl MaterialId {
    /// Create a new id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MaterialId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A material definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Unique identifier.
    pub id: MaterialId,
    /// Human-readable name.
    pub name: String,
    /// Display color (e.g. `"#c8a24a"`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Type-specific record.
    #[serde(flatten)]
    pub kind: MaterialKind,
}

impl Material {
    /// Create a material.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: MaterialKind) -> Self {
        Self {
            id: MaterialId::new(id),
            name: name.into(),
            color: None,
            kind,
        }
    }

    /// Short name of the material type, as used in the `type` tag.
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// The dimensional record, if this is a dimensional material.
    pub fn as_dimensional(&self) -> Option<&DimensionalMaterial> {
        match &self.kind {
            MaterialKind::Dimensional(d) => Some(d),
            _ => None,
        }
    }

    /// The strawbale record, if this is a strawbale material.
    pub fn as_strawbale(&self) -> Option<&StrawbaleMaterial> {
        match &self.kind {
            MaterialKind::Strawbale(s) => Some(s),
            _ => None,
        }
    }

    /// Check the record for values no layout can work with.
    pub fn validate(&self) -> Result<(), MaterialError> {
        match &self.kind {
            MaterialKind::Dimensional(d) => d.validate(&self.id),
            MaterialKind::Strawbale(s) => s.validate(&self.id),
            _ => Ok(()),
        }
    }
}

/// Type-specific material data, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MaterialKind {
    /// Sawn timber and other stock sold in fixed cross-sections.
    Dimensional(DimensionalMaterial),
    /// Straw bales.
    Strawbale(StrawbaleMaterial),
    /// Boards and panels.
    Sheet(SheetMaterial),
    /// Loose fill measured by volume.
    Volume(VolumeMaterial),
    /// Anything without dimensional constraints.
    Generic {},
    /// Prefabricated modules.
    Prefab(PrefabMaterial),
}

impl MaterialKind {
    /// Short name of the variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            MaterialKind::Dimensional(_) => "dimensional",
            MaterialKind::Strawbale(_) => "strawbale",
            MaterialKind::Sheet(_) => "sheet",
            MaterialKind::Volume(_) => "volume",
            MaterialKind::Generic {} => "generic",
            MaterialKind::Prefab(_) => "prefab",
        }
    }
}

/// A pair of cross-section dimensions, normalized so `smaller <= bigger`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    /// The smaller side.
    pub smaller: f64,
    /// The bigger side.
    pub bigger: f64,
}

impl CrossSection {
    /// Create a cross-section from two sides in any order.
    pub fn new(a: f64, b: f64) -> Self {
        Self {
            smaller: a.min(b),
            bigger: a.max(b),
        }
    }

    /// Exact, swap-invariant comparison with a pair of sides.
    pub fn matches(&self, a: f64, b: f64) -> bool {
        let other = Self::new(a, b);
        self.smaller == other.smaller && self.bigger == other.bigger
    }
}

impl fmt::Display for CrossSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.smaller, self.bigger)
    }
}

/// Stock with fixed cross-sections and lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionalMaterial {
    /// Available cross-sections.
    pub cross_sections: Vec<CrossSection>,
    /// Available stock lengths (mm).
    #[serde(default)]
    pub lengths: Vec<f64>,
}

impl DimensionalMaterial {
    /// True if any available cross-section matches `(a, b)` in either order.
    pub fn has_cross_section(&self, a: f64, b: f64) -> bool {
        self.cross_sections.iter().any(|cs| cs.matches(a, b))
    }

    fn validate(&self, id: &MaterialId) -> Result<(), MaterialError> {
        if self.cross_sections.is_empty() {
            return Err(MaterialError::Invalid {
                id: id.clone(),
                reason: "dimensional material has no cross-sections".into(),
            });
        }
        if let Some(cs) = self
            .cross_sections
            .iter()
            .find(|cs| cs.smaller <= 0.0 || cs.smaller > cs.bigger)
        {
            return Err(MaterialError::Invalid {
                id: id.clone(),
                reason: format!("invalid cross-section {cs}"),
            });
        }
        Ok(())
    }
}

/// Straw bale dimensions and laying limits (all mm).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrawbaleMaterial {
    /// Shortest bale the baler produces.
    pub bale_min_length: f64,
    /// Longest bale the baler produces.
    pub bale_max_length: f64,
    /// Bale height when laid flat.
    pub bale_height: f64,
    /// Bale width, the nominal wall thickness.
    pub bale_width: f64,
    /// Allowed deviation before a dimension stops matching nominal.
    pub tolerance: f64,
    /// Largest sliver that may be cut off the top of a bale course.
    pub top_cutoff_limit: f64,
    /// Thinnest strip still placed as flakes instead of stuffed straw.
    pub flake_size: f64,
}

impl StrawbaleMaterial {
    fn validate(&self, id: &MaterialId) -> Result<(), MaterialError> {
        let positive = [
            ("bale_min_length", self.bale_min_length),
            ("bale_max_length", self.bale_max_length),
            ("bale_height", self.bale_height),
            ("bale_width", self.bale_width),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(MaterialError::Invalid {
                    id: id.clone(),
                    reason: format!("{field} must be positive, got {value}"),
                });
            }
        }
        if self.bale_min_length > self.bale_max_length {
            return Err(MaterialError::Invalid {
                id: id.clone(),
                reason: "bale_min_length exceeds bale_max_length".into(),
            });
        }
        if self.tolerance < 0.0 || self.top_cutoff_limit < 0.0 || self.flake_size < 0.0 {
            return Err(MaterialError::Invalid {
                id: id.clone(),
                reason: "tolerance, top_cutoff_limit and flake_size must not be negative".into(),
            });
        }
        Ok(())
    }
}

/// Boards and panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetMaterial {
    /// Sheet width (mm).
    pub width: f64,
    /// Sheet length (mm).
    pub length: f64,
    /// Available thicknesses (mm).
    #[serde(default)]
    pub thicknesses: Vec<f64>,
}

/// Loose fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeMaterial {
    /// Package volumes (litres).
    #[serde(default)]
    pub available_volumes: Vec<f64>,
}

/// Prefabricated modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefabMaterial {
    /// Smallest module width (mm).
    pub min_width: f64,
    /// Largest module width (mm).
    pub max_width: f64,
    /// Smallest module height (mm).
    pub min_height: f64,
    /// Largest module height (mm).
    pub max_height: f64,
}
