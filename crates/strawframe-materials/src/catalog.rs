//! In-memory material catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::material::{
    CrossSection, DimensionalMaterial, Material, MaterialId, MaterialKind, StrawbaleMaterial,
};
use crate::{MaterialError, MaterialLookup, Result};

/// Id of the built-in straw bale material.
pub const DEFAULT_STRAWBALE: &str = "strawbale";
/// Id of the built-in post timber.
pub const DEFAULT_POST_TIMBER: &str = "post-timber";
/// Id of the built-in infill between double posts.
pub const DEFAULT_POST_INFILL: &str = "post-infill";
/// Id of the built-in triangular batten stock.
pub const DEFAULT_TRIANGULAR_BATTEN: &str = "triangular-batten";

/// On-disk shape of a materials file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct MaterialsFile {
    #[serde(default)]
    materials: Vec<Material>,
}

/// A set of materials keyed by id, iterated in id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialCatalog {
    materials: BTreeMap<MaterialId, Material>,
}

impl MaterialCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The catalog shipped with the engine.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.insert(Material {
            color: Some("#d9b65c".into()),
            ..Material::new(
                DEFAULT_STRAWBALE,
                "Straw bale",
                MaterialKind::Strawbale(StrawbaleMaterial {
                    bale_min_length: 800.0,
                    bale_max_length: 900.0,
                    bale_height: 500.0,
                    bale_width: 360.0,
                    tolerance: 10.0,
                    top_cutoff_limit: 50.0,
                    flake_size: 70.0,
                }),
            )
        });
        catalog.insert(Material {
            color: Some("#a0703c".into()),
            ..Material::new(
                DEFAULT_POST_TIMBER,
                "Post timber",
                MaterialKind::Dimensional(DimensionalMaterial {
                    cross_sections: vec![
                        CrossSection::new(60.0, 120.0),
                        CrossSection::new(60.0, 360.0),
                        CrossSection::new(120.0, 360.0),
                    ],
                    lengths: vec![5000.0],
                }),
            )
        });
        catalog.insert(Material::new(
            DEFAULT_POST_INFILL,
            "Wood fibre infill",
            MaterialKind::Generic {},
        ));
        catalog.insert(Material::new(
            DEFAULT_TRIANGULAR_BATTEN,
            "Triangular batten",
            MaterialKind::Dimensional(DimensionalMaterial {
                cross_sections: vec![CrossSection::new(30.0, 30.0)],
                lengths: vec![2500.0, 4000.0],
            }),
        ));
        catalog
    }

    /// Build a catalog from materials, validating each one.
    pub fn from_materials(materials: impl IntoIterator<Item = Material>) -> Result<Self> {
        let mut catalog = Self::new();
        for material in materials {
            material.validate()?;
            if catalog.insert(material.clone()).is_some() {
                return Err(MaterialError::Duplicate(material.id));
            }
        }
        Ok(catalog)
    }

    /// Parse a TOML materials file (`[[materials]]` tables).
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let file: MaterialsFile = toml::from_str(source)?;
        Self::from_materials(file.materials)
    }

    /// Parse a JSON materials file (`{"materials": [...]}`).
    pub fn from_json_str(source: &str) -> Result<Self> {
        let file: MaterialsFile = serde_json::from_str(source)?;
        Self::from_materials(file.materials)
    }

    /// Load a materials file, choosing the format by extension
    /// (`.json`, anything else is read as TOML).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let catalog = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&source)?,
            _ => Self::from_toml_str(&source)?,
        };
        tracing::debug!(
            path = %path.display(),
            count = catalog.len(),
            "loaded material catalog"
        );
        Ok(catalog)
    }

    /// Insert a material, returning the one it replaced.
    pub fn insert(&mut self, material: Material) -> Option<Material> {
        self.materials.insert(material.id.clone(), material)
    }

    /// Layer `other` over this catalog; entries with the same id are replaced.
    pub fn merge(&mut self, other: MaterialCatalog) {
        for (_, material) in other.materials {
            if let Some(old) = self.insert(material) {
                tracing::debug!(id = %old.id, "material overridden");
            }
        }
    }

    /// Look up a material by id.
    pub fn get(&self, id: &MaterialId) -> Option<&Material> {
        self.materials.get(id)
    }

    /// Iterate materials in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    /// Number of materials.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// True if the catalog holds no materials.
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl MaterialLookup for MaterialCatalog {
    fn resolve(&self, id: &MaterialId) -> Option<&Material> {
        self.get(id)
    }
}
