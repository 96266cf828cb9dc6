//! Project files: settings, extra materials and the walls to lay out.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use strawframe_construction::{ConstructionSettings, WallJob};
use strawframe_materials::{Material, MaterialCatalog};

#[derive(Debug, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub settings: ConstructionSettings,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub walls: Vec<WallJob>,
}

impl Project {
    /// Read a project, as JSON for `.json` files and TOML otherwise.
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let project = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&source),
            _ => Self::from_toml(&source),
        }
        .with_context(|| format!("parsing {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            walls = project.walls.len(),
            materials = project.materials.len(),
            "loaded project"
        );
        Ok(project)
    }

    pub fn from_toml(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// `base` with the project's own materials layered on top.
    pub fn catalog(&self, mut base: MaterialCatalog) -> Result<MaterialCatalog> {
        let own = MaterialCatalog::from_materials(self.materials.iter().cloned())
            .context("invalid project materials")?;
        base.merge(own);
        Ok(base)
    }
}
