#![warn(missing_docs)]

//! Material records for the strawframe construction engine.
//!
//! Materials are discriminated by their `type` tag. The layout algorithms
//! only read [`MaterialKind::Dimensional`] and [`MaterialKind::Strawbale`];
//! the other kinds exist so catalogs written by the editor load unchanged.
//!
//! # Example
//!
//! ```
//! use strawframe_materials::{MaterialCatalog, MaterialLookup, MaterialId};
//!
//! let catalog = MaterialCatalog::builtin();
//! let straw = catalog.resolve(&MaterialId::new("strawbale")).unwrap();
//! assert!(straw.as_strawbale().is_some());
//! ```

mod catalog;
mod material;

pub use catalog::{
    MaterialCatalog, DEFAULT_POST_INFILL, DEFAULT_POST_TIMBER, DEFAULT_STRAWBALE,
    DEFAULT_TRIANGULAR_BATTEN,
};
pub use material::{
    CrossSection, DimensionalMaterial, Material, MaterialId, MaterialKind, PrefabMaterial,
    SheetMaterial, StrawbaleMaterial, VolumeMaterial,
};

use thiserror::Error;

/// Resolves material ids to records.
///
/// Implementations must be safe to read from several threads at once;
/// layouts never mutate through this trait.
pub trait MaterialLookup: Sync {
    /// The material with this id, or `None` if it does not exist.
    fn resolve(&self, id: &MaterialId) -> Option<&Material>;
}

/// Errors from loading or validating materials.
#[derive(Error, Debug)]
pub enum MaterialError {
    /// Failed to read a catalog file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed TOML catalog.
    #[error("invalid TOML catalog: {0}")]
    Toml(#[from] toml::de::Error),

    /// Malformed JSON catalog.
    #[error("invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    /// Two entries share an id.
    #[error("duplicate material id: {0}")]
    Duplicate(MaterialId),

    /// A record carries values no layout can use.
    #[error("invalid material {id}: {reason}")]
    Invalid {
        /// Offending material.
        id: MaterialId,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type for material operations.
pub type Result<T> = std::result::Result<T, MaterialError>;
