//! Error types for the construction engine.
//!
//! These are contract violations that stop a layout before it starts.
//! Problems with the geometry itself are reported as diagnostics in the
//! result sequence instead.

use strawframe_materials::{MaterialError, MaterialId};
use thiserror::Error;

/// Errors that can occur before a layout runs.
#[derive(Error, Debug)]
pub enum ConstructionError {
    /// Malformed or unknown configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A referenced material is not in the catalog.
    #[error("material not found: {0}")]
    MaterialNotFound(MaterialId),

    /// A referenced material has the wrong type for this layout.
    #[error("material {id} is {found}, expected {expected}")]
    WrongMaterialType {
        /// Offending material.
        id: MaterialId,
        /// Type the layout needs.
        expected: &'static str,
        /// Type the material has.
        found: &'static str,
    },

    /// A material record carries unusable values.
    #[error(transparent)]
    InvalidMaterial(#[from] MaterialError),
}

/// Result type for construction operations.
pub type Result<T> = std::result::Result<T, ConstructionError>;
