#![warn(missing_docs)]

//! Construction generation for straw-bale timber-frame walls.
//!
//! Each layout takes a [`WallConstructionArea`] and a configuration and
//! decomposes the area into physical elements: posts and infill, straw
//! bales, corner battens. Layouts report through one protocol: a lazy
//! sequence of [`ConstructionResult`]s that carry elements, warnings about
//! suboptimal but buildable geometry, and errors about geometry that cannot
//! be built. Diagnostics always reference the elements they were raised
//! about, and never arrive before them.
//!
//! # Example
//!
//! ```
//! use strawframe_construction::{
//!     aggregate_results, construct_straw, ConstructionContext, ConstructionSettings,
//!     WallConstructionArea,
//! };
//! use strawframe_materials::MaterialCatalog;
//! use strawframe_math::{Point3, Vec3};
//!
//! let catalog = MaterialCatalog::builtin();
//! let settings = ConstructionSettings::default();
//! let ctx = ConstructionContext::new(&catalog, &settings);
//!
//! let area = WallConstructionArea::new(Point3::origin(), Vec3::new(1800.0, 360.0, 1000.0));
//! let results = aggregate_results(construct_straw(&area, None, &ctx).unwrap());
//! assert_eq!(results.elements.len(), 4);
//! assert!(results.warnings.is_empty());
//! ```

pub mod area;
pub mod batch;
pub mod battens;
pub mod config;
pub mod element;
pub mod error;
pub mod parts;
pub mod post;
pub mod results;
pub mod straw;

pub use area::WallConstructionArea;
pub use batch::{construct_wall, construct_walls, WallJob, WallLayout};
pub use battens::construct_triangular_battens;
pub use config::{
    ConstructionContext, ConstructionSettings, DoublePostConfig, FullPostConfig, PostConfig,
    TriangularBattenConfig,
};
pub use element::{
    ConstructionElement, ElementId, ExtrusionPlane, PartInfo, PartKind, Shape, Tag,
};
pub use error::{ConstructionError, Result};
pub use parts::{PartEntry, PartsList};
pub use post::construct_post;
pub use results::{aggregate_results, AggregatedResults, ConstructionResult, Diagnostic, Issue};
pub use straw::{construct_straw, BaleKind, StrawLayout};
