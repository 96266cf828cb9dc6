//! Running layouts for many walls at once.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use strawframe_materials::MaterialId;

use crate::area::WallConstructionArea;
use crate::battens::construct_triangular_battens;
use crate::config::{ConstructionContext, PostConfig, TriangularBattenConfig};
use crate::error::Result;
use crate::post::construct_post;
use crate::results::{aggregate_results, AggregatedResults};
use crate::straw::construct_straw;

/// Which layout to run for a wall, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WallLayout {
    /// Posts.
    Post {
        /// Post configuration.
        config: PostConfig,
    },
    /// Straw bales, with the configured default material when none is given.
    Straw {
        /// Straw material.
        #[serde(default)]
        material: Option<MaterialId>,
    },
    /// Triangular battens.
    TriangularBattens {
        /// Batten configuration.
        config: TriangularBattenConfig,
    },
}

/// One wall region and the layout to fill it with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallJob {
    /// Label for reports.
    #[serde(default)]
    pub name: String,
    /// Region to fill.
    pub area: WallConstructionArea,
    /// Layout to run.
    pub layout: WallLayout,
}

/// Run one job to completion.
pub fn construct_wall(job: &WallJob, ctx: &ConstructionContext<'_>) -> Result<AggregatedResults> {
    let results = match &job.layout {
        WallLayout::Post { config } => {
            config.validate()?;
            aggregate_results(construct_post(&job.area, config, ctx.materials))
        }
        WallLayout::Straw { material } => {
            aggregate_results(construct_straw(&job.area, material.as_ref(), ctx)?)
        }
        WallLayout::TriangularBattens { config } => {
            config.validate()?;
            aggregate_results(construct_triangular_battens(&job.area, config))
        }
    };
    tracing::debug!(
        wall = %job.name,
        elements = results.elements.len(),
        warnings = results.warnings.len(),
        errors = results.errors.len(),
        "wall constructed"
    );
    Ok(results)
}

/// Run independent jobs in parallel. Results are returned in job order.
pub fn construct_walls(
    jobs: &[WallJob],
    ctx: &ConstructionContext<'_>,
) -> Vec<Result<AggregatedResults>> {
    jobs.par_iter().map(|job| construct_wall(job, ctx)).collect()
}
