//! strawframe CLI - lay out straw-bale walls from a project file
//!
//! Runs post, straw and batten layouts for every wall in a project and
//! reports the results or a parts list.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use strawframe_construction::{construct_walls, AggregatedResults, ConstructionContext, PartsList};
use strawframe_materials::MaterialCatalog;

mod project;

use project::Project;

#[derive(Parser)]
#[command(name = "strawframe")]
#[command(about = "Construction layouts for straw-bale timber-frame walls", long_about = None)]
struct Cli {
    /// Extra materials file (.toml or .json), layered over the built-ins
    #[arg(long, global = true)]
    materials: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lay out every wall and report elements and diagnostics
    Layout {
        /// Project file (.toml or .json)
        project: PathBuf,
        /// Print the full results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the parts list for all walls
    Parts {
        /// Project file (.toml or .json)
        project: PathBuf,
    },
}

#[derive(Serialize)]
struct WallReport<'a> {
    name: &'a str,
    #[serde(flatten)]
    results: &'a AggregatedResults,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let base = base_catalog(cli.materials.as_deref())?;
    let walls_with_errors = match cli.command {
        Commands::Layout { project, json } => show_layout(&project, base, json)?,
        Commands::Parts { project } => show_parts(&project, base)?,
    };

    if walls_with_errors > 0 {
        anyhow::bail!("{} wall(s) could not be fully constructed", walls_with_errors);
    }
    Ok(())
}

/// Built-in materials, overridden by the `--materials` file if given.
fn base_catalog(materials: Option<&Path>) -> Result<MaterialCatalog> {
    let mut catalog = MaterialCatalog::builtin();
    if let Some(path) = materials {
        let extra = MaterialCatalog::load(path)
            .with_context(|| format!("loading materials from {}", path.display()))?;
        catalog.merge(extra);
    }
    Ok(catalog)
}

/// Run every wall of the project, in project order.
fn run_project(path: &Path, base: MaterialCatalog) -> Result<(Project, Vec<AggregatedResults>)> {
    let project = Project::load(path)?;
    let catalog = project.catalog(base)?;
    let ctx = ConstructionContext::new(&catalog, &project.settings);

    let results = construct_walls(&project.walls, &ctx)
        .into_iter()
        .zip(&project.walls)
        .map(|(result, job)| result.with_context(|| format!("wall '{}'", job.name)))
        .collect::<Result<Vec<_>>>()?;
    Ok((project, results))
}

fn show_layout(path: &Path, base: MaterialCatalog, json: bool) -> Result<usize> {
    let (project, results) = run_project(path, base)?;

    if json {
        let reports: Vec<_> = project
            .walls
            .iter()
            .zip(&results)
            .map(|(job, results)| WallReport {
                name: &job.name,
                results,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for (i, (job, results)) in project.walls.iter().zip(&results).enumerate() {
            let name = if job.name.is_empty() {
                format!("wall {}", i + 1)
            } else {
                job.name.clone()
            };
            println!(
                "{}: {} elements, {} warnings, {} errors",
                name,
                results.elements.len(),
                results.warnings.len(),
                results.errors.len()
            );
            for warning in &results.warnings {
                println!("  warning: {}", warning.message());
            }
            for error in &results.errors {
                println!("  error: {}", error.message());
            }
        }
    }

    Ok(results.iter().filter(|r| r.has_errors()).count())
}

fn show_parts(path: &Path, base: MaterialCatalog) -> Result<usize> {
    let (_, results) = run_project(path, base)?;
    let parts = PartsList::from_elements(results.iter().flat_map(|r| &r.elements));

    println!(
        "{:>6}  {:<18} {:<20} {:>24} {:>10}",
        "count", "part", "material", "size (mm)", "volume m3"
    );
    for entry in &parts.entries {
        let size = format!("{}x{}x{}", entry.size.x, entry.size.y, entry.size.z);
        println!(
            "{:>6}  {:<18} {:<20} {:>24} {:>10.3}",
            entry.count,
            entry.kind.as_str(),
            entry.material.as_str(),
            size,
            entry.volume_m3
        );
    }
    println!("{:>6}  total", parts.total_count());

    Ok(results.iter().filter(|r| r.has_errors()).count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strawframe_materials::MaterialId;

    #[test]
    fn test_materials_file_layers_under_project() {
        let dir = tempfile::tempdir().unwrap();
        let materials = dir.path().join("materials.json");
        std::fs::write(
            &materials,
            r#"{"materials": [
                {"id": "clay", "name": "Clay", "type": "generic"},
                {"id": "post-infill", "name": "Wood fibre", "type": "generic"}
            ]}"#,
        )
        .unwrap();
        let project = dir.path().join("house.toml");
        std::fs::write(
            &project,
            r#"
[[materials]]
id = "clay"
name = "Light clay"
type = "generic"

[[walls]]
name = "gable"
area = { position = [0.0, 0.0, 0.0], size = [1800.0, 360.0, 1000.0] }
layout = { type = "straw" }
"#,
        )
        .unwrap();

        let base = base_catalog(Some(materials.as_path())).unwrap();
        assert_eq!(base.len(), MaterialCatalog::builtin().len() + 1);
        assert_eq!(base.get(&MaterialId::new("post-infill")).unwrap().name, "Wood fibre");

        let (project, results) = run_project(&project, base).unwrap();
        assert_eq!(project.walls.len(), 1);
        assert_eq!(results[0].elements.len(), 4);
        let base = base_catalog(Some(materials.as_path())).unwrap();
        let catalog = project.catalog(base).unwrap();
        assert_eq!(catalog.get(&MaterialId::new("clay")).unwrap().name, "Light clay");
    }

    #[test]
    fn test_missing_materials_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.toml");
        assert!(base_catalog(Some(absent.as_path())).is_err());
        assert_eq!(base_catalog(None).unwrap(), MaterialCatalog::builtin());
    }
}
