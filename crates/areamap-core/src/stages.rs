//! File-backed pipeline stages.
//!
//! Each stage reads what the previous one wrote under `output_dir`. A missing upstream artifact
//! surfaces as [`Error::InputNotFound`] carrying the command to run first.

use crate::config::PipelineConfig;
use crate::error::{Error, Result};
use crate::merge;
use crate::model::{MergedGrid, Path};
use crate::pathfind;
use crate::report;
use crate::table;
use std::path::PathBuf;

pub const PREPARE_HINT: &str = "check the input directory for the source tables";
pub const RUN_PREPARE_FIRST: &str = "run `areamap prepare` first";
pub const RUN_PATH_FIRST: &str = "run `areamap path` first";

#[derive(Debug, Clone)]
pub struct Prepared {
    pub grid: MergedGrid,
    pub report: String,
    pub merged_path: PathBuf,
    pub report_path: PathBuf,
}

/// Merges the sources, then writes the region report and the merged table.
///
/// Nothing is written unless the merge succeeds. The merged table goes last since later stages
/// key off it; a failed report write leaves no merged table behind.
pub fn prepare(config: &PipelineConfig) -> Result<Prepared> {
    let grid = merge::load_and_merge(config).map_err(|e| e.with_hint(PREPARE_HINT))?;
    let report = report::render_report(&grid);

    std::fs::create_dir_all(&config.output_dir).map_err(|source| Error::Io {
        path: config.output_dir.clone(),
        source,
    })?;
    let report_path = config.report_artifact();
    std::fs::write(&report_path, &report).map_err(|source| Error::Io {
        path: report_path.clone(),
        source,
    })?;

    let merged_path = config.merged_artifact();
    table::write_merged_grid(&merged_path, &grid)?;

    tracing::info!(
        target: "areamap::stages",
        merged = %merged_path.display(),
        report = %report_path.display(),
        "prepare stage complete"
    );
    Ok(Prepared {
        grid,
        report,
        merged_path,
        report_path,
    })
}

/// Loads the merged table written by [`prepare`].
pub fn load_merged(config: &PipelineConfig) -> Result<MergedGrid> {
    table::read_merged_grid(&config.merged_artifact()).map_err(|e| e.with_hint(RUN_PREPARE_FIRST))
}

/// Loads the path table written by [`compute_path`].
pub fn load_path(config: &PipelineConfig) -> Result<Path> {
    table::read_path(&config.path_artifact()).map_err(|e| e.with_hint(RUN_PATH_FIRST))
}

#[derive(Debug, Clone)]
pub enum RouteOutcome {
    Found { path: Path, written_to: PathBuf },
    Unreachable,
}

/// Finds the route between the configured landmarks and writes it as a path table.
///
/// Unless a new path is found, no path table is left behind: a stale one from an earlier run is
/// removed when the destination is unreachable or a landmark cannot be resolved.
pub fn compute_path(config: &PipelineConfig) -> Result<RouteOutcome> {
    let grid = load_merged(config)?;
    let path_file = config.path_artifact();
    let route = match pathfind::find_route(&grid, &config.landmarks) {
        Ok(route) => route,
        Err(err) => {
            remove_stale_path(&path_file)?;
            return Err(err);
        }
    };
    match route {
        Some(path) => {
            table::write_path(&path_file, &path)?;
            tracing::info!(
                target: "areamap::stages",
                steps = path.steps(),
                path = %path_file.display(),
                "path stage complete"
            );
            Ok(RouteOutcome::Found {
                path,
                written_to: path_file,
            })
        }
        None => {
            remove_stale_path(&path_file)?;
            Ok(RouteOutcome::Unreachable)
        }
    }
}

fn remove_stale_path(path_file: &std::path::Path) -> Result<()> {
    if !path_file.is_file() {
        return Ok(());
    }
    tracing::debug!(
        target: "areamap::stages",
        path = %path_file.display(),
        "removing stale path table"
    );
    std::fs::remove_file(path_file).map_err(|source| Error::Io {
        path: path_file.to_path_buf(),
        source,
    })
}
