#![forbid(unsafe_code)]

//! Area map core: merges the region, structure and category tables into one annotated grid and
//! finds the shortest walking path between two landmark structures on it.
//!
//! Design goals:
//! - field names resolved once per file through explicit alias tables
//! - deterministic output (stable region sort, fixed neighbour order, first-wins duplicates)
//! - synchronous and single-threaded; every stage is a one-shot pass over immutable input

pub mod config;
pub mod error;
pub mod merge;
pub mod model;
pub mod pathfind;
pub mod report;
pub mod schema;
pub mod stages;
pub mod table;

pub use config::{FileNames, Landmarks, PipelineConfig};
pub use error::{Error, Result};
pub use merge::{load_and_merge, merge};
pub use model::{Cell, CategoryCode, CategoryMap, GridCell, MergedGrid, Path, RegionId};
pub use pathfind::{Endpoints, GridGraph, NEIGHBOR_ORDER, find_route, resolve_endpoints};
pub use report::{RegionSummary, render_report, summarize};
pub use schema::{Field, ResolvedSchema};
pub use stages::{Prepared, RouteOutcome};

#[cfg(test)]
mod tests;
