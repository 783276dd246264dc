#![forbid(unsafe_code)]

//! Headless SVG rendering for merged area maps.
//!
//! Rendering is split in two passes: [`layout::layout_map`] places every marker, tick and legend
//! entry in SVG units, and the writer in [`svg`] serializes that layout. Both passes are pure, so
//! the same grid and options always produce byte-identical SVG.

pub mod layout;
pub mod model;
pub mod svg;

use areamap_core::{Landmarks, MergedGrid, Path};

pub use layout::{DEFAULT_TITLE, PATH_TITLE, classify, layout_map};
pub use model::{MapLayout, MarkerKind};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot render an empty grid")]
    EmptyGrid,
    #[error("invalid render options: {message}")]
    InvalidOptions { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone)]
pub struct MapRenderOptions {
    /// Side of one grid cell in SVG units.
    pub cell_size: f64,
    /// Tint each cell by its region before drawing markers.
    pub show_regions: bool,
    /// Overrides the default title ("Area Map", or the path title when a path is drawn).
    pub title: Option<String>,
    /// Structure names drawn with the home and destination markers.
    pub landmarks: Landmarks,
    /// Root `id` attribute of the emitted SVG.
    pub diagram_id: Option<String>,
}

impl Default for MapRenderOptions {
    fn default() -> Self {
        Self {
            cell_size: 32.0,
            show_regions: false,
            title: None,
            landmarks: Landmarks::default(),
            diagram_id: None,
        }
    }
}

/// Renders the merged grid, and the path when given, as a standalone SVG document.
pub fn render_map_svg(
    grid: &MergedGrid,
    path: Option<&Path>,
    options: &MapRenderOptions,
) -> Result<String> {
    let layout = layout_map(grid, path, options)?;
    let id = options.diagram_id.as_deref().unwrap_or("areamap");
    Ok(svg::render_map_layout_svg(&layout, id))
}
