#![forbid(unsafe_code)]

//! `areamap` merges grid area tables into one annotated map, summarizes it per region, finds the
//! shortest walking path between two landmarks and renders the result.
//!
//! # Features
//!
//! - `render`: enable SVG map rendering (`areamap::render`)
//! - `raster`: enable PNG/JPG output via pure-Rust SVG rasterization

pub use areamap_core::*;

#[cfg(feature = "render")]
pub mod render {
    use areamap_core::PipelineConfig;
    use areamap_core::stages;
    use std::path::PathBuf;

    pub use areamap_render::model::{LegendSymbol, MapLayout, MarkerKind};
    pub use areamap_render::{
        DEFAULT_TITLE, MapRenderOptions, PATH_TITLE, classify, layout_map, render_map_svg,
    };

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Pipeline(#[from] areamap_core::Error),
        #[error(transparent)]
        Render(#[from] areamap_render::Error),
    }

    impl HeadlessError {
        /// True when an upstream stage artifact or source table is missing.
        pub fn is_input_not_found(&self) -> bool {
            matches!(self, Self::Pipeline(e) if e.is_input_not_found())
        }
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MapFormat {
        Png,
        Jpeg,
        Svg,
    }

    impl MapFormat {
        pub fn extension(self) -> &'static str {
            match self {
                Self::Png => "png",
                Self::Jpeg => "jpg",
                Self::Svg => "svg",
            }
        }
    }

    impl std::str::FromStr for MapFormat {
        type Err = String;

        fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
            match s.trim().to_ascii_lowercase().as_str() {
                "png" => Ok(Self::Png),
                "jpg" | "jpeg" => Ok(Self::Jpeg),
                "svg" => Ok(Self::Svg),
                other => Err(format!("unsupported map format: {other}")),
            }
        }
    }

    /// Default artifact for a rendered map: the configured map file name with the extension
    /// swapped to match `format`.
    pub fn map_output_path(config: &PipelineConfig, with_path: bool, format: MapFormat) -> PathBuf {
        config
            .map_artifact(with_path)
            .with_extension(format.extension())
    }

    /// Renders the merged table written by the prepare stage, with the path table overlaid when
    /// `with_path` is set.
    ///
    /// Landmark markers follow `config.landmarks`, overriding whatever `options` carries.
    pub fn render_stage_svg(
        config: &PipelineConfig,
        with_path: bool,
        options: &MapRenderOptions,
    ) -> Result<String> {
        let grid = stages::load_merged(config)?;
        let path = if with_path {
            Some(stages::load_path(config)?)
        } else {
            None
        };
        let options = MapRenderOptions {
            landmarks: config.landmarks.clone(),
            ..options.clone()
        };
        let svg = render_map_svg(&grid, path.as_ref(), &options)?;
        tracing::debug!(
            target: "areamap::render",
            cells = grid.len(),
            with_path,
            bytes = svg.len(),
            "map svg rendered"
        );
        Ok(svg)
    }
}
