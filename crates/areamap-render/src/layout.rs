use crate::model::{
    AxisTickLayout, Bounds, LayoutPoint, LegendItemLayout, LegendSymbol, MapLayout, MarkerKind,
    MarkerLayout, RegionTileLayout,
};
use crate::{Error, MapRenderOptions, Result};
use areamap_core::{Cell, GridCell, Landmarks, MergedGrid, Path, RegionId};
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_TITLE: &str = "Area Map";
pub const PATH_TITLE: &str = "Shortest Path from Home to Cafe";
pub const PATH_LEGEND_LABEL: &str = "Shortest Path";

const MARGIN: f64 = 36.0;
const TITLE_HEIGHT: f64 = 40.0;
const LEGEND_GAP: f64 = 24.0;
const LEGEND_ROW: f64 = 24.0;
const LEGEND_SWATCH: f64 = 16.0;
// Rough Arial advance at the legend font size; only used to size the viewBox.
const LEGEND_CHAR_WIDTH: f64 = 7.5;

/// Light fills cycled over regions in ascending region order.
const REGION_TINTS: [&str; 6] = [
    "#fdf2d0", "#dcefff", "#e3f6dc", "#f6e1f0", "#ece6ff", "#ffe6dc",
];

/// Visual category of a merged cell, or `None` for an empty, unobstructed cell.
///
/// Obstruction takes precedence over any structure on the same cell.
pub fn classify(cell: &GridCell, landmarks: &Landmarks) -> Option<MarkerKind> {
    if cell.obstructed {
        return Some(MarkerKind::Obstruction);
    }
    let name = cell.structure.as_deref()?;
    Some(match name {
        n if n == landmarks.home => MarkerKind::Home,
        n if n == landmarks.destination => MarkerKind::Destination,
        "Apartment" | "Building" => MarkerKind::Dwelling,
        _ => MarkerKind::Other,
    })
}

pub fn legend_label(kind: MarkerKind, landmarks: &Landmarks) -> String {
    match kind {
        MarkerKind::Dwelling => "Apartment/Building".to_string(),
        MarkerKind::Destination => landmarks.destination.clone(),
        MarkerKind::Home => landmarks.home.clone(),
        MarkerKind::Other => "Other".to_string(),
        MarkerKind::Obstruction => areamap_core::report::OBSTRUCTION_LABEL.to_string(),
    }
}

pub fn layout_map(
    grid: &MergedGrid,
    path: Option<&Path>,
    options: &MapRenderOptions,
) -> Result<MapLayout> {
    if !(options.cell_size.is_finite() && options.cell_size > 0.0) {
        return Err(Error::InvalidOptions {
            message: format!("cell size must be positive, got {}", options.cell_size),
        });
    }
    let Some((mut columns, mut rows)) = grid.extent() else {
        return Err(Error::EmptyGrid);
    };
    // A path read from disk may reach past the merged cells; keep it on the canvas.
    if let Some(p) = path {
        for c in p.cells() {
            columns = columns.max(c.x);
            rows = rows.max(c.y);
        }
    }

    let cs = options.cell_size;
    let origin = LayoutPoint {
        x: MARGIN,
        y: MARGIN + TITLE_HEIGHT,
    };
    let center = |c: Cell| LayoutPoint {
        x: origin.x + (f64::from(c.x) - 0.5) * cs,
        y: origin.y + (f64::from(c.y) - 0.5) * cs,
    };

    let region_tiles = if options.show_regions {
        region_tiles(grid, origin, cs)
    } else {
        Vec::new()
    };

    let mut markers: Vec<MarkerLayout> = grid
        .iter()
        .filter_map(|cell| {
            let kind = classify(cell, &options.landmarks)?;
            Some(MarkerLayout {
                kind,
                center: center(cell.cell),
                grid_x: cell.cell.x,
                grid_y: cell.cell.y,
            })
        })
        .collect();
    // Obstructions underneath, landmarks on top.
    markers.sort_by_key(|m| (z_order(m.kind), m.grid_y, m.grid_x));

    let path_points: Vec<LayoutPoint> = path
        .map(|p| p.cells().iter().map(|&c| center(c)).collect())
        .unwrap_or_default();

    let present: BTreeSet<MarkerKind> = markers.iter().map(|m| m.kind).collect();
    let mut legend_items: Vec<LegendItemLayout> = present
        .into_iter()
        .map(|kind| LegendItemLayout {
            symbol: LegendSymbol::Marker(kind),
            label: legend_label(kind, &options.landmarks),
            y: 0.0,
        })
        .collect();
    if path.is_some() {
        legend_items.push(LegendItemLayout {
            symbol: LegendSymbol::PathLine,
            label: PATH_LEGEND_LABEL.to_string(),
            y: 0.0,
        });
    }
    for (i, item) in legend_items.iter_mut().enumerate() {
        item.y = origin.y + LEGEND_SWATCH / 2.0 + (i as f64) * LEGEND_ROW;
    }

    let map_w = f64::from(columns) * cs;
    let map_h = f64::from(rows) * cs;
    let legend_x = origin.x + map_w + LEGEND_GAP;
    let legend_w = legend_items
        .iter()
        .map(|i| LEGEND_SWATCH + 8.0 + (i.label.chars().count() as f64) * LEGEND_CHAR_WIDTH)
        .fold(0.0, f64::max);
    let legend_h = (legend_items.len() as f64) * LEGEND_ROW;

    let max_x = if legend_items.is_empty() {
        origin.x + map_w + MARGIN
    } else {
        legend_x + legend_w + MARGIN / 2.0
    };
    let max_y = (origin.y + map_h).max(origin.y + legend_h) + MARGIN / 2.0;

    let title = options.title.clone().unwrap_or_else(|| {
        if path.is_some() {
            PATH_TITLE.to_string()
        } else {
            DEFAULT_TITLE.to_string()
        }
    });

    let x_ticks = (1..=columns)
        .map(|v| AxisTickLayout {
            value: v,
            x: origin.x + (f64::from(v) - 0.5) * cs,
            y: origin.y - 8.0,
        })
        .collect();
    let y_ticks = (1..=rows)
        .map(|v| AxisTickLayout {
            value: v,
            x: origin.x - 8.0,
            y: origin.y + (f64::from(v) - 0.5) * cs,
        })
        .collect();

    tracing::debug!(
        target: "areamap::render",
        columns,
        rows,
        markers = markers.len(),
        path_points = path_points.len(),
        "map layout computed"
    );

    Ok(MapLayout {
        bounds: Bounds {
            min_x: 0.0,
            min_y: 0.0,
            max_x,
            max_y,
        },
        title,
        title_x: origin.x + map_w / 2.0,
        title_y: MARGIN / 2.0 + TITLE_HEIGHT / 2.0,
        cell_size: cs,
        columns,
        rows,
        origin,
        region_tiles,
        markers,
        path: path_points,
        x_ticks,
        y_ticks,
        legend_x,
        legend_items,
    })
}

fn z_order(kind: MarkerKind) -> u8 {
    match kind {
        MarkerKind::Obstruction => 0,
        MarkerKind::Dwelling | MarkerKind::Other => 1,
        MarkerKind::Home | MarkerKind::Destination => 2,
    }
}

fn region_tiles(grid: &MergedGrid, origin: LayoutPoint, cs: f64) -> Vec<RegionTileLayout> {
    let ranks: BTreeMap<RegionId, usize> = grid
        .iter()
        .filter_map(|c| c.region)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .enumerate()
        .map(|(i, r)| (r, i))
        .collect();
    grid.iter()
        .filter_map(|c| {
            let rank = ranks.get(&c.region?)?;
            Some(RegionTileLayout {
                x: origin.x + (f64::from(c.cell.x) - 1.0) * cs,
                y: origin.y + (f64::from(c.cell.y) - 1.0) * cs,
                size: cs,
                fill: REGION_TINTS[rank % REGION_TINTS.len()].to_string(),
            })
        })
        .collect()
}
