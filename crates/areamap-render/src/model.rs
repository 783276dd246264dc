use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

/// Visual category of a cell. Declaration order is legend order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Dwelling,
    Destination,
    Home,
    Other,
    Obstruction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MarkerLayout {
    pub kind: MarkerKind,
    /// Cell centre in SVG units.
    pub center: LayoutPoint,
    pub grid_x: u32,
    pub grid_y: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionTileLayout {
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub fill: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum LegendSymbol {
    Marker(MarkerKind),
    PathLine,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LegendItemLayout {
    pub symbol: LegendSymbol,
    pub label: String,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AxisTickLayout {
    pub value: u32,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapLayout {
    pub bounds: Bounds,
    pub title: String,
    pub title_x: f64,
    pub title_y: f64,
    pub cell_size: f64,
    pub columns: u32,
    pub rows: u32,
    /// Top-left corner of cell (1, 1).
    pub origin: LayoutPoint,
    pub region_tiles: Vec<RegionTileLayout>,
    pub markers: Vec<MarkerLayout>,
    pub path: Vec<LayoutPoint>,
    pub x_ticks: Vec<AxisTickLayout>,
    pub y_ticks: Vec<AxisTickLayout>,
    pub legend_x: f64,
    pub legend_items: Vec<LegendItemLayout>,
}
