//! Grid data model shared by the merge, search, report and render stages.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One grid coordinate. Both axes are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Number of cardinal moves between two cells on an empty grid.
    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(pub i64);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCode(pub String);

impl CategoryCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category code → structure label, built once from the category source.
#[derive(Debug, Clone, Default)]
pub struct CategoryMap {
    names: IndexMap<CategoryCode, String>,
}

impl CategoryMap {
    /// Builds the mapping. When a code repeats, its first label is kept.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (CategoryCode, String)>,
    {
        let mut names = IndexMap::new();
        for (code, name) in pairs {
            names.entry(code).or_insert(name);
        }
        Self { names }
    }

    pub fn name_of(&self, code: &CategoryCode) -> Option<&str> {
        self.names.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One merged record of the annotated grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    pub cell: Cell,
    pub region: Option<RegionId>,
    pub category: Option<CategoryCode>,
    pub structure: Option<String>,
    pub obstructed: bool,
}

impl GridCell {
    pub fn is_named(&self, name: &str) -> bool {
        self.structure.as_deref() == Some(name)
    }
}

/// The merged grid: unique cells, sorted by region (missing regions last).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergedGrid {
    cells: Vec<GridCell>,
}

impl MergedGrid {
    /// Wraps cells that are already deduplicated and in region order.
    ///
    /// Callers outside the merge stage (e.g. reloading the merged table) go through
    /// [`MergedGrid::from_unsorted`] instead.
    pub(crate) fn from_sorted(cells: Vec<GridCell>) -> Self {
        Self { cells }
    }

    /// Deduplicates by coordinate (first occurrence wins) and applies the region sort.
    pub fn from_unsorted(cells: Vec<GridCell>) -> Self {
        let mut seen = rustc_hash::FxHashSet::default();
        let mut unique: Vec<GridCell> = cells.into_iter().filter(|c| seen.insert(c.cell)).collect();
        sort_by_region(&mut unique);
        Self { cells: unique }
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Largest observed `(x, y)`; `None` for an empty grid.
    pub fn extent(&self) -> Option<(u32, u32)> {
        let max_x = self.cells.iter().map(|c| c.cell.x).max()?;
        let max_y = self.cells.iter().map(|c| c.cell.y).max()?;
        Some((max_x, max_y))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GridCell> {
        self.cells.iter()
    }
}

impl<'a> IntoIterator for &'a MergedGrid {
    type Item = &'a GridCell;
    type IntoIter = std::slice::Iter<'a, GridCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Stable sort: ascending region, missing regions after every present one.
pub(crate) fn sort_by_region(cells: &mut [GridCell]) {
    cells.sort_by_key(|c| (c.region.is_none(), c.region));
}

/// Ordered cells from the home landmark to the destination landmark, inclusive.
///
/// Deserializing goes through [`Path::from_cells`], so a decoded path is never empty and never
/// skips a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Cell>", into = "Vec<Cell>")]
pub struct Path(Vec<Cell>);

impl Path {
    pub(crate) fn new(cells: Vec<Cell>) -> Self {
        Self(cells)
    }

    /// Rebuilds a path read back from a path table. Returns `None` when any two consecutive
    /// cells are not one cardinal step apart.
    pub fn from_cells(cells: Vec<Cell>) -> Option<Self> {
        if cells.is_empty() || cells.windows(2).any(|w| w[0].manhattan(w[1]) != 1) {
            return None;
        }
        Some(Self(cells))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    pub fn start(&self) -> Cell {
        self.0[0]
    }

    pub fn end(&self) -> Cell {
        self.0[self.0.len() - 1]
    }

    /// Number of moves (edges), one less than the number of cells.
    pub fn steps(&self) -> usize {
        self.0.len() - 1
    }
}

impl TryFrom<Vec<Cell>> for Path {
    type Error = String;

    fn try_from(cells: Vec<Cell>) -> std::result::Result<Self, Self::Error> {
        Path::from_cells(cells)
            .ok_or_else(|| "path cells must be non-empty and one cardinal step apart".to_string())
    }
}

impl From<Path> for Vec<Cell> {
    fn from(path: Path) -> Self {
        path.0
    }
}
