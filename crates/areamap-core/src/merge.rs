//! Joins the three sources into one annotated grid.

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::model::{CategoryMap, Cell, GridCell, MergedGrid, sort_by_region};
use crate::table::{self, RegionRow, StructureRow};
use rustc_hash::{FxHashMap, FxHashSet};

/// Merges already-loaded sources.
///
/// - every structure row yields one cell; a coordinate seen twice keeps its first row
/// - unknown category codes leave the structure name empty
/// - region and obstruction come from the region source (left join on coordinate); when the
///   region source has no row or no region for a cell, the structure row's own region is used
/// - missing obstruction values become `false`
/// - the result is stably sorted by region, missing regions last
pub fn merge(
    regions: &[RegionRow],
    structures: &[StructureRow],
    categories: &CategoryMap,
) -> MergedGrid {
    let mut by_cell: FxHashMap<Cell, &RegionRow> = FxHashMap::default();
    let mut duplicate_regions = 0usize;
    for row in regions {
        if by_cell.contains_key(&row.cell) {
            duplicate_regions += 1;
            continue;
        }
        by_cell.insert(row.cell, row);
    }

    let mut seen: FxHashSet<Cell> = FxHashSet::default();
    let mut duplicate_structures = 0usize;
    let mut unnamed = 0usize;
    let mut cells: Vec<GridCell> = Vec::with_capacity(structures.len());
    for row in structures {
        if !seen.insert(row.cell) {
            duplicate_structures += 1;
            continue;
        }
        let structure = categories.name_of(&row.category).map(str::to_string);
        if structure.is_none() {
            unnamed += 1;
        }
        let region_row = by_cell.get(&row.cell);
        cells.push(GridCell {
            cell: row.cell,
            region: region_row.and_then(|r| r.region).or(row.region),
            category: Some(row.category.clone()),
            structure,
            obstructed: region_row.and_then(|r| r.obstruction).unwrap_or(false),
        });
    }

    if duplicate_regions > 0 || duplicate_structures > 0 {
        tracing::warn!(
            target: "areamap::merge",
            duplicate_regions,
            duplicate_structures,
            "duplicate coordinates dropped (first occurrence kept)"
        );
    }

    sort_by_region(&mut cells);
    tracing::info!(
        target: "areamap::merge",
        cells = cells.len(),
        categories = categories.len(),
        unnamed,
        obstructed = cells.iter().filter(|c| c.obstructed).count(),
        "merged grid built"
    );
    MergedGrid::from_sorted(cells)
}

/// Loads the three sources named by `config` and merges them.
///
/// Any unreadable source or unresolvable header aborts the whole merge.
pub fn load_and_merge(config: &PipelineConfig) -> Result<MergedGrid> {
    let categories = table::read_category_map(&config.category_source())?;
    let structures = table::read_structures(&config.structure_source())?;
    let regions = table::read_regions(&config.region_source())?;
    Ok(merge(&regions, &structures, &categories))
}
