use crate::model::{Cell, GridCell, MergedGrid};

mod report;

/// Builds a `width` x `height` grid with the given landmarks and obstructions; every other cell
/// is an unnamed structure in region 1.
pub(crate) fn grid(
    width: u32,
    height: u32,
    named: &[((u32, u32), &str)],
    obstructed: &[(u32, u32)],
) -> MergedGrid {
    let mut cells = Vec::new();
    for y in 1..=height {
        for x in 1..=width {
            let structure = named
                .iter()
                .find(|((nx, ny), _)| *nx == x && *ny == y)
                .map(|(_, name)| name.to_string());
            cells.push(GridCell {
                cell: Cell::new(x, y),
                region: Some(crate::RegionId(1)),
                category: None,
                structure,
                obstructed: obstructed.contains(&(x, y)),
            });
        }
    }
    MergedGrid::from_unsorted(cells)
}

pub(crate) fn cells(points: &[(u32, u32)]) -> Vec<Cell> {
    points.iter().map(|&(x, y)| Cell::new(x, y)).collect()
}
