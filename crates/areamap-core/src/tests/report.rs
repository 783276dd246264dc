use crate::model::{Cell, GridCell, MergedGrid, RegionId};
use crate::report::{render_report, summarize};

fn cell(x: u32, region: Option<i64>, name: Option<&str>, obstructed: bool) -> GridCell {
    GridCell {
        cell: Cell::new(x, 1),
        region: region.map(RegionId),
        category: None,
        structure: name.map(str::to_string),
        obstructed,
    }
}

#[test]
fn report_groups_regions_in_ascending_order() {
    let grid = MergedGrid::from_unsorted(vec![
        cell(1, Some(1), Some("Building"), false),
        cell(2, Some(0), Some("Apartment"), false),
        cell(3, Some(0), Some("Apartment"), true),
        cell(4, Some(0), Some("MyHome"), false),
        cell(5, Some(0), None, true),
        cell(6, Some(1), None, false),
    ]);
    assert_eq!(
        render_report(&grid),
        "Area 0 summary:\n  - Apartment: 2\n  - MyHome: 1\n  - ConstructionSite: 2\n\n\
Area 1 summary:\n  - Building: 1\n\n"
    );
}

#[test]
fn report_skips_cells_without_region_and_empty_regions() {
    let grid = MergedGrid::from_unsorted(vec![
        cell(1, None, Some("Building"), true),
        cell(2, Some(3), None, false),
        cell(3, Some(4), None, true),
    ]);
    let summaries = summarize(&grid);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].region, RegionId(4));
    assert!(summaries[0].structures.is_empty());
    assert_eq!(summaries[0].obstructed, 1);
}

#[test]
fn unnamed_obstructions_count_alongside_named_ones() {
    let grid = MergedGrid::from_unsorted(vec![
        cell(1, Some(2), Some("Building"), true),
        cell(2, Some(2), None, true),
        cell(3, Some(2), None, true),
        cell(4, Some(2), Some("Apartment"), false),
    ]);
    let summaries = summarize(&grid);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].obstructed, 3);
    assert_eq!(
        summaries[0].structures,
        vec![("Apartment".to_string(), 1), ("Building".to_string(), 1)]
    );
}

#[test]
fn structure_counts_tie_break_by_name() {
    let grid = MergedGrid::from_unsorted(vec![
        cell(1, Some(0), Some("Building"), false),
        cell(2, Some(0), Some("Apartment"), false),
    ]);
    let summaries = summarize(&grid);
    assert_eq!(
        summaries[0].structures,
        vec![("Apartment".to_string(), 1), ("Building".to_string(), 1)]
    );
}

#[test]
fn empty_grid_renders_empty_report() {
    assert_eq!(render_report(&MergedGrid::default()), "");
}
