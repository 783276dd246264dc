//! Per-region text summary of the merged grid.

use crate::model::{MergedGrid, RegionId};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt::Write as _;

pub const OBSTRUCTION_LABEL: &str = "ConstructionSite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionSummary {
    pub region: RegionId,
    /// Structure name → cell count, most frequent first, ties by name.
    pub structures: Vec<(String, usize)>,
    pub obstructed: usize,
}

/// Groups the grid by region (ascending). Cells without a region are left out, as are regions
/// with neither a named structure nor an obstruction.
///
/// The obstruction count covers every obstructed cell in the region, whether or not it carries a
/// structure name.
pub fn summarize(grid: &MergedGrid) -> Vec<RegionSummary> {
    let mut groups: BTreeMap<RegionId, (IndexMap<&str, usize>, usize)> = BTreeMap::new();
    for cell in grid {
        let Some(region) = cell.region else {
            continue;
        };
        let entry = groups.entry(region).or_default();
        if let Some(name) = cell.structure.as_deref() {
            *entry.0.entry(name).or_default() += 1;
        }
        if cell.obstructed {
            entry.1 += 1;
        }
    }

    groups
        .into_iter()
        .filter(|(_, (counts, obstructed))| !counts.is_empty() || *obstructed > 0)
        .map(|(region, (counts, obstructed))| {
            let mut structures: Vec<(String, usize)> = counts
                .into_iter()
                .map(|(name, n)| (name.to_string(), n))
                .collect();
            structures.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            RegionSummary {
                region,
                structures,
                obstructed,
            }
        })
        .collect()
}

/// Renders the summary as text: one block per region, separated by blank lines.
///
/// ```text
/// Area 0 summary:
///   - Apartment: 3
///   - ConstructionSite: 2
/// ```
pub fn render_report(grid: &MergedGrid) -> String {
    let mut out = String::new();
    for summary in summarize(grid) {
        let _ = writeln!(&mut out, "Area {} summary:", summary.region);
        for (name, count) in &summary.structures {
            let _ = writeln!(&mut out, "  - {name}: {count}");
        }
        if summary.obstructed > 0 {
            let _ = writeln!(&mut out, "  - {OBSTRUCTION_LABEL}: {}", summary.obstructed);
        }
        out.push('\n');
    }
    out
}
