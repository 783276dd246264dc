//! Delimited-text sources and artifacts.
//!
//! Readers resolve their header row through [`ResolvedSchema`] once and then pull typed rows.
//! Values are trimmed on read, and an empty cell is treated the same as a missing one.

use crate::error::{Error, Result};
use crate::model::{Cell, CategoryCode, CategoryMap, GridCell, MergedGrid, Path, RegionId};
use crate::schema::{Field, ResolvedSchema};
use std::path::{Path as FsPath, PathBuf};

/// One row of the region source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRow {
    pub cell: Cell,
    pub region: Option<RegionId>,
    /// `None` when the row (or the whole source) carries no obstruction value.
    pub obstruction: Option<bool>,
}

/// One row of the structure source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructureRow {
    pub cell: Cell,
    pub region: Option<RegionId>,
    pub category: CategoryCode,
}

/// One row of the category source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub category: CategoryCode,
    pub name: String,
}

pub const MERGED_GRID_HEADER: [&str; 6] = [
    "area",
    "category",
    "x",
    "y",
    "struct_name",
    "ConstructionSite",
];
pub const PATH_HEADER: [&str; 2] = ["x", "y"];

struct Table {
    source_name: String,
    schema: ResolvedSchema,
    records: Vec<csv::StringRecord>,
}

impl Table {
    fn open(path: &FsPath, required: &[Field], optional: &[Field]) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::InputNotFound {
                path: path.to_path_buf(),
                hint: None,
            });
        }
        let csv_err = |source| Error::Csv {
            path: path.to_path_buf(),
            source,
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)
            .map_err(csv_err)?;

        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let headers = reader.headers().map_err(csv_err)?.clone();
        let schema = ResolvedSchema::resolve(&source_name, headers.iter(), required, optional)?;

        let records = reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(csv_err)?;

        Ok(Self {
            source_name,
            schema,
            records,
        })
    }

    fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.records.iter().map(|record| Row {
            table: self,
            record,
        })
    }
}

struct Row<'a> {
    table: &'a Table,
    record: &'a csv::StringRecord,
}

impl Row<'_> {
    fn line(&self) -> u64 {
        self.record.position().map(|p| p.line()).unwrap_or(0)
    }

    fn text(&self, field: Field) -> Option<&str> {
        let idx = self.table.schema.column(field)?;
        self.record.get(idx).map(str::trim).filter(|s| !s.is_empty())
    }

    fn invalid(&self, field: Field, value: &str) -> Error {
        Error::InvalidValue {
            source_name: self.table.source_name.clone(),
            line: self.line(),
            field: field.name(),
            value: value.to_string(),
        }
    }

    fn integer(&self, field: Field) -> Result<Option<i64>> {
        let Some(raw) = self.text(field) else {
            return Ok(None);
        };
        parse_integer(raw)
            .map(Some)
            .ok_or_else(|| self.invalid(field, raw))
    }

    fn coordinate(&self, field: Field) -> Result<u32> {
        let value = self.integer(field)?;
        match value {
            Some(v) if v >= 1 && v <= i64::from(u32::MAX) => Ok(v as u32),
            _ => Err(self.invalid(field, self.text(field).unwrap_or(""))),
        }
    }

    fn cell(&self) -> Result<Cell> {
        Ok(Cell::new(self.coordinate(Field::X)?, self.coordinate(Field::Y)?))
    }

    fn region(&self) -> Result<Option<RegionId>> {
        Ok(self.integer(Field::Region)?.map(RegionId))
    }

    fn flag(&self, field: Field) -> Result<Option<bool>> {
        let Some(raw) = self.text(field) else {
            return Ok(None);
        };
        parse_flag(raw)
            .map(Some)
            .ok_or_else(|| self.invalid(field, raw))
    }
}

/// Accepts `"3"` as well as integral floats such as `"3.0"`, which spreadsheet exports emit for
/// columns that contain blanks.
fn parse_integer(raw: &str) -> Option<i64> {
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    let f = raw.parse::<f64>().ok()?;
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

/// Numeric values are true when nonzero; a few boolean spellings are accepted as well.
pub(crate) fn parse_flag(raw: &str) -> Option<bool> {
    if let Ok(v) = raw.parse::<f64>() {
        return (!v.is_nan()).then_some(v != 0.0);
    }
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => Some(true),
        "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

pub fn read_regions(path: &FsPath) -> Result<Vec<RegionRow>> {
    let table = Table::open(
        path,
        &[Field::X, Field::Y],
        &[Field::Region, Field::Obstruction],
    )?;
    table
        .rows()
        .map(|row| {
            Ok(RegionRow {
                cell: row.cell()?,
                region: row.region()?,
                obstruction: row.flag(Field::Obstruction)?,
            })
        })
        .collect()
}

pub fn read_structures(path: &FsPath) -> Result<Vec<StructureRow>> {
    let table = Table::open(path, &[Field::X, Field::Y, Field::Category], &[Field::Region])?;
    table
        .rows()
        .map(|row| {
            let category = row
                .text(Field::Category)
                .ok_or_else(|| row.invalid(Field::Category, ""))?;
            Ok(StructureRow {
                cell: row.cell()?,
                region: row.region()?,
                category: CategoryCode::new(category),
            })
        })
        .collect()
}

pub fn read_categories(path: &FsPath) -> Result<Vec<CategoryRow>> {
    let table = Table::open(path, &[Field::Category, Field::StructureName], &[])?;
    let mut out = Vec::with_capacity(table.records.len());
    for row in table.rows() {
        // Rows without a code or a label cannot name anything.
        let (Some(code), Some(name)) = (row.text(Field::Category), row.text(Field::StructureName))
        else {
            continue;
        };
        out.push(CategoryRow {
            category: CategoryCode::new(code),
            name: name.to_string(),
        });
    }
    Ok(out)
}

pub fn read_category_map(path: &FsPath) -> Result<CategoryMap> {
    let rows = read_categories(path)?;
    Ok(CategoryMap::from_pairs(
        rows.into_iter().map(|r| (r.category, r.name)),
    ))
}

/// Reloads a merged grid written by [`write_merged_grid`] (or any table with compatible
/// headers).
pub fn read_merged_grid(path: &FsPath) -> Result<MergedGrid> {
    let table = Table::open(
        path,
        &[Field::X, Field::Y],
        &[Field::Region, Field::Category, Field::StructureName, Field::Obstruction],
    )?;
    let cells = table
        .rows()
        .map(|row| {
            Ok(GridCell {
                cell: row.cell()?,
                region: row.region()?,
                category: row.text(Field::Category).map(CategoryCode::new),
                structure: row.text(Field::StructureName).map(str::to_string),
                obstructed: row.flag(Field::Obstruction)?.unwrap_or(false),
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(MergedGrid::from_unsorted(cells))
}

pub fn read_path(path: &FsPath) -> Result<Path> {
    let table = Table::open(path, &[Field::X, Field::Y], &[])?;
    let cells = table
        .rows()
        .map(|row| row.cell())
        .collect::<Result<Vec<_>>>()?;
    Path::from_cells(cells).ok_or_else(|| Error::InvalidValue {
        source_name: table.source_name.clone(),
        line: 0,
        field: "path",
        value: "consecutive cells are not one cardinal step apart".to_string(),
    })
}

fn writer(path: &FsPath) -> Result<csv::Writer<std::fs::File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| Error::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    csv::Writer::from_path(path).map_err(|source| Error::Csv {
        path: path.to_path_buf(),
        source,
    })
}

fn write_all<I, R>(path: &FsPath, header: &[&str], rows: I) -> Result<()>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let csv_err = |source| Error::Csv {
        path: PathBuf::from(path),
        source,
    };
    let mut w = writer(path)?;
    w.write_record(header).map_err(csv_err)?;
    for row in rows {
        w.write_record(row).map_err(csv_err)?;
    }
    w.flush().map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes one row per merged cell, in grid order, with the obstruction flag as `0`/`1`.
pub fn write_merged_grid(path: &FsPath, grid: &MergedGrid) -> Result<()> {
    let rows = grid.iter().map(|c| {
        [
            c.region.map(|r| r.to_string()).unwrap_or_default(),
            c.category.as_ref().map(|k| k.to_string()).unwrap_or_default(),
            c.cell.x.to_string(),
            c.cell.y.to_string(),
            c.structure.clone().unwrap_or_default(),
            u8::from(c.obstructed).to_string(),
        ]
    });
    write_all(path, &MERGED_GRID_HEADER, rows)
}

pub fn write_path(path: &FsPath, route: &Path) -> Result<()> {
    let rows = route
        .cells()
        .iter()
        .map(|c| [c.x.to_string(), c.y.to_string()]);
    write_all(path, &PATH_HEADER, rows)
}
