//! Header alias resolution.
//!
//! Each source names its columns a little differently (`category` vs `id`, `struct` vs
//! `struct_name`, ...). Every logical field carries an ordered list of candidate header names;
//! a file's header row is resolved against that list exactly once, producing a fixed column
//! index for the rest of the load.

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    X,
    Y,
    Region,
    Obstruction,
    Category,
    StructureName,
}

impl Field {
    pub const fn name(self) -> &'static str {
        match self {
            Field::X => "x",
            Field::Y => "y",
            Field::Region => "region",
            Field::Obstruction => "obstruction",
            Field::Category => "category",
            Field::StructureName => "structure name",
        }
    }

    /// Candidate header names in priority order. Matching ignores ASCII case and surrounding
    /// whitespace.
    pub const fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::X => &["x"],
            Field::Y => &["y"],
            Field::Region => &["area", "region", "region_id", "zone"],
            Field::Obstruction => &[
                "ConstructionSite",
                "construction_site",
                "construction",
                "obstructed",
                "obstruction",
                "is_obstructed",
            ],
            Field::Category => &["category", "id", "category_id", "code"],
            Field::StructureName => &[
                "struct",
                "struct_name",
                "structure_name",
                "structure",
                "name",
            ],
        }
    }
}

/// Column indices for one file, resolved from its header row.
#[derive(Debug, Clone)]
pub struct ResolvedSchema {
    source_name: String,
    columns: Vec<(Field, Option<usize>)>,
}

impl ResolvedSchema {
    /// Resolves `required` and `optional` fields against `headers`.
    ///
    /// A required field with no matching header fails with [`Error::SchemaResolution`], listing
    /// the observed headers. Optional fields may stay unresolved.
    pub fn resolve<'h>(
        source_name: &str,
        headers: impl IntoIterator<Item = &'h str>,
        required: &[Field],
        optional: &[Field],
    ) -> Result<Self> {
        let observed: Vec<String> = headers.into_iter().map(|h| h.trim().to_string()).collect();

        let mut columns = Vec::with_capacity(required.len() + optional.len());
        for &field in required {
            let Some(idx) = find_column(&observed, field) else {
                return Err(Error::SchemaResolution {
                    source_name: source_name.to_string(),
                    field: field.name(),
                    candidates: field.aliases().to_vec(),
                    observed,
                });
            };
            columns.push((field, Some(idx)));
        }
        for &field in optional {
            columns.push((field, find_column(&observed, field)));
        }

        Ok(Self {
            source_name: source_name.to_string(),
            columns,
        })
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn column(&self, field: Field) -> Option<usize> {
        self.columns
            .iter()
            .find(|(f, _)| *f == field)
            .and_then(|(_, idx)| *idx)
    }

    pub fn has(&self, field: Field) -> bool {
        self.column(field).is_some()
    }
}

fn find_column(observed: &[String], field: Field) -> Option<usize> {
    field.aliases().iter().find_map(|alias| {
        observed
            .iter()
            .position(|header| header.eq_ignore_ascii_case(alias))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_first_matching_alias_in_priority_order() {
        let schema = ResolvedSchema::resolve(
            "categories",
            ["name", " struct ", "id"],
            &[Field::Category, Field::StructureName],
            &[],
        )
        .unwrap();
        assert_eq!(schema.column(Field::Category), Some(2));
        // `struct` outranks `name` even though `name` comes first in the header.
        assert_eq!(schema.column(Field::StructureName), Some(1));
    }

    #[test]
    fn header_matching_ignores_case() {
        let schema =
            ResolvedSchema::resolve("map", ["X", "Y", "constructionsite"], &[Field::X, Field::Y], &[
                Field::Obstruction,
            ])
            .unwrap();
        assert_eq!(schema.column(Field::Obstruction), Some(2));
    }

    #[test]
    fn missing_optional_field_stays_unresolved() {
        let schema =
            ResolvedSchema::resolve("map", ["x", "y"], &[Field::X, Field::Y], &[Field::Region])
                .unwrap();
        assert!(!schema.has(Field::Region));
    }

    #[test]
    fn missing_required_field_lists_observed_headers() {
        let err = ResolvedSchema::resolve(
            "area_category.csv",
            ["kind", "label"],
            &[Field::Category],
            &[],
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot resolve field `category` in area_category.csv: tried [category, id, category_id, code], found [kind, label]"
        );
    }
}
