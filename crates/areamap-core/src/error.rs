use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input not found: {path}{}", hint_suffix(.hint))]
    InputNotFound {
        path: PathBuf,
        hint: Option<&'static str>,
    },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed delimited data in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error(
        "cannot resolve field `{field}` in {source_name}: tried [{}], found [{}]",
        .candidates.join(", "),
        .observed.join(", ")
    )]
    SchemaResolution {
        source_name: String,
        field: &'static str,
        candidates: Vec<&'static str>,
        observed: Vec<String>,
    },

    #[error("invalid {field} value {value:?} in {source_name} (line {line})")]
    InvalidValue {
        source_name: String,
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("{role} landmark `{name}` not found in merged grid")]
    LandmarkNotFound { role: &'static str, name: String },

    #[error("invalid configuration in {path}: {message}")]
    Config { path: PathBuf, message: String },
}

fn hint_suffix(hint: &Option<&'static str>) -> String {
    match hint {
        Some(h) => format!(" ({h})"),
        None => String::new(),
    }
}

impl Error {
    /// Attaches a remediation hint to an [`Error::InputNotFound`]; other variants pass through.
    pub fn with_hint(self, hint: &'static str) -> Self {
        match self {
            Error::InputNotFound { path, .. } => Error::InputNotFound {
                path,
                hint: Some(hint),
            },
            other => other,
        }
    }

    pub fn is_input_not_found(&self) -> bool {
        matches!(self, Error::InputNotFound { .. })
    }
}
