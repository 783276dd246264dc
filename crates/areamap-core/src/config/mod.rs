use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Where each stage reads its sources and writes its artifacts.
///
/// Every stage receives this explicitly; nothing falls back to a process-wide default
/// directory. Unknown keys in a JSON config file are ignored, missing keys take the defaults
/// below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub files: FileNames,
    pub landmarks: Landmarks,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("csv"),
            output_dir: PathBuf::from("output"),
            files: FileNames::default(),
            landmarks: Landmarks::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNames {
    pub regions: String,
    pub structures: String,
    pub categories: String,
    pub merged: String,
    pub report: String,
    pub path: String,
    pub map: String,
    pub map_with_path: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            regions: "area_map.csv".to_string(),
            structures: "area_struct.csv".to_string(),
            categories: "area_category.csv".to_string(),
            merged: "area_merged.csv".to_string(),
            report: "report.txt".to_string(),
            path: "home_to_cafe.csv".to_string(),
            map: "map.png".to_string(),
            map_with_path: "map_final.png".to_string(),
        }
    }
}

/// Structure names of the two path endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Landmarks {
    pub home: String,
    pub destination: String,
}

impl Default for Landmarks {
    fn default() -> Self {
        Self {
            home: "MyHome".to_string(),
            destination: "BandalgomCoffee".to_string(),
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                Error::InputNotFound {
                    path: path.to_path_buf(),
                    hint: None,
                }
            } else {
                Error::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let config = Self::from_json_str(&text).map_err(|err| Error::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        tracing::debug!(
            target: "areamap::config",
            path = %path.display(),
            "pipeline config loaded from file"
        );
        Ok(config)
    }

    /// JSON view of the effective configuration.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    pub fn region_source(&self) -> PathBuf {
        self.input_dir.join(&self.files.regions)
    }

    pub fn structure_source(&self) -> PathBuf {
        self.input_dir.join(&self.files.structures)
    }

    pub fn category_source(&self) -> PathBuf {
        self.input_dir.join(&self.files.categories)
    }

    pub fn merged_artifact(&self) -> PathBuf {
        self.output_dir.join(&self.files.merged)
    }

    pub fn report_artifact(&self) -> PathBuf {
        self.output_dir.join(&self.files.report)
    }

    pub fn path_artifact(&self) -> PathBuf {
        self.output_dir.join(&self.files.path)
    }

    /// Image path for the plain map, or for the map with the path overlay.
    pub fn map_artifact(&self, with_path: bool) -> PathBuf {
        let name = if with_path {
            &self.files.map_with_path
        } else {
            &self.files.map
        };
        self.output_dir.join(name)
    }
}
