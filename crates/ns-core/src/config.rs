//! Pipeline configuration shared by both tools
//!
//! Every field has a default matching the NorthStar project layout, so an
//! empty JSON object (or no config file at all) reproduces the stock paths.
//! Relative paths are resolved against an explicit base directory chosen
//! by the caller.

use crate::error::{Error, Result};
use crate::stamp::COPYRIGHT_HEADER;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default root scanned for source files, relative to the base directory
pub const DEFAULT_SOURCE_ROOT: &str = "NorthStar/Scripts";

/// Default source file extension that must carry the header
pub const DEFAULT_EXTENSION: &str = "cs";

/// Default localisation workbook
pub const DEFAULT_WORKBOOK: &str = "NorthStar/Scripts/Utils/NorthStar Localisation Sheet.xlsx";

/// Default XML output consumed by the dialogue system
pub const DEFAULT_OUTPUT: &str = "NorthStar/Scripts/Utils/TextData.xml";

/// Paths and settings for the header stamper and dialogue exporter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory tree scanned by the header stamper
    pub source_root: PathBuf,
    /// File extension (text after the final '.') that gets stamped
    pub extension: String,
    /// Header line every matching file must start with
    pub header: String,
    /// Localisation spreadsheet read by the exporter
    pub workbook: PathBuf,
    /// XML file written by the exporter
    pub output: PathBuf,
    /// Worksheet name; `None` selects the first sheet
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from(DEFAULT_SOURCE_ROOT),
            extension: DEFAULT_EXTENSION.to_string(),
            header: COPYRIGHT_HEADER.to_string(),
            workbook: PathBuf::from(DEFAULT_WORKBOOK),
            output: PathBuf::from(DEFAULT_OUTPUT),
            sheet: None,
        }
    }
}

impl PipelineConfig {
    /// Load a config file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the config file to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content).map_err(|e| Error::FileWrite {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Return a copy with every relative path joined onto `base`
    pub fn resolve(&self, base: &Path) -> Self {
        Self {
            source_root: base.join(&self.source_root),
            workbook: base.join(&self.workbook),
            output: base.join(&self.output),
            ..self.clone()
        }
    }
}
