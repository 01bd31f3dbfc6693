//! ns-core: Core library for the NorthStar asset pipeline tools
//!
//! This library provides functionality to:
//! - Stamp a copyright header onto every source file in a tree
//! - Load the localisation spreadsheet (xlsx/ods/csv) as a cell grid
//! - Export per-language dialogue text to the `TextData` XML document

pub mod config;
pub mod dialogue;
pub mod error;
pub mod sheet;
pub mod stamp;

pub use config::PipelineConfig;
pub use dialogue::{export_dialogue, ExportSummary, LanguageColumn, TextData, TextObject};
pub use error::{Error, Result};
pub use sheet::{CellValue, Worksheet};
pub use stamp::{check_tree, stamp_file, stamp_tree, StampOutcome, StampReport, COPYRIGHT_HEADER};
