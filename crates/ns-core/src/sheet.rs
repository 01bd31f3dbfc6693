//! Worksheet model and workbook loading
//!
//! Cells are addressed 1-indexed as (row, column) to match the way the
//! localisation sheet is described by its authors: column 1 holds the line
//! ID, row 1 holds the column headers.

use crate::error::{Error, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A cell value with the type distinctions the exporter cares about
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty/missing cell
    Empty,
    /// Text value
    Text(String),
    /// Numeric value (integers, floats and date serials)
    Number(f64),
    /// Spreadsheet error value such as `#REF!`; fails only when read
    Error(String),
}

impl CellValue {
    /// Build a text cell, treating the empty string as an empty cell
    pub fn text(s: impl Into<String>) -> Self {
        let s = s.into();
        if s.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s)
        }
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Convert to the text written into XML
    ///
    /// Integral numbers are rendered without a fractional part.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    fn from_data(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                CellValue::text(s.as_str())
            }
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
            Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
            Data::Error(e) => CellValue::Error(e.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Error(e) => write!(f, "{}", e),
        }
    }
}

static EMPTY: CellValue = CellValue::Empty;

/// A 2D grid of cells
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    /// Sheet name (file stem for CSV input)
    pub name: String,
    rows: Vec<Vec<CellValue>>,
}

impl Worksheet {
    /// Create a worksheet from row-major cells
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Build a worksheet from string rows; empty strings become empty cells
    pub fn from_strings(name: impl Into<String>, rows: &[&[&str]]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|s| CellValue::text(*s)).collect())
            .collect();
        Self::new(name, rows)
    }

    /// Get a cell by 1-indexed (row, column); out-of-range cells are empty
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        if row == 0 || column == 0 {
            return &EMPTY;
        }
        self.rows
            .get(row - 1)
            .and_then(|r| r.get(column - 1))
            .unwrap_or(&EMPTY)
    }

    /// Read a cell as text, failing on spreadsheet error values
    pub fn text(&self, row: usize, column: usize) -> Result<String> {
        match self.cell(row, column) {
            CellValue::Error(message) => Err(Error::CellError {
                row: row as u32,
                column: column as u32,
                message: message.clone(),
            }),
            cell => Ok(cell.to_text()),
        }
    }

    /// Number of stored rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Load a worksheet from a spreadsheet file
    ///
    /// `.csv` files are read directly; anything else goes through calamine.
    /// Without `sheet`, the first worksheet is used.
    pub fn load<P: AsRef<Path>>(path: P, sheet: Option<&str>) -> Result<Self> {
        let path = path.as_ref();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            load_csv(path)
        } else {
            load_workbook(path, sheet)
        }
    }

    fn from_range(name: String, range: &Range<Data>) -> Self {
        // Pad leading rows/columns so that cell(1, 1) is always A1.
        let (row_offset, col_offset) = range.start().unwrap_or((0, 0));
        let mut rows = vec![Vec::new(); row_offset as usize];

        for data_row in range.rows() {
            let mut cells = vec![CellValue::Empty; col_offset as usize];
            cells.extend(data_row.iter().map(CellValue::from_data));
            rows.push(cells);
        }

        Self { name, rows }
    }
}

fn load_workbook(path: &Path, sheet: Option<&str>) -> Result<Worksheet> {
    let workbook_err = |e| Error::Workbook {
        path: path.to_path_buf(),
        source: e,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_err)?;
    let name = select_sheet(path, &workbook.sheet_names(), sheet)?;

    let range = workbook.worksheet_range(&name).map_err(workbook_err)?;
    Ok(Worksheet::from_range(name, &range))
}

/// Pick the requested sheet, or the first one when none is named
fn select_sheet(path: &Path, names: &[String], wanted: Option<&str>) -> Result<String> {
    match wanted {
        Some(wanted) => names
            .iter()
            .find(|n| n.as_str() == wanted)
            .cloned()
            .ok_or_else(|| Error::SheetNotFound {
                name: wanted.to_string(),
                path: path.to_path_buf(),
            }),
        None => names
            .first()
            .cloned()
            .ok_or_else(|| Error::EmptyWorkbook(path.to_path_buf())),
    }
}

/// Load a CSV export of the sheet; the first record is row 1
fn load_csv(path: &Path) -> Result<Worksheet> {
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // Allow varying number of fields
        .from_reader(BufReader::new(file));

    let mut rows = Vec::new();
    for result in csv_reader.records() {
        let record = result.map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        rows.push(record.iter().map(CellValue::text).collect());
    }

    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string();

    Ok(Worksheet::new(name, rows))
}
