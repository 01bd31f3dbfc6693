//! Dialogue table export
//!
//! Reads the localisation sheet and produces the `TextData` XML document
//! consumed by the in-game dialogue system:
//!
//! ```xml
//! <TextData>
//! 	<SupportedLanguages>
//! 		<Language Value="English"/>
//! 	</SupportedLanguages>
//! 	<TextObject Id="L001">
//! 		<Text Language="English">Ahoy!</Text>
//! 	</TextObject>
//! </TextData>
//! ```
//!
//! Both scans stop at the first empty cell: row 1 ends at the first blank
//! header, column 1 ends at the first blank line ID. Rows below a blank ID
//! are never exported.

use crate::error::{Error, Result};
use crate::sheet::Worksheet;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Header marker identifying a language column
pub const DIALOGUE_MARKER: &str = "Dialogue";

/// Suffix stripped from a header to get the language name
const DIALOGUE_SUFFIX: &str = " Dialogue";

/// Line IDs containing any of these are annotation rows, not dialogue
const EXCLUDED_ID_MARKERS: &[&str] = &["BEAT", "Line ID"];

/// A header column holding one language's dialogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageColumn {
    /// 1-indexed column in the sheet
    pub column: usize,
    /// Language name (header text minus " Dialogue")
    pub language: String,
}

/// One exported line of dialogue
#[derive(Debug, Clone, PartialEq)]
pub struct TextObject {
    /// Line ID from column 1
    pub id: String,
    /// (language, text) in language column order; text may be empty
    pub texts: Vec<(String, String)>,
}

/// The exported document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextData {
    /// Languages in header order
    pub languages: Vec<String>,
    /// Text objects in row order
    pub objects: Vec<TextObject>,
}

/// Result of an export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub workbook: PathBuf,
    pub output: PathBuf,
    pub sheet: String,
    pub languages: usize,
    pub text_objects: usize,
}

/// Scan row 1 for dialogue columns
pub fn discover_languages(sheet: &Worksheet) -> Result<Vec<LanguageColumn>> {
    let mut columns = Vec::new();
    let mut column = 1;

    loop {
        if sheet.cell(1, column).is_empty() {
            break;
        }

        let header = sheet.text(1, column)?;
        debug!(column, header = %header, "header cell");
        if header.contains(DIALOGUE_MARKER) {
            columns.push(LanguageColumn {
                column,
                language: header.replace(DIALOGUE_SUFFIX, ""),
            });
        }
        column += 1;
    }

    info!(
        languages = ?columns
            .iter()
            .map(|c| (c.column, c.language.as_str()))
            .collect::<Vec<_>>(),
        "recorded dialogue columns"
    );
    Ok(columns)
}

/// Check whether a line ID marks an annotation row
pub fn is_excluded_id(id: &str) -> bool {
    EXCLUDED_ID_MARKERS.iter().any(|marker| id.contains(marker))
}

/// Build a text object for one row
pub fn parse_row(sheet: &Worksheet, row: usize, columns: &[LanguageColumn]) -> Result<TextObject> {
    let texts = columns
        .iter()
        .map(|c| {
            sheet
                .text(row, c.column)
                .map(|text| (c.language.clone(), text))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(TextObject {
        id: sheet.text(row, 1)?,
        texts,
    })
}

impl TextData {
    /// Extract all dialogue from a worksheet
    ///
    /// Only cells the export reads can fail; error values elsewhere in the
    /// sheet are ignored.
    pub fn from_worksheet(sheet: &Worksheet) -> Result<Self> {
        let columns = discover_languages(sheet)?;
        let mut objects = Vec::new();

        // Row 1 is scanned too; its "Line ID" header excludes it.
        let mut row = 1;
        while !sheet.cell(row, 1).is_empty() {
            let id = sheet.text(row, 1)?;
            if is_excluded_id(&id) {
                debug!(row, id = %id, "skipping annotation row");
            } else {
                objects.push(parse_row(sheet, row, &columns)?);
            }
            row += 1;
        }

        Ok(Self {
            languages: columns.into_iter().map(|c| c.language).collect(),
            objects,
        })
    }

    /// Serialize as tab-indented UTF-8 XML
    pub fn write_xml<W: Write>(&self, inner: W) -> Result<()> {
        let mut writer = Writer::new_with_indent(inner, b'\t', 1);

        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new("TextData")))?;

        writer.write_event(Event::Start(BytesStart::new("SupportedLanguages")))?;
        for language in &self.languages {
            let mut node = BytesStart::new("Language");
            node.push_attribute(("Value", language.as_str()));
            writer.write_event(Event::Empty(node))?;
        }
        writer.write_event(Event::End(BytesEnd::new("SupportedLanguages")))?;

        for object in &self.objects {
            let mut node = BytesStart::new("TextObject");
            node.push_attribute(("Id", object.id.as_str()));
            writer.write_event(Event::Start(node))?;

            for (language, text) in &object.texts {
                let mut text_node = BytesStart::new("Text");
                text_node.push_attribute(("Language", language.as_str()));
                if text.is_empty() {
                    writer.write_event(Event::Empty(text_node))?;
                } else {
                    writer.write_event(Event::Start(text_node))?;
                    // Quotes stay literal in text content.
                    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
                    writer.write_event(Event::End(BytesEnd::new("Text")))?;
                }
            }

            writer.write_event(Event::End(BytesEnd::new("TextObject")))?;
        }

        writer.write_event(Event::End(BytesEnd::new("TextData")))?;
        writer.into_inner().flush()?;
        Ok(())
    }

    /// Render the XML document into memory
    pub fn to_xml_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_xml(&mut buf)?;
        Ok(buf)
    }

    /// Render the XML document to a string
    pub fn to_xml_string(&self) -> Result<String> {
        // quick-xml only emits UTF-8 from &str input.
        Ok(String::from_utf8_lossy(&self.to_xml_bytes()?).into_owned())
    }
}

/// Export dialogue from `workbook` to `output`
///
/// Nothing is written to `output` unless the whole document renders.
pub fn export_dialogue(workbook: &Path, output: &Path, sheet: Option<&str>) -> Result<ExportSummary> {
    let worksheet = Worksheet::load(workbook, sheet)?;
    let data = TextData::from_worksheet(&worksheet)?;
    let xml = data.to_xml_bytes()?;

    std::fs::write(output, xml).map_err(|e| Error::FileWrite {
        path: output.to_path_buf(),
        source: e,
    })?;

    info!(
        output = %output.display(),
        languages = data.languages.len(),
        text_objects = data.objects.len(),
        "dialogue export complete"
    );

    Ok(ExportSummary {
        workbook: workbook.to_path_buf(),
        output: output.to_path_buf(),
        sheet: worksheet.name,
        languages: data.languages.len(),
        text_objects: data.objects.len(),
    })
}
