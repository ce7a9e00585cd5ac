use serde::{Deserialize, Serialize};

pub mod engine;
pub mod export;
pub mod mock;

// Re-export for convenience
pub use engine::{ConversionEngine, EngineError, EngineOptions};
pub use export::{ExportFormat, export};

/// A document as produced by a conversion engine.
///
/// Every collection is optional because input format and engine capability
/// both affect which collections get populated: `None` means the engine did
/// not produce the collection at all, `Some(vec![])` means it produced it
/// and found nothing. Callers that need to distinguish "not applicable"
/// from "empty" rely on this difference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvertedDocument {
    pub page_count: Option<usize>,
    pub texts: Option<Vec<TextItem>>,
    pub tables: Option<Vec<Table>>,
    pub pictures: Option<Vec<Picture>>,
}

/// A single text item (block) in reading order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextItem {
    pub text: String,
    pub label: TextLabel,
}

/// Structural role of a text item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextLabel {
    Title,
    SectionHeader,
    #[default]
    Paragraph,
    ListItem,
    Caption,
}

impl TextLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextLabel::Title => "title",
            TextLabel::SectionHeader => "section_header",
            TextLabel::Paragraph => "paragraph",
            TextLabel::ListItem => "list_item",
            TextLabel::Caption => "caption",
        }
    }
}

/// An extracted table. `data` is absent when the engine detected the table
/// but could not recover cell structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    pub data: Option<TableData>,
    pub num_rows: usize,
    pub num_cols: usize,
}

/// Recovered table cells, column-major on export.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    /// Export as a JSON object keyed by column name, each value being the
    /// column's cells in row order. Ragged rows contribute empty strings.
    pub fn to_json_map(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut map = serde_json::Map::new();
        for (col_idx, col) in self.columns.iter().enumerate() {
            let cells: Vec<serde_json::Value> = self
                .rows
                .iter()
                .map(|row| {
                    serde_json::Value::String(
                        row.get(col_idx).cloned().unwrap_or_default(),
                    )
                })
                .collect();
            map.insert(col.clone(), serde_json::Value::Array(cells));
        }
        map
    }
}

/// An embedded picture. The engine reports what it knows; both fields may
/// be absent for anonymous inline images.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Picture {
    pub caption: Option<String>,
    pub format: Option<String>,
}
