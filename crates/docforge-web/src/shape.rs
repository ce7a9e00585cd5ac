//! Response shaping: translate a [`ConvertedDocument`] into the flat JSON
//! lists the API exposes.
//!
//! Collections that are absent from the engine result, empty, or not
//! requested become `None` (serialized as `null`), so callers can tell
//! "not requested / not applicable" apart from data that simply was not
//! there.

use docforge_core::ConvertedDocument;

use crate::models::{ImageJson, SectionJson, TableJson};

pub fn sections(doc: &ConvertedDocument) -> Option<Vec<SectionJson>> {
    let texts = doc.texts.as_ref()?;
    if texts.is_empty() {
        return None;
    }
    Some(
        texts
            .iter()
            .enumerate()
            .map(|(index, item)| SectionJson {
                index,
                text: item.text.clone(),
                kind: item.label.as_str().to_string(),
            })
            .collect(),
    )
}

pub fn tables(doc: &ConvertedDocument, extract_tables: bool) -> Option<Vec<TableJson>> {
    if !extract_tables {
        return None;
    }
    let tables = doc.tables.as_ref()?;
    if tables.is_empty() {
        return None;
    }
    Some(
        tables
            .iter()
            .enumerate()
            .map(|(index, table)| TableJson {
                index,
                data: serde_json::Value::Object(
                    table.data.as_ref().map(|d| d.to_json_map()).unwrap_or_default(),
                ),
                num_rows: table.num_rows,
                num_cols: table.num_cols,
            })
            .collect(),
    )
}

pub fn images(doc: &ConvertedDocument, extract_images: bool) -> Option<Vec<ImageJson>> {
    if !extract_images {
        return None;
    }
    let pictures = doc.pictures.as_ref()?;
    if pictures.is_empty() {
        return None;
    }
    Some(
        pictures
            .iter()
            .enumerate()
            .map(|(index, picture)| ImageJson {
                index,
                caption: picture.caption.clone(),
                format: picture.format.clone(),
            })
            .collect(),
    )
}
