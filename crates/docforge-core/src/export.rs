//! Textual serializations of a [`ConvertedDocument`].
//!
//! Markdown is the primary format; an unrecognized format string from a
//! client falls back to it silently rather than erroring, so old clients
//! sending unknown values keep working.

use serde::{Deserialize, Serialize};

use crate::engine::EngineError;
use crate::{ConvertedDocument, Table, TextLabel};

/// Output serialization of a converted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Markdown,
    Json,
    Html,
}

impl ExportFormat {
    /// Parse a client-supplied format string. Anything unrecognized maps
    /// to [`ExportFormat::Markdown`].
    pub fn from_param(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => ExportFormat::Json,
            "html" => ExportFormat::Html,
            _ => ExportFormat::Markdown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "markdown",
            ExportFormat::Json => "json",
            ExportFormat::Html => "html",
        }
    }
}

/// Serialize `doc` in the requested format.
pub fn export(doc: &ConvertedDocument, format: ExportFormat) -> Result<String, EngineError> {
    match format {
        ExportFormat::Markdown => Ok(to_markdown(doc)),
        ExportFormat::Json => {
            serde_json::to_string_pretty(doc).map_err(|e| EngineError::Export(e.to_string()))
        }
        ExportFormat::Html => Ok(to_html(doc)),
    }
}

fn to_markdown(doc: &ConvertedDocument) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(texts) = &doc.texts {
        for item in texts {
            let text = item.text.trim();
            if text.is_empty() {
                continue;
            }
            match item.label {
                TextLabel::Title => parts.push(format!("# {text}")),
                TextLabel::SectionHeader => parts.push(format!("## {text}")),
                TextLabel::ListItem => parts.push(format!("- {text}")),
                TextLabel::Paragraph | TextLabel::Caption => parts.push(text.to_string()),
            }
        }
    }

    if let Some(tables) = &doc.tables {
        for table in tables {
            if let Some(md) = table_to_markdown(table) {
                parts.push(md);
            }
        }
    }

    parts.join("\n\n")
}

/// Render a table as a GFM pipe table. Returns `None` when no cell
/// structure was recovered.
fn table_to_markdown(table: &Table) -> Option<String> {
    let data = table.data.as_ref()?;
    if data.columns.is_empty() {
        return None;
    }

    let mut out = String::new();
    out.push_str(&format!("| {} |\n", data.columns.join(" | ")));
    out.push_str(&format!(
        "|{}\n",
        " --- |".repeat(data.columns.len())
    ));
    for row in &data.rows {
        let cells: Vec<&str> = (0..data.columns.len())
            .map(|i| row.get(i).map(String::as_str).unwrap_or(""))
            .collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    Some(out.trim_end().to_string())
}

fn to_html(doc: &ConvertedDocument) -> String {
    let mut out = String::from("<!DOCTYPE html>\n<html>\n<body>\n");

    if let Some(texts) = &doc.texts {
        for item in texts {
            let text = escape_html(item.text.trim());
            if text.is_empty() {
                continue;
            }
            match item.label {
                TextLabel::Title => out.push_str(&format!("<h1>{text}</h1>\n")),
                TextLabel::SectionHeader => out.push_str(&format!("<h2>{text}</h2>\n")),
                TextLabel::ListItem => out.push_str(&format!("<li>{text}</li>\n")),
                TextLabel::Caption => out.push_str(&format!("<figcaption>{text}</figcaption>\n")),
                TextLabel::Paragraph => out.push_str(&format!("<p>{text}</p>\n")),
            }
        }
    }

    if let Some(tables) = &doc.tables {
        for table in tables {
            if let Some(data) = &table.data {
                out.push_str("<table>\n<tr>");
                for col in &data.columns {
                    out.push_str(&format!("<th>{}</th>", escape_html(col)));
                }
                out.push_str("</tr>\n");
                for row in &data.rows {
                    out.push_str("<tr>");
                    for i in 0..data.columns.len() {
                        let cell = row.get(i).map(String::as_str).unwrap_or("");
                        out.push_str(&format!("<td>{}</td>", escape_html(cell)));
                    }
                    out.push_str("</tr>\n");
                }
                out.push_str("</table>\n");
            }
        }
    }

    out.push_str("</body>\n</html>\n");
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
