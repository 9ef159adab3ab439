//! Renders a routine snapshot into downloadable or copyable payloads.
//!
//! Every exporter walks dates and classes in snapshot order. Human-readable
//! formats show an empty subject as `-`; CSV keeps it as an empty field.

use crate::routine::RoutineData;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;
use tracing::info;

pub mod clipboard;
pub mod delimited;
pub mod markup;
pub mod text;

pub use clipboard::{ClipboardError, ClipboardSink, CopyOutcome, copy_with_fallback};

/// Header for the class-name column in tabular exports.
pub const CORNER_LABEL: &str = "Class / Date";

pub(crate) const EMPTY_CELL: &str = "-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Word,
    Html,
    Text,
    Csv,
    Clipboard,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 5] = [
        ExportFormat::Word,
        ExportFormat::Html,
        ExportFormat::Text,
        ExportFormat::Csv,
        ExportFormat::Clipboard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Word => "word",
            ExportFormat::Html => "html",
            ExportFormat::Text => "text",
            ExportFormat::Csv => "csv",
            ExportFormat::Clipboard => "clipboard",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Word => "doc",
            ExportFormat::Html => "html",
            ExportFormat::Text | ExportFormat::Clipboard => "txt",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Word => "application/msword",
            ExportFormat::Html => "text/html;charset=utf-8",
            ExportFormat::Text | ExportFormat::Clipboard => "text/plain;charset=utf-8",
            ExportFormat::Csv => "text/csv;charset=utf-8",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown export format '{0}'")]
pub struct UnknownFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownFormat;

    /// Accepts the canonical name or the file extension.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "word" | "doc" => Ok(ExportFormat::Word),
            "html" => Ok(ExportFormat::Html),
            "text" | "txt" => Ok(ExportFormat::Text),
            "csv" => Ok(ExportFormat::Csv),
            "clipboard" | "clip" => Ok(ExportFormat::Clipboard),
            _ => Err(UnknownFormat(value.to_string())),
        }
    }
}

/// A finished export, ready for a save or clipboard sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    pub format: ExportFormat,
    pub mime_type: String,
    pub filename: String,
    pub content: String,
}

pub fn export(data: &RoutineData, title: &str, format: ExportFormat) -> Payload {
    let content = match format {
        ExportFormat::Word => markup::word_document(data, title),
        ExportFormat::Html => markup::html_document(data, title),
        ExportFormat::Text => text::plain_table(data, title),
        ExportFormat::Csv => delimited::csv_document(data, title),
        ExportFormat::Clipboard => text::box_table(data, title),
    };
    info!(
        format = format.as_str(),
        bytes = content.len(),
        classes = data.class_count(),
        dates = data.date_count(),
        "exported routine"
    );
    Payload {
        format,
        mime_type: format.mime_type().to_string(),
        filename: format!("{}.{}", file_stem(title), format.extension()),
        content,
    }
}

/// Every format at once, in [`ExportFormat::ALL`] order.
pub fn export_all(data: &RoutineData, title: &str) -> Vec<Payload> {
    ExportFormat::ALL
        .par_iter()
        .map(|format| export(data, title, *format))
        .collect()
}

/// Title with each run of whitespace replaced by `_`; "routine" when blank.
pub fn file_stem(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut in_space = false;
    for ch in title.chars() {
        if ch.is_whitespace() {
            if !in_space {
                stem.push('_');
            }
            in_space = true;
        } else {
            stem.push(ch);
            in_space = false;
        }
    }
    if stem.chars().all(|ch| ch == '_') {
        return "routine".to_string();
    }
    stem
}

pub(crate) fn display_subject(subject: &str) -> &str {
    if subject.is_empty() { EMPTY_CELL } else { subject }
}

pub(crate) fn char_width(value: &str) -> usize {
    value.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_collapses_whitespace_runs() {
        assert_eq!(file_stem("Final  Exam\tRoutine"), "Final_Exam_Routine");
        assert_eq!(file_stem("Term 1"), "Term_1");
        assert_eq!(file_stem("   "), "routine");
    }

    #[test]
    fn format_names_and_extensions() {
        assert_eq!("DOC".parse::<ExportFormat>(), Ok(ExportFormat::Word));
        assert_eq!("clip".parse::<ExportFormat>(), Ok(ExportFormat::Clipboard));
        assert_eq!(
            "pdf".parse::<ExportFormat>(),
            Err(UnknownFormat("pdf".to_string()))
        );
        assert_eq!(ExportFormat::Word.extension(), "doc");
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv;charset=utf-8");
    }

    #[test]
    fn export_all_keeps_format_order() {
        let data = RoutineData::default();
        let payloads = export_all(&data, "Exam Routine");
        let formats: Vec<ExportFormat> = payloads.iter().map(|p| p.format).collect();
        assert_eq!(formats, ExportFormat::ALL.to_vec());
        assert_eq!(payloads[0].filename, "Exam_Routine.doc");
        assert_eq!(payloads[3].filename, "Exam_Routine.csv");
    }
}
