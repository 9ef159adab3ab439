use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A class as delivered by the class-list endpoint. Only `name` is used;
/// everything else (sections, ids) is carried along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClassRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClassListResponse {
    success: bool,
    #[serde(default)]
    data: Vec<ClassRecord>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("class list request failed: {0}")]
    Unsuccessful(String),
    #[error("malformed class list response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("failed to read class list {path}: {source}")]
    Io { source: io::Error, path: PathBuf },
}

/// Parses a `{ "success": bool, "data": [{ "name": .. }, ..] }` envelope.
pub fn parse_class_list(body: &str) -> Result<Vec<ClassRecord>, SourceError> {
    let response: ClassListResponse = serde_json::from_str(body)?;
    if !response.success {
        return Err(SourceError::Unsuccessful(
            response
                .message
                .unwrap_or_else(|| "server reported failure".to_string()),
        ));
    }
    Ok(response.data)
}

/// Where the initial class list comes from.
pub trait ClassSource {
    fn fetch_classes(&self) -> Result<Vec<ClassRecord>, SourceError>;
}

/// Reads a saved class-list response from disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ClassSource for JsonFileSource {
    fn fetch_classes(&self) -> Result<Vec<ClassRecord>, SourceError> {
        let body = fs::read_to_string(&self.path).map_err(|source| SourceError::Io {
            source,
            path: self.path.clone(),
        })?;
        parse_class_list(&body)
    }
}

impl ClassSource for Vec<ClassRecord> {
    fn fetch_classes(&self) -> Result<Vec<ClassRecord>, SourceError> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_keeps_extra_fields() {
        let body = r#"{"success":true,"data":[{"name":"Grade 1","sections":["A","B"]}]}"#;
        let records = parse_class_list(body).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Grade 1");
        assert!(records[0].extra.contains_key("sections"));
    }

    #[test]
    fn unsuccessful_response_is_an_error() {
        let err = parse_class_list(r#"{"success":false,"message":"no session"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Unsuccessful(ref m) if m == "no session"));
    }

    #[test]
    fn malformed_body_is_an_error() {
        let err = parse_class_list("<html>").unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }
}
