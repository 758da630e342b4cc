//! Loading the candidate collection.
//!
//! Records come from either an HTTP endpoint returning JSON or a local JSON
//! file. Both accept a top-level array of objects or an object wrapping the
//! array in a `results` field.

mod client;
mod error;

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info};

use crate::entity::Record;

pub use client::SourceClient;
pub use error::{Result, SourceError};

/// Where to load records from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// An HTTP(S) endpoint.
    Url(String),
    /// A local JSON file.
    File(PathBuf),
}

impl Source {
    /// Human-readable location, for logs and the status line.
    pub fn describe(&self) -> String {
        match self {
            Source::Url(url) => url.clone(),
            Source::File(path) => path.display().to_string(),
        }
    }
}

/// Extract records from a parsed JSON body.
pub fn parse_records(body: Value) -> Result<Vec<Record>> {
    let items = match body {
        Value::Array(items) => items,
        Value::Object(mut object) => match object.remove("results") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(SourceError::InvalidResponse(
                    "'results' is not an array".to_string(),
                ))
            }
            None => {
                return Err(SourceError::InvalidResponse(
                    "expected an array or an object with 'results'".to_string(),
                ))
            }
        },
        other => {
            return Err(SourceError::InvalidResponse(format!(
                "expected an array, got {}",
                crate::entity::json_type_name(Some(&other))
            )))
        }
    };

    let records = items
        .into_iter()
        .map(serde_json::from_value::<Record>)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    debug!(count = records.len(), "Parsed records");
    Ok(records)
}

/// Load records from a JSON file.
pub async fn load_file(path: &Path) -> Result<Vec<Record>> {
    info!(path = %path.display(), "Loading records from file");
    let contents = tokio::fs::read_to_string(path).await?;
    let body: Value = serde_json::from_str(&contents)?;
    parse_records(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityId;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_parse_top_level_array() {
        let records = parse_records(json!([
            {"id": 1, "name": "Rick Sanchez"},
            {"id": "m", "name": "Morty Smith"}
        ]))
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, EntityId::from(1));
        assert_eq!(records[1].id, EntityId::from("m"));
        assert_eq!(records[1].get_str("name"), Some("Morty Smith"));
    }

    #[test]
    fn test_parse_results_wrapper() {
        let records = parse_records(json!({
            "info": {"count": 1},
            "results": [{"id": 1, "name": "Rick Sanchez", "species": "Human"}]
        }))
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get_str("species"), Some("Human"));
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(matches!(
            parse_records(json!({"data": []})),
            Err(SourceError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_records(json!({"results": 3})),
            Err(SourceError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_records(json!("text")),
            Err(SourceError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_requires_id() {
        let result = parse_records(json!([{"name": "no id"}]));
        assert!(matches!(result, Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_describe() {
        assert_eq!(
            Source::Url("https://example.com".to_string()).describe(),
            "https://example.com"
        );
        assert_eq!(
            Source::File(PathBuf::from("/tmp/a.json")).describe(),
            "/tmp/a.json"
        );
    }

    #[tokio::test]
    async fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id": 7, "name": "Birdperson"}}]"#).unwrap();

        let records = load_file(file.path()).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get_str("name"), Some("Birdperson"));
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_file(&dir.path().join("missing.json")).await;
        assert!(matches!(result, Err(SourceError::Io(_))));
    }

    #[tokio::test]
    async fn test_load_invalid_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(
            load_file(file.path()).await,
            Err(SourceError::Parse(_))
        ));
    }
}
