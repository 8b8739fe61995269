//! YAML loading into the typed [`Document`] tree.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::document::{Document, Number};
use crate::error::{DocumentError, DocumentResult};

/// Path that selects standard input instead of a file.
pub const STDIN_PATH: &str = "-";

/// Load a document from a file, or from stdin when `path` is [`STDIN_PATH`].
///
/// The file is read in full and closed before parsing starts.
pub fn load(path: impl AsRef<Path>) -> DocumentResult<Document> {
    let path = path.as_ref();

    let content = if path == Path::new(STDIN_PATH) {
        debug!("loading document from stdin");
        read_all(std::io::stdin().lock(), path)?
    } else {
        debug!(path = %path.display(), "loading document");
        std::fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?
    };

    load_str(&content)
}

/// Load a document from any reader.
pub fn load_reader<R: Read>(reader: R) -> DocumentResult<Document> {
    let content = read_all(reader, Path::new("<reader>"))?;
    load_str(&content)
}

/// Parse YAML text into a document.
///
/// Merge keys (`<<`) are resolved. Non-string scalar keys become their JSON
/// text; sequence or mapping keys are rejected as not representable.
///
/// Text YAML rejects is retried as JSON: surrogate-pair escapes such as
/// `"\ud83d\ude80"` are valid JSON but not valid YAML, and they are what
/// the emitter writes for characters outside the BMP.
pub fn load_str(content: &str) -> DocumentResult<Document> {
    if content.trim().is_empty() {
        return Ok(Document::Null);
    }

    let mut value: serde_yaml::Value = match serde_yaml::from_str(content) {
        Ok(value) => value,
        Err(yaml_err) => {
            return match serde_json::from_str::<serde_json::Value>(content) {
                Ok(json) => {
                    debug!("input is not YAML, loaded as JSON");
                    Ok(json_to_document(json))
                }
                Err(_) => Err(yaml_err.into()),
            };
        }
    };
    value.apply_merge()?;

    yaml_to_document(&value)
}

fn read_all<R: Read>(mut reader: R, label: &Path) -> DocumentResult<String> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|source| DocumentError::Io {
            path: PathBuf::from(label),
            source,
        })?;
    Ok(content)
}

fn yaml_to_document(yaml: &serde_yaml::Value) -> DocumentResult<Document> {
    match yaml {
        serde_yaml::Value::Null => Ok(Document::Null),

        serde_yaml::Value::Bool(b) => Ok(Document::Bool(*b)),

        serde_yaml::Value::Number(n) => Ok(Document::Number(yaml_number(n)?)),

        serde_yaml::Value::String(s) => Ok(Document::String(s.clone())),

        serde_yaml::Value::Sequence(seq) => {
            let items: DocumentResult<Vec<Document>> = seq.iter().map(yaml_to_document).collect();
            Ok(Document::Sequence(items?))
        }

        serde_yaml::Value::Mapping(map) => {
            let mut out = BTreeMap::new();

            for (key, value) in map {
                let key_str = mapping_key(key)?;
                let value = yaml_to_document(value)?;

                if out.insert(key_str.clone(), value).is_some() {
                    return Err(DocumentError::serialization(format!(
                        "key {:?} appears twice after conversion to string",
                        key_str
                    )));
                }
            }

            Ok(Document::Mapping(out))
        }

        serde_yaml::Value::Tagged(tagged) => Err(DocumentError::parse(format!(
            "unsupported tag {}",
            tagged.tag
        ))),
    }
}

fn json_to_document(json: serde_json::Value) -> Document {
    match json {
        serde_json::Value::Null => Document::Null,
        serde_json::Value::Bool(b) => Document::Bool(b),
        serde_json::Value::Number(n) => Document::Number(json_number(&n)),
        serde_json::Value::String(s) => Document::String(s),
        serde_json::Value::Array(items) => {
            Document::Sequence(items.into_iter().map(json_to_document).collect())
        }
        serde_json::Value::Object(map) => Document::Mapping(
            map.into_iter()
                .map(|(key, value)| (key, json_to_document(value)))
                .collect(),
        ),
    }
}

fn json_number(n: &serde_json::Number) -> Number {
    if let Some(i) = n.as_i64() {
        Number::Int(i)
    } else if let Some(u) = n.as_u64() {
        Number::UInt(u)
    } else {
        // finite by construction: JSON has no literal for inf or NaN
        Number::Float(n.as_f64().unwrap_or_default())
    }
}

fn yaml_number(n: &serde_yaml::Number) -> DocumentResult<Number> {
    if let Some(i) = n.as_i64() {
        Ok(Number::Int(i))
    } else if let Some(u) = n.as_u64() {
        Ok(Number::UInt(u))
    } else if let Some(f) = n.as_f64() {
        Ok(Number::Float(f))
    } else {
        Err(DocumentError::parse(format!("unsupported number {}", n)))
    }
}

/// JSON object keys are strings: scalar keys are converted, others rejected.
fn mapping_key(key: &serde_yaml::Value) -> DocumentResult<String> {
    match key {
        serde_yaml::Value::String(s) => Ok(s.clone()),
        serde_yaml::Value::Bool(b) => Ok(b.to_string()),
        serde_yaml::Value::Null => Ok("null".to_string()),
        serde_yaml::Value::Number(n) => {
            let number = yaml_number(n)?;
            if !number.is_finite() {
                return Err(DocumentError::serialization(format!(
                    "non-finite number {} used as a key",
                    n
                )));
            }
            Ok(number.to_string())
        }
        serde_yaml::Value::Sequence(_) | serde_yaml::Value::Mapping(_) => {
            Err(DocumentError::serialization(format!(
                "non-scalar key: {:?}",
                key
            )))
        }
        serde_yaml::Value::Tagged(tagged) => Err(DocumentError::parse(format!(
            "unsupported tag {} on key",
            tagged.tag
        ))),
    }
}
