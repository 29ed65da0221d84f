//! Per-template rendering data
//!
//! Each template directory may hold a `mustache.json` object. A missing or
//! broken file only costs that template its data; the build carries on.

use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

/// File name of the per-template data object
pub const DATA_FILE: &str = "mustache.json";

/// Load the data object for `template`
///
/// Reads [`DATA_FILE`] from the template's directory. Any failure (missing,
/// unreadable, malformed, or not a JSON object) is logged as a warning and
/// yields an empty object.
pub async fn load_template_data(template: &Path) -> Value {
    let config_file = template
        .parent()
        .map_or_else(
            || Path::new(DATA_FILE).to_path_buf(),
            |dir| dir.join(DATA_FILE),
        );

    match read_object(&config_file).await {
        Ok(data) => Value::Object(data),
        Err(error) => {
            tracing::warn!(
                config = %config_file.display(),
                template = %template.display(),
                %error,
                "unable to read template data, rendering without it"
            );
            Value::Object(Map::new())
        }
    }
}

/// Why a data file was ignored
#[derive(Debug, Error)]
enum DataError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

async fn read_object(path: &Path) -> Result<Map<String, Value>, DataError> {
    let content = tokio::fs::read_to_string(path).await?;

    match serde_json::from_str::<Value>(&content)? {
        Value::Object(map) => Ok(map),
        other => Err(DataError::NotAnObject(type_name(&other))),
    }
}

/// Return `data` with `version` set to `bust`, leaving the input untouched
#[must_use]
pub fn with_version(data: &Value, bust: Option<&str>) -> Value {
    let Some(bust) = bust else {
        return data.clone();
    };

    let mut map = data.as_object().cloned().unwrap_or_default();
    map.insert("version".to_string(), Value::String(bust.to_string()));
    Value::Object(map)
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_loads_sibling_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DATA_FILE), r#"{"name": "World"}"#).unwrap();

        let data = load_template_data(&dir.path().join("home.mustache")).await;
        assert_eq!(data, json!({"name": "World"}));
    }

    #[tokio::test]
    async fn test_missing_file_is_empty_object() {
        let dir = TempDir::new().unwrap();

        let data = load_template_data(&dir.path().join("home.mustache")).await;
        assert_eq!(data, json!({}));
    }

    #[tokio::test]
    async fn test_malformed_json_is_empty_object() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DATA_FILE), "{ name: World").unwrap();

        let data = load_template_data(&dir.path().join("home.mustache")).await;
        assert_eq!(data, json!({}));
    }

    #[tokio::test]
    async fn test_non_object_is_empty_object() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(DATA_FILE), "[1, 2, 3]").unwrap();

        let data = load_template_data(&dir.path().join("home.mustache")).await;
        assert_eq!(data, json!({}));
    }

    #[tokio::test]
    async fn test_read_object_reports_reason() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DATA_FILE);
        fs::write(&path, "\"text\"").unwrap();

        let error = read_object(&path).await.unwrap_err();
        assert!(matches!(error, DataError::NotAnObject("string")));
        assert_eq!(error.to_string(), "expected a JSON object, found string");
    }

    #[tokio::test]
    async fn test_read_object_keeps_error_kind() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DATA_FILE);

        let missing = read_object(&path).await.unwrap_err();
        assert!(matches!(
            missing,
            DataError::Io(ref e) if e.kind() == std::io::ErrorKind::NotFound
        ));

        fs::write(&path, "{ broken").unwrap();
        let malformed = read_object(&path).await.unwrap_err();
        assert!(matches!(malformed, DataError::Json(_)));
    }

    #[test]
    fn test_with_version_overrides() {
        let data = json!({"title": "Home", "version": "old"});

        let busted = with_version(&data, Some("abc123"));

        assert_eq!(busted, json!({"title": "Home", "version": "abc123"}));
        assert_eq!(data["version"], "old");
    }

    #[test]
    fn test_with_version_without_token() {
        let data = json!({"version": "kept"});
        assert_eq!(with_version(&data, None), data);
    }
}
