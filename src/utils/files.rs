use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

const BOM: char = '\u{feff}';

/// Ensure a directory exists, creating it and its parents if needed
pub fn ensure_directory(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }

    fs::create_dir_all(path).map_err(|e| Error::io(path, e))?;
    tracing::info!(path = %path.display(), "created directory");
    Ok(())
}

/// Read and parse a UTF-8 JSON file, tolerating a leading byte-order mark
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let content = content.strip_prefix(BOM).unwrap_or(&content);

    serde_json::from_str(content).map_err(|source| Error::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize a value as JSON indented by four spaces
///
/// Non-ASCII characters are written as-is rather than escaped.
pub fn to_json_pretty<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer).map_err(Error::Serialize)?;
    Ok(buf)
}

/// Write a value to `path` as four-space indented JSON
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = to_json_pretty(value)?;
    fs::write(path, json).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn read_json_strips_byte_order_mark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.json");
        fs::write(&path, "\u{feff}{\"a\": 1}").unwrap();

        let value: Value = read_json(&path).unwrap();
        assert_eq!(value, json!({"a": 1}));
    }

    #[test]
    fn read_json_reports_the_offending_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let err = read_json::<Value>(&path).unwrap_err();
        assert!(matches!(err, Error::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn missing_input_is_an_io_error() {
        let err = read_json::<Value>(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn pretty_output_uses_four_spaces_and_keeps_umlauts() {
        let out = to_json_pretty(&json!({"titel": "Gebäude"})).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "{\n    \"titel\": \"Gebäude\"\n}");
    }

    #[test]
    fn ensure_directory_creates_nested_paths() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c");
        ensure_directory(&nested).unwrap();
        assert!(nested.is_dir());
        // second call is a no-op
        ensure_directory(&nested).unwrap();
    }
}
