//! Filesystem helpers: JSON loading, pretty writing and directory copies.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Read and parse a JSON file.
///
/// Read failures and parse failures are reported as distinct errors so that
/// callers can tell a missing file from a malformed one.
pub fn load_json(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` as two-space indented JSON and write it to `path`,
/// replacing any existing file.
pub fn write_json_pretty<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text)?;
    Ok(())
}

/// Create a directory and its parents. Succeeds if it already exists.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    Ok(())
}

/// Recursively copy the contents of `src` into `dst`.
///
/// Existing files in `dst` are overwritten. Returns the number of files copied.
pub fn copy_dir_all(src: &Path, dst: &Path) -> Result<usize> {
    if !src.is_dir() {
        return Err(Error::Read {
            path: src.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
        });
    }

    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_json_ok() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.json");
        fs::write(&path, r#"{"work": []}"#).unwrap();

        assert_eq!(load_json(&path).unwrap(), json!({"work": []}));
    }

    #[test]
    fn test_load_json_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = load_json(&temp.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }

    #[test]
    fn test_load_json_malformed() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        let err = load_json(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_write_json_pretty_uses_two_spaces() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("out.json");
        write_json_pretty(&path, &json!({"a": {"b": 1}})).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"a\": {\n    \"b\": 1\n  }\n}");
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a/b/c");
        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_copy_dir_all_nested() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("assets");
        fs::create_dir_all(src.join("img")).unwrap();
        fs::write(src.join("logo.svg"), "<svg/>").unwrap();
        fs::write(src.join("img/photo.jpg"), "jpg").unwrap();

        let dst = temp.path().join("dist/data/assets");
        let copied = copy_dir_all(&src, &dst).unwrap();

        assert_eq!(copied, 2);
        assert_eq!(fs::read_to_string(dst.join("logo.svg")).unwrap(), "<svg/>");
        assert_eq!(fs::read_to_string(dst.join("img/photo.jpg")).unwrap(), "jpg");
    }

    #[test]
    fn test_copy_dir_all_missing_source() {
        let temp = TempDir::new().unwrap();
        let result = copy_dir_all(&temp.path().join("nope"), &temp.path().join("out"));
        assert!(result.is_err());
    }
}
