//! CV manifests.
//!
//! A manifest is the top-level JSON document of a CV. It declares its parts
//! in a reserved `parts` object (part name to path, relative to the manifest)
//! and may carry a `$schema` reference. Every other top-level key is content
//! that is copied into the composed document.

use std::path::{Path, PathBuf};

use log::debug;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::filesystem::load_json;

/// Reserved key listing the part files.
pub const PARTS_KEY: &str = "parts";

/// Reserved key referencing the schema; ignored by the composer.
pub const SCHEMA_KEY: &str = "$schema";

/// A part declared by a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartRef {
    /// Name under which the part is declared.
    pub name: String,
    /// Path as written in the manifest.
    pub relative: String,
    /// Path resolved against the manifest's directory.
    pub path: PathBuf,
}

/// A loaded manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    raw: Value,
}

impl Manifest {
    /// Load and parse the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = load_json(path)?;
        debug!("Loaded manifest {}", path.display());
        Ok(Self {
            path: path.to_path_buf(),
            raw,
        })
    }

    /// Build a manifest from an already parsed document.
    pub fn from_value(path: impl Into<PathBuf>, raw: Value) -> Self {
        Self {
            path: path.into(),
            raw,
        }
    }

    /// Where the manifest was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed manifest document, reserved keys included.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Directory against which part paths are resolved.
    pub fn base_dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }

    /// Whether the manifest declares a `parts` object.
    pub fn has_parts(&self) -> bool {
        self.raw.get(PARTS_KEY).is_some_and(Value::is_object)
    }

    /// Top-level content fields, without `parts` and `$schema`.
    pub fn fields(&self) -> Map<String, Value> {
        let Some(map) = self.raw.as_object() else {
            return Map::new();
        };
        map.iter()
            .filter(|(key, _)| key.as_str() != PARTS_KEY && key.as_str() != SCHEMA_KEY)
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Declared parts in manifest order.
    ///
    /// Entries whose path is not a string cannot be resolved and fail
    /// at load time with the same diagnostic as a missing file.
    pub fn parts(&self) -> Vec<PartRef> {
        let Some(parts) = self.raw.get(PARTS_KEY).and_then(Value::as_object) else {
            return Vec::new();
        };
        parts
            .iter()
            .map(|(name, rel)| {
                let relative = match rel {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                PartRef {
                    name: name.clone(),
                    path: self.base_dir().join(&relative),
                    relative,
                }
            })
            .collect()
    }
}

/// Choose the manifest for a CV in `data_dir`.
///
/// Prefers `cv.<language>.json` when a language is given and that file
/// exists, then `cv.json`, then `cv.de.json`. When none exists the final
/// fallback is returned so that loading it reports the missing file.
pub fn select_manifest_path(data_dir: &Path, language: Option<&str>) -> PathBuf {
    let mut candidates = Vec::with_capacity(3);
    if let Some(language) = language {
        candidates.push(data_dir.join(format!("cv.{}.json", language)));
    }
    candidates.push(data_dir.join("cv.json"));
    let fallback = data_dir.join("cv.de.json");

    candidates
        .into_iter()
        .find(|candidate| candidate.is_file())
        .unwrap_or(fallback)
}

/// Load the part declared by `part`, mapping any failure to
/// [`Error::PartLoad`].
pub fn load_part(part: &PartRef) -> Result<Value> {
    load_json(&part.path).map_err(|e| Error::PartLoad {
        part: part.name.clone(),
        path: part.path.clone(),
        message: match e {
            Error::Read { source, .. } => source.to_string(),
            Error::Parse { source, .. } => source.to_string(),
            other => other.to_string(),
        },
    })
}
