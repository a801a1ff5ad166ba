//! # Schema Validation
//!
//! Validates CV documents against the project's JSON Schema.
//!
//! ## Modes
//!
//! - **Single file**: one document (usually a composed `cv.<name>.json`)
//!   against the full schema.
//! - **Manifest**: the manifest itself against the full schema, then every
//!   declared part against the sub-schema of the matching top-level schema
//!   property. A part is matched by its declared name, then the name with an
//!   `s` appended, then the name with one trailing `s` removed, in that order;
//!   the first hit wins. Parts without a match are skipped with a warning and
//!   do not count as failures.
//!
//! Each mode produces a report whose [`ValidationStatus`] maps onto the
//! validator's exit codes.

use std::path::{Path, PathBuf};

use jsonschema::Validator;
use log::{debug, warn};
use serde_json::{Map, Value};

use crate::compose::manifest::Manifest;
use crate::error::{Error, Result};
use crate::exit_codes;
use crate::filesystem::load_json;

/// Overall outcome of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Everything that was checked conforms.
    Valid,
    /// At least one checked document does not conform.
    Invalid,
    /// The target could not be read or parsed.
    LoadError,
}

impl ValidationStatus {
    /// Exit code reported by the `validate` command.
    pub fn exit_code(self) -> u8 {
        match self {
            ValidationStatus::Valid => exit_codes::SUCCESS,
            ValidationStatus::Invalid => exit_codes::INVALID,
            ValidationStatus::LoadError => exit_codes::LOAD_ERROR,
        }
    }

    pub fn is_valid(self) -> bool {
        self == ValidationStatus::Valid
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// JSON pointer to the offending value (empty for the document root).
    pub instance_path: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = if self.instance_path.is_empty() {
            "/"
        } else {
            &self.instance_path
        };
        write!(f, "{}: {}", path, self.message)
    }
}

/// Result of validating one file.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub status: ValidationStatus,
    pub issues: Vec<ValidationIssue>,
    /// Why the file could not be loaded, for [`ValidationStatus::LoadError`].
    pub load_error: Option<String>,
}

/// What happened to one manifest part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartOutcome {
    Valid { property: String },
    Invalid {
        property: String,
        issues: Vec<ValidationIssue>,
    },
    /// No schema property matched the part name.
    Skipped,
    /// The part file could not be read or parsed.
    Unreadable { message: String },
}

/// Validation result of one manifest part.
#[derive(Debug, Clone)]
pub struct PartReport {
    pub name: String,
    pub relative: String,
    pub path: PathBuf,
    pub outcome: PartOutcome,
}

impl PartReport {
    /// Whether this part makes the overall run fail.
    pub fn is_failure(&self) -> bool {
        matches!(
            self.outcome,
            PartOutcome::Invalid { .. } | PartOutcome::Unreadable { .. }
        )
    }
}

/// Result of validating a manifest and its parts.
#[derive(Debug, Clone)]
pub struct ManifestReport {
    pub path: PathBuf,
    /// Violations of the manifest itself.
    pub manifest_issues: Vec<ValidationIssue>,
    /// Whether the manifest declares a `parts` object.
    pub has_parts: bool,
    pub parts: Vec<PartReport>,
    /// Why the manifest could not be loaded.
    pub load_error: Option<String>,
}

impl ManifestReport {
    pub fn status(&self) -> ValidationStatus {
        if self.load_error.is_some() {
            ValidationStatus::LoadError
        } else if !self.manifest_issues.is_empty() || self.parts.iter().any(PartReport::is_failure)
        {
            ValidationStatus::Invalid
        } else {
            ValidationStatus::Valid
        }
    }
}

/// A compiled JSON Schema.
pub struct SchemaValidator {
    schema: Value,
    validator: Validator,
}

impl SchemaValidator {
    /// Compile `schema`. Format assertions are enabled.
    pub fn new(schema: Value) -> Result<Self> {
        let validator = compile(&schema)?;
        Ok(Self { schema, validator })
    }

    /// Load and compile the schema stored at `path`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let schema = load_json(path).map_err(|e| Error::Schema {
            message: e.to_string(),
        })?;
        Self::new(schema)
    }

    /// Validate a document against the full schema.
    pub fn check(&self, document: &Value) -> Vec<ValidationIssue> {
        collect_issues(&self.validator, document)
    }

    /// Validate the JSON file at `path` against the full schema.
    pub fn validate_file(&self, path: &Path) -> FileReport {
        match load_json(path) {
            Ok(document) => {
                let issues = self.check(&document);
                let status = if issues.is_empty() {
                    ValidationStatus::Valid
                } else {
                    ValidationStatus::Invalid
                };
                FileReport {
                    path: path.to_path_buf(),
                    status,
                    issues,
                    load_error: None,
                }
            }
            Err(e) => FileReport {
                path: path.to_path_buf(),
                status: ValidationStatus::LoadError,
                issues: Vec::new(),
                load_error: Some(e.to_string()),
            },
        }
    }

    /// Validate the manifest at `path` and each of its declared parts.
    pub fn validate_manifest(&self, path: &Path) -> ManifestReport {
        let manifest = match Manifest::load(path) {
            Ok(manifest) => manifest,
            Err(e) => {
                return ManifestReport {
                    path: path.to_path_buf(),
                    manifest_issues: Vec::new(),
                    has_parts: false,
                    parts: Vec::new(),
                    load_error: Some(e.to_string()),
                }
            }
        };

        let manifest_issues = self.check(manifest.raw());
        let has_parts = manifest.has_parts();
        if !has_parts {
            warn!("Manifest has no 'parts' object to validate.");
        }

        let parts = manifest
            .parts()
            .into_iter()
            .map(|part| {
                let outcome = self.validate_part(&part.name, &part.path);
                PartReport {
                    name: part.name,
                    relative: part.relative,
                    path: part.path,
                    outcome,
                }
            })
            .collect();

        ManifestReport {
            path: path.to_path_buf(),
            manifest_issues,
            has_parts,
            parts,
            load_error: None,
        }
    }

    fn validate_part(&self, name: &str, path: &Path) -> PartOutcome {
        let content = match load_json(path) {
            Ok(content) => content,
            Err(e) => {
                return PartOutcome::Unreadable {
                    message: e.to_string(),
                }
            }
        };

        let Some(property) = resolve_schema_property(name, &self.schema) else {
            warn!(
                "No matching schema property found for part '{}'. Skipping validation for this part.",
                name
            );
            return PartOutcome::Skipped;
        };

        let validator = match self.property_validator(&property) {
            Ok(validator) => validator,
            Err(e) => {
                warn!("Schema fragment for '{}' unusable ({}). Skipping.", property, e);
                return PartOutcome::Skipped;
            }
        };

        let target = unwrap_envelope(&content, &property);
        debug!("Validating part '{}' against property '{}'", name, property);
        let issues = collect_issues(&validator, target);
        if issues.is_empty() {
            PartOutcome::Valid { property }
        } else {
            PartOutcome::Invalid { property, issues }
        }
    }

    /// Compile the sub-schema of a top-level property.
    ///
    /// The root's `definitions` and `$defs` travel with the sub-schema so
    /// that its local `$ref`s still resolve.
    fn property_validator(&self, property: &str) -> Result<Validator> {
        let fragment = self
            .schema
            .get("properties")
            .and_then(|props| props.get(property))
            .cloned()
            .ok_or_else(|| Error::Schema {
                message: format!("no schema fragment for '{}'", property),
            })?;

        let mut wrapper = Map::new();
        for key in ["$schema", "definitions", "$defs"] {
            if let Some(value) = self.schema.get(key) {
                wrapper.insert(key.to_string(), value.clone());
            }
        }
        wrapper.insert("allOf".to_string(), Value::Array(vec![fragment]));
        compile(&Value::Object(wrapper))
    }
}

/// Map a manifest part name onto a top-level schema property.
///
/// Tries the exact name, the name plus `s`, then the name minus one trailing
/// `s`. Returns the first property that exists.
pub fn resolve_schema_property(part_name: &str, schema: &Value) -> Option<String> {
    let properties = schema.get("properties")?.as_object()?;

    let plural = format!("{}s", part_name);
    let singular = part_name.strip_suffix('s').unwrap_or(part_name);

    let found = [part_name, plural.as_str(), singular]
        .into_iter()
        .find(|candidate| properties.contains_key(*candidate))
        .map(str::to_string);
    found
}

/// Return the inner value of a single-key envelope named `property`, or the
/// content itself otherwise.
fn unwrap_envelope<'a>(content: &'a Value, property: &str) -> &'a Value {
    match content.as_object() {
        Some(map) if map.len() == 1 => map.get(property).unwrap_or(content),
        _ => content,
    }
}

fn compile(schema: &Value) -> Result<Validator> {
    jsonschema::options()
        .should_validate_formats(true)
        .build(schema)
        .map_err(|e| Error::Schema {
            message: e.to_string(),
        })
}

fn collect_issues(validator: &Validator, document: &Value) -> Vec<ValidationIssue> {
    validator
        .iter_errors(document)
        .map(|error| ValidationIssue {
            instance_path: error.instance_path.to_string(),
            message: error.to_string(),
        })
        .collect()
}
