//! Default values for instance configuration.
//!
//! An instance's `config.json` is usually sparse. [`apply_defaults`] fills in
//! every recognized option and derives the output directory, producing the
//! canonical [`InstanceConfig`] consumed by the composer, the build pipeline
//! and (through the build environment) the template renderer.

use log::warn;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Language used when an instance does not name one.
pub const DEFAULT_LANGUAGE: &str = "de";

/// Template used when an instance does not name one.
pub const DEFAULT_TEMPLATE: &str = "default";

/// Directory holding the language manifests and part files.
pub const DEFAULT_BASE_DATA_PATH: &str = "data/";

/// An instance configuration as written on disk.
///
/// Every field is optional; JSON `null` is treated the same as an absent key.
/// A value of the wrong type is logged and then treated as absent too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawInstanceConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub template: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub base_data_path: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub photo: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub include_projects: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub include_skills: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub include_languages: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub include_courses: Option<Vec<Value>>,
    #[serde(default)]
    pub overload: Option<Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub show_project_stack: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub separate_cover: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub output_dir: Option<String>,
}

/// Deserialize an optional field, dropping values of the wrong type.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            warn!("Ignoring instance option {}: {}", value, e);
            Ok(None)
        }
    }
}

/// A fully resolved instance configuration.
///
/// `include_projects` and `include_languages` use `None` for "no filtering";
/// `include_skills` and `include_courses` default to empty lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceConfig {
    pub name: Option<String>,
    pub language: String,
    pub template: String,
    pub base_data_path: String,
    pub photo: String,
    pub include_projects: Option<Vec<Value>>,
    pub include_skills: Vec<Value>,
    pub include_languages: Option<Vec<Value>>,
    pub overload: Option<Value>,
    pub include_courses: Vec<Value>,
    pub show_project_stack: bool,
    pub separate_cover: bool,
    pub output_dir: String,
}

impl InstanceConfig {
    /// The instance name as used in artifact file names.
    ///
    /// A config without a `name` is a caller defect; it yields an empty
    /// string so the malformed path shows up in the produced file names.
    pub fn file_stem(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

impl From<RawInstanceConfig> for InstanceConfig {
    fn from(raw: RawInstanceConfig) -> Self {
        apply_defaults(raw)
    }
}

/// Merge a sparse instance configuration with the baseline defaults.
///
/// `language` and `output_dir` also fall back when set to an empty string.
/// The output directory defaults to `instances/<name>/generated/`.
pub fn apply_defaults(raw: RawInstanceConfig) -> InstanceConfig {
    let output_dir = match raw.output_dir.filter(|dir| !dir.is_empty()) {
        Some(dir) => dir,
        None => default_output_dir(raw.name.as_deref().unwrap_or_default()),
    };

    InstanceConfig {
        language: raw
            .language
            .filter(|lang| !lang.is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
        template: raw
            .template
            .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string()),
        base_data_path: raw
            .base_data_path
            .unwrap_or_else(|| DEFAULT_BASE_DATA_PATH.to_string()),
        photo: raw.photo.unwrap_or_default(),
        include_projects: raw.include_projects,
        include_skills: raw.include_skills.unwrap_or_default(),
        include_languages: raw.include_languages,
        overload: raw.overload.filter(|value| !value.is_null()),
        include_courses: raw.include_courses.unwrap_or_default(),
        show_project_stack: raw.show_project_stack.unwrap_or(true),
        separate_cover: raw.separate_cover.unwrap_or(false),
        output_dir,
        name: raw.name,
    }
}

/// Returns the output directory derived for an instance name.
pub fn default_output_dir(name: &str) -> String {
    format!("instances/{}/generated/", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> RawInstanceConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_name_only_gets_every_default() {
        let config = apply_defaults(parse(json!({"name": "x"})));

        assert_eq!(config.name.as_deref(), Some("x"));
        assert_eq!(config.language, "de");
        assert_eq!(config.template, "default");
        assert_eq!(config.base_data_path, "data/");
        assert_eq!(config.photo, "");
        assert_eq!(config.include_projects, None);
        assert!(config.include_skills.is_empty());
        assert_eq!(config.include_languages, None);
        assert!(config.include_courses.is_empty());
        assert_eq!(config.overload, None);
        assert!(config.show_project_stack);
        assert!(!config.separate_cover);
        assert_eq!(config.output_dir, "instances/x/generated/");
    }

    #[test]
    fn test_explicit_values_are_kept() {
        let config = apply_defaults(parse(json!({
            "name": "acme",
            "language": "en",
            "template": "modern",
            "baseDataPath": "data-alt/",
            "photo": "me.jpg",
            "includeProjects": ["p1"],
            "includeSkills": ["rust"],
            "includeLanguages": ["en"],
            "includeCourses": ["c1"],
            "overload": {"basics": {"summary": "X"}},
            "showProjectStack": false,
            "separateCover": true,
            "outputDir": "/tmp/out/"
        })));

        assert_eq!(config.language, "en");
        assert_eq!(config.template, "modern");
        assert_eq!(config.base_data_path, "data-alt/");
        assert_eq!(config.photo, "me.jpg");
        assert_eq!(config.include_projects, Some(vec![json!("p1")]));
        assert_eq!(config.include_skills, vec![json!("rust")]);
        assert_eq!(config.include_languages, Some(vec![json!("en")]));
        assert_eq!(config.include_courses, vec![json!("c1")]);
        assert_eq!(config.overload, Some(json!({"basics": {"summary": "X"}})));
        assert!(!config.show_project_stack);
        assert!(config.separate_cover);
        assert_eq!(config.output_dir, "/tmp/out/");
    }

    #[test]
    fn test_null_fields_fall_back() {
        let config = apply_defaults(parse(json!({
            "name": "x",
            "template": null,
            "overload": null,
            "separateCover": null
        })));

        assert_eq!(config.template, "default");
        assert_eq!(config.overload, None);
        assert!(!config.separate_cover);
    }

    #[test]
    fn test_empty_language_and_output_dir_fall_back() {
        let config = apply_defaults(parse(json!({
            "name": "x",
            "language": "",
            "outputDir": ""
        })));

        assert_eq!(config.language, "de");
        assert_eq!(config.output_dir, "instances/x/generated/");
    }

    #[test]
    fn test_empty_template_is_kept() {
        let config = apply_defaults(parse(json!({"name": "x", "template": ""})));
        // Only language and outputDir treat "" as absent.
        assert_eq!(config.template, "");
    }

    #[test]
    fn test_mistyped_options_fall_back() {
        let config = apply_defaults(parse(json!({
            "name": "x",
            "showProjectStack": "false",
            "separateCover": 1,
            "includeProjects": "all",
            "includeSkills": {"rust": true},
            "language": ["en"],
            "outputDir": 42
        })));

        assert_eq!(config.name.as_deref(), Some("x"));
        assert!(config.show_project_stack);
        assert!(!config.separate_cover);
        assert_eq!(config.include_projects, None);
        assert!(config.include_skills.is_empty());
        assert_eq!(config.language, "de");
        assert_eq!(config.output_dir, "instances/x/generated/");
    }

    #[test]
    fn test_mistyped_option_keeps_the_rest() {
        let config = apply_defaults(parse(json!({
            "name": "x",
            "includeProjects": "all",
            "template": "modern",
            "includeLanguages": ["en"]
        })));

        assert_eq!(config.template, "modern");
        assert_eq!(config.include_languages, Some(vec![json!("en")]));
    }

    #[test]
    fn test_missing_name_is_not_validated() {
        let config = apply_defaults(RawInstanceConfig::default());
        assert_eq!(config.name, None);
        assert_eq!(config.file_stem(), "");
        assert_eq!(config.output_dir, "instances//generated/");
    }

    #[test]
    fn test_resolved_config_serializes_camel_case() {
        let config = apply_defaults(parse(json!({"name": "x"})));
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["outputDir"], "instances/x/generated/");
        assert_eq!(value["showProjectStack"], true);
        assert_eq!(value["includeProjects"], Value::Null);
        assert_eq!(value["includeSkills"], json!([]));
    }
}
