//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_minimal_project().with_instance("x", r#"{"name": "x"}"#);
//!     fixture.command().args(["merge", "--instanceDir=x"]).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::fixtures;
    pub use super::TestFixture;
}

/// JSON snippets shared by the tests.
#[allow(dead_code)]
pub mod fixtures {
    /// A small schema in the spirit of JSON Resume.
    pub const SCHEMA: &str = r##"{
  "$schema": "http://json-schema.org/draft-07/schema#",
  "type": "object",
  "definitions": {
    "entry": {
      "type": "object",
      "required": ["name"],
      "properties": {"name": {"type": "string"}}
    }
  },
  "properties": {
    "language": {"type": "string"},
    "basics": {
      "type": "object",
      "required": ["name"],
      "properties": {
        "name": {"type": "string"},
        "email": {"type": "string", "format": "email"},
        "summary": {"type": "string"}
      }
    },
    "work": {"type": "array", "items": {"$ref": "#/definitions/entry"}},
    "skills": {"type": "array", "items": {"$ref": "#/definitions/entry"}}
  }
}"##;

    /// Manifest listing the basics and work parts.
    pub const MANIFEST: &str = r#"{
  "$schema": "../lib/schema.json",
  "language": "de",
  "parts": {
    "basics": "basics.json",
    "experience": "work.json"
  }
}"#;

    pub const BASICS: &str = r#"{"basics": {"name": "A", "email": "a@example.com", "summary": "base"}}"#;

    pub const WORK: &str = r#"{"work": [{"name": "Acme"}]}"#;
}

/// A temporary CV project (`data/`, `lib/`, `instances/`).
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Schema, default manifest and its two parts.
    pub fn with_minimal_project(self) -> Self {
        self.with_file("lib/schema.json", fixtures::SCHEMA)
            .with_file("data/cv.de.json", fixtures::MANIFEST)
            .with_file("data/basics.json", fixtures::BASICS)
            .with_file("data/work.json", fixtures::WORK)
    }

    /// Add `instances/<name>/config.json`.
    pub fn with_instance(self, name: &str, config: &str) -> Self {
        self.with_file(&format!("instances/{}/config.json", name), config)
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Canonical output of an instance using the default output directory.
    #[allow(dead_code)]
    pub fn generated(&self, name: &str) -> PathBuf {
        self.path()
            .join(format!("instances/{}/generated/cv.{}.json", name, name))
    }

    /// Parse a JSON file of the project.
    #[allow(dead_code)]
    pub fn read_json(&self, path: &Path) -> serde_json::Value {
        let text = std::fs::read_to_string(path).expect("Failed to read output");
        serde_json::from_str(&text).expect("Output is not JSON")
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixture {
    /// Create a command running in this fixture's directory.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("cv-forge");
        cmd.current_dir(self.path())
            .env_remove("CV_FORGE_ROOT")
            .env_remove("PREVIEW_PORT")
            .env("NO_COLOR", "1");
        cmd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_minimal_project_layout() {
        let fixture = TestFixture::new().with_minimal_project();
        assert!(fixture.path().join("lib/schema.json").exists());
        assert!(fixture.path().join("data/cv.de.json").exists());
    }

    #[test]
    fn test_fixtures_are_valid_json() {
        for text in [fixtures::SCHEMA, fixtures::MANIFEST, fixtures::BASICS, fixtures::WORK] {
            serde_json::from_str::<serde_json::Value>(text).expect("fixture is JSON");
        }
    }
}
