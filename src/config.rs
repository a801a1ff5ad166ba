//! # Project Layout and Build Configuration
//!
//! This module describes where things live in a CV project and how the build
//! pipeline is tuned.
//!
//! ## Key Components
//!
//! - **`Workspace`**: Rooted at the project directory, it derives every
//!   persisted path: `data/` manifests and parts, `instances/<name>/`
//!   configuration, cover letter and generated output, `lib/schema.json` and
//!   the static build output directory.
//!
//! - **`Workspace::load_instance_config`**: Reads `instances/<name>/config.json`
//!   and applies defaults. A missing or malformed file is logged and treated as
//!   "no instance", never as an error.
//!
//! - **`BuildSettings`**: External commands, ports and timeouts used by the
//!   build pipeline, with defaults matching a Vite-based template project.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, error};

use crate::defaults::{apply_defaults, InstanceConfig, RawInstanceConfig, DEFAULT_BASE_DATA_PATH};
use crate::filesystem::load_json;

/// Default port of the static preview server.
pub const DEFAULT_PREVIEW_PORT: u16 = 4173;

/// Default port of the development server used as a fallback.
pub const DEFAULT_DEV_PORT: u16 = 5173;

/// The layout of a CV project on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create a workspace rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The project root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve `path` against the project root unless it is already absolute.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Directory holding the language manifests and part files.
    ///
    /// Uses the instance's `baseDataPath` when an instance is given.
    pub fn data_dir(&self, config: Option<&InstanceConfig>) -> PathBuf {
        let base = config
            .map(|c| c.base_data_path.as_str())
            .unwrap_or(DEFAULT_BASE_DATA_PATH);
        self.resolve(base)
    }

    /// The manifest validated when no file is given explicitly.
    pub fn default_manifest_path(&self) -> PathBuf {
        self.resolve(DEFAULT_BASE_DATA_PATH).join("cv.de.json")
    }

    /// Static assets that are copied next to the build output.
    pub fn assets_dir(&self) -> PathBuf {
        self.resolve(DEFAULT_BASE_DATA_PATH).join("assets")
    }

    /// The canonical JSON Schema for composed documents.
    pub fn schema_path(&self) -> PathBuf {
        self.root.join("lib").join("schema.json")
    }

    /// Directory of the named instance.
    pub fn instance_dir(&self, instance: &str) -> PathBuf {
        self.root.join("instances").join(instance)
    }

    /// Path of the instance's `config.json`.
    pub fn instance_config_path(&self, instance: &str) -> PathBuf {
        self.instance_dir(instance).join("config.json")
    }

    /// Path of the instance's optional cover letter.
    pub fn cover_path(&self, instance: &str) -> PathBuf {
        self.instance_dir(instance).join("cover.md")
    }

    /// Resolved output directory of an instance.
    pub fn output_dir(&self, config: &InstanceConfig) -> PathBuf {
        self.resolve(&config.output_dir)
    }

    /// Path of the canonical composed document of an instance.
    pub fn canonical_output_path(&self, config: &InstanceConfig) -> PathBuf {
        self.output_dir(config)
            .join(format!("cv.{}.json", config.file_stem()))
    }

    /// Load `instances/<instance>/config.json` and apply defaults.
    ///
    /// Returns `None` when the file is missing, unreadable or not a valid
    /// configuration object; the cause is logged.
    pub fn load_instance_config(&self, instance: &str) -> Option<InstanceConfig> {
        let path = self.instance_config_path(instance);
        let value = match load_json(&path) {
            Ok(value) => value,
            Err(e) => {
                error!(
                    "Failed to load instance config (config.json required): {}",
                    e
                );
                return None;
            }
        };

        if value.is_null() {
            debug!("Instance config {} is null", path.display());
            return None;
        }

        match serde_json::from_value::<RawInstanceConfig>(value) {
            Ok(raw) => Some(apply_defaults(raw)),
            Err(e) => {
                error!(
                    "Failed to load instance config (config.json required): {}: {}",
                    path.display(),
                    e
                );
                None
            }
        }
    }
}

/// Tunables of the build pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildSettings {
    /// Static verification step (lint and type checks).
    pub check_command: Vec<String>,
    /// Static site build.
    pub build_command: Vec<String>,
    /// Local preview server, started in the background.
    pub preview_command: Vec<String>,
    /// Host name used to reach the preview and dev servers.
    pub preview_host: String,
    /// Port of the preview server.
    pub preview_port: u16,
    /// Port of the development server used as a fallback.
    pub dev_port: u16,
    /// How long to wait for each candidate URL.
    pub preview_timeout: Duration,
    /// Delay between readiness probes.
    pub poll_interval: Duration,
    /// Timeout of a single readiness probe.
    pub probe_timeout: Duration,
    /// Output directory of the static build, relative to the project root.
    pub dist_dir: PathBuf,
    /// PDF compression tool.
    pub compress_command: String,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            check_command: command_line(&["npm", "run", "check"]),
            build_command: command_line(&["npx", "vite", "build"]),
            preview_command: command_line(&["npm", "run", "preview"]),
            preview_host: "localhost".to_string(),
            preview_port: DEFAULT_PREVIEW_PORT,
            dev_port: DEFAULT_DEV_PORT,
            preview_timeout: Duration::from_secs(15),
            poll_interval: Duration::from_millis(500),
            probe_timeout: Duration::from_secs(2),
            dist_dir: PathBuf::from("dist"),
            compress_command: "gs".to_string(),
        }
    }
}

fn command_line(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|part| part.to_string()).collect()
}
