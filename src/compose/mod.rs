//! # CV Composition
//!
//! Composes a manifest, its part files and an instance's overrides into one
//! JSON document.
//!
//! ## Steps
//!
//! 1. **Instance**: Load `instances/<name>/config.json` and apply defaults.
//!    Without a readable config the composer runs in "no instance" mode: it
//!    still composes the manifest but writes nothing.
//! 2. **Manifest selection**: `cv.<language>.json`, then `cv.json`, then
//!    `cv.de.json` inside the data directory.
//! 3. **Manifest fields**: Every top-level key except `parts` and `$schema`.
//! 4. **Parts**: Loaded in declaration order. Single-key envelopes of known
//!    sections are unwrapped; other parts are stored under their declared
//!    name. Any failure aborts the whole composition.
//! 5. **Overrides**: The instance's `overload` object is deep-merged last,
//!    then an optional Markdown cover letter is attached as `coverHtml`.
//! 6. **Output**: The document is written as pretty-printed JSON to
//!    `<outputDir>/cv.<name>.json`, replacing the previous canonical copy.
//!
//! The result is a pure function of the input files: no timestamps or other
//! ambient data enter the composed document.

pub mod cover;
pub mod manifest;
pub mod part;

use std::path::PathBuf;

use log::{debug, info};
use serde_json::{Map, Value};

use crate::config::Workspace;
use crate::defaults::InstanceConfig;
use crate::error::Result;
use crate::filesystem::{ensure_dir, write_json_pretty};
use crate::merge::merge_maps;

pub use manifest::{select_manifest_path, Manifest, PartRef};
pub use part::{Part, SECTION_NAMES};

/// Key under which the rendered cover letter is attached.
pub const COVER_HTML_KEY: &str = "coverHtml";

/// The outcome of composing a CV.
#[derive(Debug, Clone)]
pub struct Composition {
    /// The composed document.
    pub document: Map<String, Value>,
    /// The resolved instance configuration, if an instance was loaded.
    pub config: Option<InstanceConfig>,
    /// The manifest that was composed.
    pub manifest_path: PathBuf,
}

impl Composition {
    /// The composed document as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.document.clone())
    }

    /// Write the document to the instance's canonical output path.
    ///
    /// Creates the output directory if needed and overwrites any previous
    /// copy. Returns `None` without writing in "no instance" mode.
    pub fn write(&self, workspace: &Workspace) -> Result<Option<PathBuf>> {
        let Some(config) = &self.config else {
            debug!("No instance configuration; skipping output");
            return Ok(None);
        };

        ensure_dir(&workspace.output_dir(config))?;
        let path = workspace.canonical_output_path(config);
        write_json_pretty(&path, &self.document)?;
        info!("Wrote merged CV to instance path: {}", path.display());
        Ok(Some(path))
    }
}

/// Compose the CV of `instance` (or the bare manifest when `None`).
pub fn compose(workspace: &Workspace, instance: Option<&str>) -> Result<Composition> {
    let config = instance.and_then(|name| workspace.load_instance_config(name));

    let manifest_path = select_manifest_path(
        &workspace.data_dir(config.as_ref()),
        config.as_ref().map(|c| c.language.as_str()),
    );
    let manifest = Manifest::load(&manifest_path)?;
    let mut document = compose_manifest(&manifest)?;

    if let (Some(config), Some(instance)) = (&config, instance) {
        apply_instance(&mut document, config, workspace, instance);
    }

    Ok(Composition {
        document,
        config,
        manifest_path,
    })
}

/// Compose a CV and write it for its instance, returning the written path.
pub fn compose_and_write(
    workspace: &Workspace,
    instance: Option<&str>,
) -> Result<(Composition, Option<PathBuf>)> {
    let composition = compose(workspace, instance)?;
    let written = composition.write(workspace)?;
    Ok((composition, written))
}

/// Combine a manifest's own fields with all of its parts.
pub fn compose_manifest(manifest: &Manifest) -> Result<Map<String, Value>> {
    let mut document = manifest.fields();

    for part_ref in manifest.parts() {
        let content = manifest::load_part(&part_ref)?;
        let part = Part::classify(&part_ref.name, content);
        debug!(
            "Part '{}' ({}) -> '{}'",
            part_ref.name,
            part_ref.relative,
            part.key()
        );
        part.insert_into(&mut document);
    }

    Ok(document)
}

/// Apply instance overrides and the optional cover letter.
fn apply_instance(
    document: &mut Map<String, Value>,
    config: &InstanceConfig,
    workspace: &Workspace,
    instance: &str,
) {
    if let Some(Value::Object(overload)) = &config.overload {
        merge_maps(document, overload);
    }

    if let Some(html) = cover::load_cover_html(&workspace.cover_path(instance)) {
        document.insert(COVER_HTML_KEY.to_string(), Value::String(html));
    }
}
