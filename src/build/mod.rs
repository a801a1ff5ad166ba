//! # Build Pipeline
//!
//! Turns an instance into finished PDFs in seven strictly sequential stages:
//!
//! 1. Compose the CV and keep a timestamped audit copy.
//! 2. Validate the composed document against the schema.
//! 3. Run the project's static checks.
//! 4. Build the static site with the CV injected into its environment.
//! 5. Start the preview server, copy data assets and wait for the page.
//! 6. Render the PDF (or a cover letter and a CV when `separateCover` is set).
//! 7. Compress the PDFs when Ghostscript is installed.
//!
//! Stages 1 to 5 abort the build on failure. Side steps (audit copy, asset
//! copy, compression) only log their failures. The preview server is always
//! stopped once rendering has finished, whatever its outcome.

pub mod artifacts;
pub mod compress;
pub mod preview;
pub mod process;

use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::compose::compose_and_write;
use crate::config::{BuildSettings, Workspace};
use crate::defaults::InstanceConfig;
use crate::error::{Error, Result};
use crate::filesystem::{copy_dir_all, ensure_dir};
use crate::output::{emoji, stage_marker, OutputConfig};
use crate::pdf::PdfRenderer;
use crate::schema::SchemaValidator;

use artifacts::ArtifactNames;
use compress::Compressor;
use preview::{template_url, with_mode, ReadinessProbe};
use process::{run_command, BackgroundProcess};

/// Environment variable carrying the composed CV into the static build.
pub const CV_DATA_ENV: &str = "VITE_CV_DATA";
/// Environment variable carrying the resolved instance configuration.
pub const INSTANCE_CONFIG_ENV: &str = "VITE_CV_INSTANCE_CONFIG";
/// Environment variable telling the preview server which port to bind.
pub const PREVIEW_PORT_ENV: &str = "PREVIEW_PORT";

/// Everything a successful build produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub canonical_json: PathBuf,
    pub audit_copy: Option<PathBuf>,
    pub url: String,
    pub pdfs: Vec<PathBuf>,
    pub compressed: Vec<PathBuf>,
}

/// The build pipeline for one project.
pub struct BuildPipeline<'a> {
    workspace: &'a Workspace,
    settings: &'a BuildSettings,
    renderer: &'a dyn PdfRenderer,
    out: &'a OutputConfig,
}

impl<'a> BuildPipeline<'a> {
    pub fn new(
        workspace: &'a Workspace,
        settings: &'a BuildSettings,
        renderer: &'a dyn PdfRenderer,
        out: &'a OutputConfig,
    ) -> Self {
        Self {
            workspace,
            settings,
            renderer,
            out,
        }
    }

    fn stage(&self, number: usize, title: &str) {
        println!("\n{}", stage_marker(self.out, number, title));
    }

    /// Run all stages for `instance`.
    pub fn run(&self, instance: &str) -> Result<BuildReport> {
        let root = self.workspace.root();

        self.stage(1, "Merging CV data");
        let (config, canonical_json) = self.compose(instance)?;
        let names = ArtifactNames::new(
            self.workspace.output_dir(&config),
            config.file_stem(),
            artifacts::timestamp(),
        );
        let audit_copy = self.write_audit_copy(&canonical_json, &names);

        self.stage(2, "Validating merged CV");
        self.validate(&canonical_json)?;

        self.stage(3, "Running static checks");
        run_command(&self.settings.check_command, root, &[])?;

        self.stage(4, "Building static site");
        let cv_data = compact_json(&canonical_json);
        let config_json = serde_json::to_string(&config)?;
        run_command(
            &self.settings.build_command,
            root,
            &[(CV_DATA_ENV, &cv_data), (INSTANCE_CONFIG_ENV, &config_json)],
        )?;

        self.stage(5, "Starting preview server");
        let port = self.settings.preview_port.to_string();
        let mut server = BackgroundProcess::spawn(
            &self.settings.preview_command,
            root,
            &[(PREVIEW_PORT_ENV, &port)],
        )?;
        self.copy_assets();
        let url = self.wait_for_preview(&config.template)?;
        println!("{} Preview ready at {}", emoji(self.out, "🌐", "[OK]"), url);

        self.stage(6, "Rendering PDF");
        let rendered = self.render(&url, &config, &names);
        server.stop();
        let pdfs = rendered?;

        self.stage(7, "Compressing PDF");
        let compressed = self.compress(&pdfs);

        Ok(BuildReport {
            canonical_json,
            audit_copy,
            url,
            pdfs,
            compressed,
        })
    }

    fn compose(&self, instance: &str) -> Result<(InstanceConfig, PathBuf)> {
        let (composition, written) = compose_and_write(self.workspace, Some(instance))?;
        match (composition.config, written) {
            (Some(config), Some(path)) => {
                println!(
                    "{} Merged CV written to {}",
                    emoji(self.out, "✅", "[OK]"),
                    path.display()
                );
                Ok((config, path))
            }
            _ => Err(Error::Config {
                message: format!(
                    "no usable configuration at {}; nothing to build",
                    self.workspace.instance_config_path(instance).display()
                ),
            }),
        }
    }

    fn write_audit_copy(&self, canonical: &Path, names: &ArtifactNames) -> Option<PathBuf> {
        let target = names.audit_copy();
        match fs::copy(canonical, &target) {
            Ok(_) => {
                info!("Audit copy written to {}", target.display());
                Some(target)
            }
            Err(e) => {
                warn!("Could not write audit copy {}: {}", target.display(), e);
                None
            }
        }
    }

    fn validate(&self, canonical: &Path) -> Result<()> {
        let validator = SchemaValidator::from_file(&self.workspace.schema_path())?;
        let report = validator.validate_file(canonical);
        if report.status.is_valid() {
            println!("{} Schema validation passed", emoji(self.out, "✅", "[OK]"));
            return Ok(());
        }

        if let Some(message) = &report.load_error {
            eprintln!("{} {}", emoji(self.out, "❌", "[ERR]"), message);
        }
        for issue in &report.issues {
            eprintln!("{} {}", emoji(self.out, "❌", "[ERR]"), issue);
        }
        Err(Error::Validation {
            path: canonical.to_path_buf(),
            issues: report.issues.len(),
        })
    }

    fn copy_assets(&self) {
        let source = self.workspace.assets_dir();
        let target = self
            .workspace
            .resolve(&self.settings.dist_dir)
            .join("data")
            .join("assets");
        match copy_dir_all(&source, &target) {
            Ok(count) => info!("Copied {} asset(s) to {}", count, target.display()),
            Err(e) => warn!("Could not copy assets to {}: {}", target.display(), e),
        }
    }

    fn wait_for_preview(&self, template: &str) -> Result<String> {
        let host = &self.settings.preview_host;
        let primary = template_url(host, self.settings.preview_port, template);
        let fallback = template_url(host, self.settings.dev_port, template);
        ReadinessProbe::from_settings(self.settings).wait_for_any(&primary, &fallback)
    }

    fn render(&self, url: &str, config: &InstanceConfig, names: &ArtifactNames) -> Result<Vec<PathBuf>> {
        ensure_dir(names.output_dir())?;

        let jobs = if config.separate_cover {
            vec![
                (with_mode(url, "cover"), names.cover_pdf()),
                (with_mode(url, "cv"), names.cv_pdf()),
            ]
        } else {
            vec![(url.to_string(), names.cv_pdf())]
        };

        let mut pdfs = Vec::with_capacity(jobs.len());
        for (page, output) in jobs {
            self.renderer.render(&page, &output)?;
            println!(
                "{} PDF written to {}",
                emoji(self.out, "📄", "[OK]"),
                output.display()
            );
            pdfs.push(output);
        }
        Ok(pdfs)
    }

    fn compress(&self, pdfs: &[PathBuf]) -> Vec<PathBuf> {
        let compressor = Compressor::new(&self.settings.compress_command);
        if !compressor.is_available() {
            info!(
                "{} not found; skipping PDF compression",
                self.settings.compress_command
            );
            return Vec::new();
        }
        compressor.compress_all(pdfs)
    }
}

/// The canonical document as compact JSON, or `{}` if it cannot be re-read.
fn compact_json(path: &Path) -> String {
    let parsed = fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str::<serde_json::Value>(&text).map_err(|e| e.to_string()));
    match parsed {
        Ok(value) => value.to_string(),
        Err(e) => {
            warn!("Could not re-read {}: {}; passing empty data", path.display(), e);
            "{}".to_string()
        }
    }
}
