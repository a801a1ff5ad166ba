//! # Build Command Implementation
//!
//! Runs the seven-stage build for one instance and prints a summary of the
//! produced artifacts. Any aborting stage exits with status 1.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use cv_forge::build::{BuildPipeline, BuildReport};
use cv_forge::config::{BuildSettings, DEFAULT_DEV_PORT, DEFAULT_PREVIEW_PORT};
use cv_forge::exit_codes;
use cv_forge::output::{emoji, OutputConfig};
use cv_forge::pdf::{ChromePdfRenderer, DEFAULT_RENDER_TIMEOUT};

use crate::cli::Context;

/// Build PDFs for an instance
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Instance directory name under `instances/`.
    #[arg(
        long = "instanceDir",
        visible_alias = "instance-dir",
        value_name = "NAME",
        default_value = "default"
    )]
    pub instance_dir: String,

    /// Port of the local preview server.
    #[arg(long, value_name = "PORT", env = "PREVIEW_PORT", default_value_t = DEFAULT_PREVIEW_PORT)]
    pub preview_port: u16,

    /// Port of the development server tried when the preview is unreachable.
    #[arg(long, value_name = "PORT", default_value_t = DEFAULT_DEV_PORT)]
    pub dev_port: u16,

    /// Seconds to wait for each server URL.
    #[arg(long, value_name = "SECONDS", default_value_t = 15)]
    pub preview_timeout: u64,
}

impl BuildArgs {
    fn settings(&self) -> BuildSettings {
        BuildSettings {
            preview_port: self.preview_port,
            dev_port: self.dev_port,
            preview_timeout: Duration::from_secs(self.preview_timeout),
            ..BuildSettings::default()
        }
    }
}

/// Execute the `build` command.
pub fn execute(args: BuildArgs, ctx: &Context) -> Result<ExitCode> {
    let out = &ctx.out;
    let settings = args.settings();
    let renderer = ChromePdfRenderer::new(DEFAULT_RENDER_TIMEOUT);
    let pipeline = BuildPipeline::new(&ctx.workspace, &settings, &renderer, out);

    match pipeline.run(&args.instance_dir) {
        Ok(report) => {
            print_summary(out, &report);
            Ok(ExitCode::from(exit_codes::SUCCESS))
        }
        Err(e) => {
            eprintln!("\n{} Build failed: {}", emoji(out, "❌", "[ERR]"), e);
            Ok(ExitCode::from(exit_codes::FAILURE))
        }
    }
}

fn print_summary(out: &OutputConfig, report: &BuildReport) {
    println!("\n{} Build finished", emoji(out, "🎉", "[DONE]"));
    println!("   CV data:    {}", report.canonical_json.display());
    if let Some(audit) = &report.audit_copy {
        println!("   Audit copy: {}", audit.display());
    }
    println!("   Rendered:   {}", report.url);
    for pdf in &report.pdfs {
        println!("   PDF:        {}", pdf.display());
    }
    for pdf in &report.compressed {
        println!("   Compressed: {}", pdf.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_args() {
        let args = BuildArgs {
            instance_dir: "x".to_string(),
            preview_port: 5000,
            dev_port: 5001,
            preview_timeout: 3,
        };

        let settings = args.settings();

        assert_eq!(settings.preview_port, 5000);
        assert_eq!(settings.dev_port, 5001);
        assert_eq!(settings.preview_timeout, Duration::from_secs(3));
        assert_eq!(settings.compress_command, "gs");
    }
}
