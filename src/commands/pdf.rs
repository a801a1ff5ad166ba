//! # PDF Command Implementation
//!
//! Renders a URL or a local HTML file to an A4 PDF with headless Chrome.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use cv_forge::exit_codes;
use cv_forge::output::emoji;
use cv_forge::pdf::{export, ChromePdfRenderer};

use crate::cli::Context;

/// Render a page to PDF
#[derive(Args, Debug)]
pub struct PdfArgs {
    /// URL (http, https, file) or path of the page to render.
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Output PDF file.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Seconds to wait for the page to load.
    #[arg(long, value_name = "SECONDS", default_value_t = 30)]
    pub timeout: u64,
}

/// Execute the `pdf` command.
pub fn execute(args: PdfArgs, ctx: &Context) -> Result<ExitCode> {
    let renderer = ChromePdfRenderer::new(Duration::from_secs(args.timeout));
    export(&renderer, &args.target, &args.output)?;
    println!(
        "{} PDF written to {}",
        emoji(&ctx.out, "📄", "[OK]"),
        args.output.display()
    );
    Ok(ExitCode::from(exit_codes::SUCCESS))
}
