//! # Validate Command Implementation
//!
//! Validates CV data against the project's JSON Schema.
//!
//! - With `--file`, one document is checked against the full schema.
//! - Otherwise the default manifest is checked, followed by each of its
//!   declared parts against the matching schema property.
//!
//! Exit status: 0 when valid, 1 when invalid, 2 when the schema or the target
//! cannot be loaded. This command never modifies any files.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use cv_forge::exit_codes;
use cv_forge::output::{emoji, OutputConfig};
use cv_forge::schema::{FileReport, ManifestReport, PartOutcome, SchemaValidator, ValidationIssue};

use crate::cli::Context;

/// Validate CV data against the JSON Schema
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Validate this single file instead of the manifest and its parts.
    #[arg(long, value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// JSON Schema to validate against.
    #[arg(long, value_name = "FILE", default_value = "lib/schema.json")]
    pub schema: PathBuf,

    /// Manifest validated when no `--file` is given.
    #[arg(long, value_name = "FILE", default_value = "data/cv.de.json")]
    pub manifest: PathBuf,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, ctx: &Context) -> Result<ExitCode> {
    let out = &ctx.out;
    let schema_path = ctx.workspace.resolve(&args.schema);

    let validator = match SchemaValidator::from_file(&schema_path) {
        Ok(validator) => validator,
        Err(e) => {
            eprintln!("{} {}", emoji(out, "❌", "[ERR]"), e);
            return Ok(ExitCode::from(exit_codes::LOAD_ERROR));
        }
    };

    let code = match args.file {
        Some(file) => {
            let report = validator.validate_file(&ctx.workspace.resolve(file));
            print_file_report(out, &report);
            report.status.exit_code()
        }
        None => {
            let report = validator.validate_manifest(&ctx.workspace.resolve(&args.manifest));
            print_manifest_report(out, &report);
            report.status().exit_code()
        }
    };

    Ok(ExitCode::from(code))
}

fn print_issues(out: &OutputConfig, issues: &[ValidationIssue]) {
    for issue in issues {
        println!("   {} {}", emoji(out, "•", "-"), issue);
    }
}

fn print_file_report(out: &OutputConfig, report: &FileReport) {
    let path = report.path.display();
    if let Some(message) = &report.load_error {
        eprintln!("{} Cannot load {}: {}", emoji(out, "❌", "[ERR]"), path, message);
    } else if report.issues.is_empty() {
        println!("{} {} is valid", emoji(out, "✅", "[OK]"), path);
    } else {
        println!(
            "{} {} has {} schema violation(s):",
            emoji(out, "❌", "[ERR]"),
            path,
            report.issues.len()
        );
        print_issues(out, &report.issues);
    }
}

fn print_manifest_report(out: &OutputConfig, report: &ManifestReport) {
    let path = report.path.display();
    if let Some(message) = &report.load_error {
        eprintln!("{} Cannot load manifest {}: {}", emoji(out, "❌", "[ERR]"), path, message);
        return;
    }

    if report.manifest_issues.is_empty() {
        println!("{} Manifest {} is valid", emoji(out, "✅", "[OK]"), path);
    } else {
        println!("{} Manifest {} is invalid:", emoji(out, "❌", "[ERR]"), path);
        print_issues(out, &report.manifest_issues);
    }

    if !report.has_parts {
        println!(
            "{} Manifest has no 'parts' object to validate",
            emoji(out, "⚠️", "[WARN]")
        );
        return;
    }

    for part in &report.parts {
        match &part.outcome {
            PartOutcome::Valid { property } => println!(
                "{} {} ({}) matches '{}'",
                emoji(out, "✅", "[OK]"),
                part.name,
                part.relative,
                property
            ),
            PartOutcome::Invalid { property, issues } => {
                println!(
                    "{} {} ({}) violates '{}':",
                    emoji(out, "❌", "[ERR]"),
                    part.name,
                    part.relative,
                    property
                );
                print_issues(out, issues);
            }
            PartOutcome::Skipped => println!(
                "{} {} ({}): no matching schema property, skipped",
                emoji(out, "⚠️", "[WARN]"),
                part.name,
                part.relative
            ),
            PartOutcome::Unreadable { message } => println!(
                "{} {} ({}) cannot be loaded: {}",
                emoji(out, "❌", "[ERR]"),
                part.name,
                part.relative,
                message
            ),
        }
    }

    let failures = report.parts.iter().filter(|p| p.is_failure()).count();
    println!(
        "\n{} {} part(s) checked, {} failed",
        emoji(out, "📊", "[INFO]"),
        report.parts.len(),
        failures
    );
}
