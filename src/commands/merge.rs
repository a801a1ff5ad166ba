//! # Merge Command Implementation
//!
//! Composes an instance's CV from the language manifest, its parts and the
//! instance's overrides, then writes `instances/<name>/generated/cv.<name>.json`.
//!
//! Without `--instanceDir`, or when the instance has no readable
//! `config.json`, the manifest is still composed (and checked for loadable
//! parts) but nothing is written. A part that cannot be loaded exits with
//! status 2.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use cv_forge::compose::compose_and_write;
use cv_forge::exit_codes;
use cv_forge::output::emoji;

use crate::cli::Context;

/// Compose an instance's CV
#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Instance directory name under `instances/`.
    #[arg(long = "instanceDir", visible_alias = "instance-dir", value_name = "NAME")]
    pub instance_dir: Option<String>,
}

/// Execute the `merge` command.
pub fn execute(args: MergeArgs, ctx: &Context) -> Result<ExitCode> {
    let out = &ctx.out;
    let (composition, written) = compose_and_write(&ctx.workspace, args.instance_dir.as_deref())?;

    println!(
        "{} Composed {} from {}",
        emoji(out, "🧩", "[OK]"),
        match composition.document.len() {
            1 => "1 top-level key".to_string(),
            n => format!("{} top-level keys", n),
        },
        composition.manifest_path.display()
    );
    match written {
        Some(path) => println!(
            "{} Wrote merged CV to {}",
            emoji(out, "✅", "[OK]"),
            path.display()
        ),
        None => println!(
            "{} No instance configuration; nothing written",
            emoji(out, "ℹ️", "[INFO]")
        ),
    }

    Ok(ExitCode::from(exit_codes::SUCCESS))
}
