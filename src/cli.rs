//! CLI argument parsing and command dispatch

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cv_forge::config::Workspace;
use cv_forge::output::OutputConfig;

use crate::commands;

/// cv-forge - Compose, validate and render CVs from modular JSON data
#[derive(Parser, Debug)]
#[command(name = "cv-forge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Project root against which data/, lib/ and instances/ are resolved
    #[arg(
        long,
        global = true,
        value_name = "DIR",
        env = "CV_FORGE_ROOT",
        default_value = "."
    )]
    root: PathBuf,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compose an instance's CV and write it to its output directory
    Merge(commands::merge::MergeArgs),

    /// Validate a CV file, or the default manifest and its parts
    Validate(commands::validate::ValidateArgs),

    /// Run the full pipeline from data to PDF
    Build(commands::build::BuildArgs),

    /// Render a URL or HTML file to an A4 PDF
    Pdf(commands::pdf::PdfArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

/// Shared context handed to every command.
pub struct Context {
    pub workspace: Workspace,
    pub out: OutputConfig,
}

impl Cli {
    fn init_logging(&self) {
        let env = env_logger::Env::default().default_filter_or(self.log_level.as_str());
        // A second initialization only happens in tests; ignore it
        let _ = env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .try_init();
    }

    /// Execute the CLI command
    pub fn execute(self) -> Result<ExitCode> {
        self.init_logging();

        let ctx = Context {
            workspace: Workspace::new(self.root.clone()),
            out: OutputConfig::from_env_and_flag(&self.color),
        };

        match self.command {
            Commands::Merge(args) => commands::merge::execute(args, &ctx),
            Commands::Validate(args) => commands::validate::execute(args, &ctx),
            Commands::Build(args) => commands::build::execute(args, &ctx),
            Commands::Pdf(args) => commands::pdf::execute(args, &ctx),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
