//! # CLI Command Implementations
//!
//! One file per subcommand of the `cv-forge` command-line tool.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and the shared
//!   [`Context`](crate::cli::Context), calls into the `cv_forge` library and
//!   returns the process exit status.

pub mod build;
pub mod completions;
pub mod merge;
pub mod pdf;
pub mod validate;
