//! # Error Handling
//!
//! This module defines the centralized error type for `cv-forge`. It uses the
//! `thiserror` library to build a single `Error` enum covering every failure
//! the library can report, each variant carrying enough context to name the
//! operation that failed.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Fatal pipeline failures (a part that cannot
//!   be loaded, an invalid composed document, a failing external command, an
//!   unreachable preview server, a PDF render that times out) all surface as
//!   one of its variants.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! Recoverable conditions (a missing cover letter, a failed audit copy, an
//! unavailable compression tool) are not represented here: they are logged
//! where they happen and never leave their step.

use std::path::PathBuf;

use thiserror::Error;

use crate::exit_codes;

/// Main error type for cv-forge operations
#[derive(Error, Debug)]
pub enum Error {
    /// A file could not be read from disk.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A file was read but does not contain valid JSON.
    #[error("Failed to parse JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A part referenced by the manifest could not be loaded.
    ///
    /// This aborts composition as a whole; parts are never skipped.
    #[error("Failed to load part '{part}' from {}: {message}", path.display())]
    PartLoad {
        part: String,
        path: PathBuf,
        message: String,
    },

    /// The instance configuration is missing or unusable where it is required.
    #[error("Instance configuration error: {message}")]
    Config { message: String },

    /// The JSON Schema could not be loaded or compiled.
    #[error("Schema error: {message}")]
    Schema { message: String },

    /// A document did not conform to the schema.
    #[error("Validation failed for {}: {issues} issue(s)", path.display())]
    Validation { path: PathBuf, issues: usize },

    /// An external command could not be started or exited unsuccessfully.
    #[error("Command failed: {command} - {message}")]
    Command { command: String, message: String },

    /// The preview server never answered on any of the probed URLs.
    #[error("Preview server not reachable (tried {urls})")]
    PreviewUnavailable { urls: String },

    /// The headless browser failed to produce a PDF.
    #[error("PDF rendering failed for {url}: {message}")]
    Pdf { url: String, message: String },

    /// A render target could not be turned into a URL.
    #[error("Invalid render target '{target}': {message}")]
    Target { target: String, message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON (de)serialization error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Process exit code the composer reports for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Error::PartLoad { .. } => exit_codes::PART_LOAD_FAILURE,
            _ => exit_codes::FAILURE,
        }
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
