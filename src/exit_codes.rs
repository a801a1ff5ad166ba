//! Process exit codes used by the `cv-forge` subcommands.
//!
//! - `merge`: 0 on success, 2 when a manifest part cannot be loaded.
//! - `validate`: 0 valid, 1 invalid, 2 when a file cannot be read or parsed.
//! - `build`: 0 on success, 1 when any aborting stage fails.
//!
//! Command-line usage errors are reported by `clap` with its own status.

/// The operation completed successfully.
pub const SUCCESS: u8 = 0;

/// Generic failure.
pub const FAILURE: u8 = 1;

/// A part referenced by the manifest could not be loaded.
pub const PART_LOAD_FAILURE: u8 = 2;

/// The validated document does not conform to the schema.
pub const INVALID: u8 = 1;

/// The document or schema could not be read or parsed.
pub const LOAD_ERROR: u8 = 2;
