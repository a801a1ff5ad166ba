//! # cv-forge
//!
//! Builds CVs from modular JSON data. A per-language manifest lists the part
//! files of a CV; an instance (one tailored application) picks a language, a
//! template and a set of overrides. The library composes the pieces into one
//! document, validates it against a JSON Schema and drives a static-site
//! build whose rendered page is exported to PDF.
//!
//! ## Quick Example
//!
//! ```
//! use cv_forge::merge::deep_merge;
//! use serde_json::json;
//!
//! let mut cv = json!({"basics": {"name": "A", "summary": "base"}, "skills": [1, 2, 3]});
//! deep_merge(&mut cv, &json!({"basics": {"summary": "tailored"}, "skills": [1]}));
//!
//! assert_eq!(
//!     cv,
//!     json!({"basics": {"name": "A", "summary": "tailored"}, "skills": [1]})
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Defaults (`defaults`)**: Turns a sparse `config.json` into a complete
//!   [`defaults::InstanceConfig`].
//! - **Deep merge (`merge`)**: Objects merge recursively; arrays and scalars
//!   replace.
//! - **Composition (`compose`)**: Manifest fields, parts and instance
//!   overrides assembled into the canonical document.
//! - **Validation (`schema`)**: Whole-document and per-part checks against
//!   the project's JSON Schema.
//! - **Build (`build`)**: The seven-stage pipeline from data to compressed
//!   PDFs.
//! - **PDF export (`pdf`)**: Headless Chrome rendering of a page to A4.
//!
//! ## Project Layout
//!
//! Every path is resolved against a project root ([`config::Workspace`]):
//!
//! ```text
//! data/cv.<lang>.json              manifest
//! data/<part>.json                 part files
//! data/assets/                     static assets served with the site
//! lib/schema.json                  JSON Schema
//! instances/<name>/config.json     instance configuration
//! instances/<name>/cover.md        optional cover letter
//! instances/<name>/generated/      composed JSON, audit copies and PDFs
//! ```

pub mod build;
pub mod compose;
pub mod config;
pub mod defaults;
pub mod error;
pub mod exit_codes;
pub mod filesystem;
pub mod merge;
pub mod output;
pub mod pdf;
pub mod schema;

#[cfg(test)]
mod merge_proptest;
