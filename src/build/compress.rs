//! PDF compression through Ghostscript.

use std::path::{Path, PathBuf};

use log::{info, warn};

use super::artifacts::compressed_path;
use super::process::{run_command, tool_available};
use crate::error::Result;

/// Compresses PDFs to an "ebook"-quality variant with an external tool.
#[derive(Debug, Clone)]
pub struct Compressor {
    program: String,
}

impl Compressor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Whether the tool answers `--version`.
    pub fn is_available(&self) -> bool {
        tool_available(&self.program)
    }

    /// Command line that writes `output` from `input`.
    pub fn command_line(&self, input: &Path, output: &Path) -> Vec<String> {
        vec![
            self.program.clone(),
            "-sDEVICE=pdfwrite".to_string(),
            "-dNOPAUSE".to_string(),
            "-dQUIET".to_string(),
            "-dBATCH".to_string(),
            "-dPDFSETTINGS=/ebook".to_string(),
            format!("-sOutputFile={}", output.display()),
            input.display().to_string(),
        ]
    }

    /// Compress `input` to `<base>_compressed.pdf` beside it.
    ///
    /// The tool runs in the PDF's directory, so both paths are made absolute
    /// before they are handed over.
    pub fn compress(&self, input: &Path) -> Result<PathBuf> {
        let input = std::path::absolute(input)?;
        let output = compressed_path(&input);
        let cwd = input.parent().unwrap_or_else(|| Path::new("/"));
        run_command(&self.command_line(&input, &output), cwd, &[])?;
        Ok(output)
    }

    /// Compress every PDF, logging failures. Returns the files written.
    pub fn compress_all(&self, pdfs: &[PathBuf]) -> Vec<PathBuf> {
        let mut written = Vec::new();
        for pdf in pdfs {
            match self.compress(pdf) {
                Ok(output) => {
                    info!("Compressed PDF: {}", output.display());
                    written.push(output);
                }
                Err(e) => warn!("Compression of {} failed: {}", pdf.display(), e),
            }
        }
        written
    }
}
