//! Naming of build artifacts.
//!
//! A build shares one timestamp between its audit copy and its PDFs, so the
//! files of one run sort together in the output directory.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Format a time as UTC ISO-8601 with `:` and `.` replaced by `-`.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H-%M-%S-%3fZ").to_string()
}

/// The current time, formatted for artifact names.
pub fn timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Paths of the files one build writes into the instance output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactNames {
    output_dir: PathBuf,
    stem: String,
    stamp: String,
}

impl ArtifactNames {
    pub fn new(output_dir: impl Into<PathBuf>, stem: impl Into<String>, stamp: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            stem: stem.into(),
            stamp: stamp.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// `cv.<name>.<timestamp>.json`
    pub fn audit_copy(&self) -> PathBuf {
        self.named("cv", "json")
    }

    /// `cv.<name>.<timestamp>.pdf`
    pub fn cv_pdf(&self) -> PathBuf {
        self.named("cv", "pdf")
    }

    /// `cover.<name>.<timestamp>.pdf`
    pub fn cover_pdf(&self) -> PathBuf {
        self.named("cover", "pdf")
    }

    fn named(&self, kind: &str, extension: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}.{}.{}", kind, self.stem, self.stamp, extension))
    }
}

/// `<base>_compressed.pdf` next to `pdf`.
pub fn compressed_path(pdf: &Path) -> PathBuf {
    let stem = pdf
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    pdf.with_file_name(format!("{}_compressed.pdf", stem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let time = Utc.with_ymd_and_hms(2026, 10, 16, 9, 41, 7).unwrap()
            + chrono::Duration::milliseconds(123);
        assert_eq!(format_timestamp(time), "2026-10-16T09-41-07-123Z");
    }

    #[test]
    fn test_timestamp_has_no_colons_or_dots() {
        let stamp = timestamp();
        assert!(!stamp.contains(':'));
        assert!(!stamp.contains('.'));
        assert!(stamp.ends_with('Z'));
    }

    #[test]
    fn test_artifact_names() {
        let names = ArtifactNames::new("/out", "x", "T1");
        assert_eq!(names.audit_copy(), PathBuf::from("/out/cv.x.T1.json"));
        assert_eq!(names.cv_pdf(), PathBuf::from("/out/cv.x.T1.pdf"));
        assert_eq!(names.cover_pdf(), PathBuf::from("/out/cover.x.T1.pdf"));
    }

    #[test]
    fn test_compressed_path() {
        assert_eq!(
            compressed_path(Path::new("/out/cv.x.T1.pdf")),
            PathBuf::from("/out/cv.x.T1_compressed.pdf")
        );
    }
}
