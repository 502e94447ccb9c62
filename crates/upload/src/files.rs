//! Candidate files picked or dropped by the user.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::{DOCX_MIME, PDF_MIME};

/// Where a candidate file's bytes live.
///
/// Disk-backed files are only read when submitted, so validation of an
/// oversized file never touches its contents.
#[derive(Clone)]
pub enum FileSource {
    Memory(Arc<[u8]>),
    Disk(PathBuf),
}

impl fmt::Debug for FileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSource::Memory(bytes) => write!(f, "Memory({} bytes)", bytes.len()),
            FileSource::Disk(path) => f.debug_tuple("Disk").field(path).finish(),
        }
    }
}

impl FileSource {
    /// Reads the full contents.
    pub async fn read(&self) -> std::io::Result<Vec<u8>> {
        match self {
            FileSource::Memory(bytes) => Ok(bytes.to_vec()),
            FileSource::Disk(path) => tokio::fs::read(path).await,
        }
    }
}

/// A file handle as delivered by a picker or drop event.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    pub mime_type: String,
    pub source: FileSource,
}

impl SelectedFile {
    /// Wraps in-memory contents.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        let bytes = bytes.into();
        Self {
            name: name.into(),
            size_bytes: bytes.len() as u64,
            mime_type: mime_type.into(),
            source: FileSource::Memory(bytes),
        }
    }

    /// Describes a file on disk from its metadata. Contents are not read.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("not a regular file: {}", path.display()),
            ));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = detect_mime_type(&name).to_string();

        Ok(Self {
            name,
            size_bytes: metadata.len(),
            mime_type,
            source: FileSource::Disk(path.to_path_buf()),
        })
    }
}

/// Infers a MIME type from a file name's extension.
pub fn detect_mime_type(file_name: &str) -> &'static str {
    let ext = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase());

    match ext.as_deref() {
        Some("pdf") => PDF_MIME,
        Some("docx") => DOCX_MIME,
        Some("doc") => "application/msword",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        _ => "application/octet-stream",
    }
}

const SIZE_UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

/// Formats a byte count with binary multiples and at most two decimals,
/// dropping trailing zeros: `2097152` → `2MB`, `1536` → `1.5KB`.
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".into();
    }

    let mut unit = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{rounded}{}", SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_examples() {
        assert_eq!(format_bytes(0), "0 Bytes");
        assert_eq!(format_bytes(512), "512Bytes");
        assert_eq!(format_bytes(1536), "1.5KB");
        assert_eq!(format_bytes(2 * 1024 * 1024), "2MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 + 1), "3MB");
        assert_eq!(format_bytes(1_288_490_189), "1.2GB");
    }

    #[test]
    fn detect_known_types() {
        assert_eq!(detect_mime_type("cv.pdf"), PDF_MIME);
        assert_eq!(detect_mime_type("CV.DOCX"), DOCX_MIME);
        assert_eq!(detect_mime_type("old.doc"), "application/msword");
        assert_eq!(detect_mime_type("noext"), "application/octet-stream");
    }

    #[test]
    fn from_bytes_sets_size() {
        let file = SelectedFile::from_bytes("a.pdf", PDF_MIME, vec![0u8; 10]);
        assert_eq!(file.size_bytes, 10);
        assert_eq!(format!("{:?}", file.source), "Memory(10 bytes)");
    }

    #[test]
    fn from_path_reads_metadata_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.pdf");
        std::fs::write(&path, b"%PDF-1.7 test").unwrap();

        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.name, "resume.pdf");
        assert_eq!(file.size_bytes, 13);
        assert_eq!(file.mime_type, PDF_MIME);
        assert!(matches!(file.source, FileSource::Disk(_)));
    }

    #[test]
    fn from_path_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SelectedFile::from_path(dir.path()).is_err());
    }

    #[tokio::test]
    async fn read_disk_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        std::fs::write(&path, b"PK\x03\x04").unwrap();

        let file = SelectedFile::from_path(&path).unwrap();
        assert_eq!(file.source.read().await.unwrap(), b"PK\x03\x04");
    }
}
