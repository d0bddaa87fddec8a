use std::path::Path;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use reqwest::multipart::Part;

use crate::error::{Error, Result};

pub const OCTET_STREAM: &str = "application/octet-stream";

/// A file picked on the operator's machine, held fully in memory.
#[derive(Debug, Clone)]
pub struct LocalFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Bytes,
    pub last_modified: Option<DateTime<Utc>>,
}

impl LocalFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
            last_modified: None,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| {
                Error::InvalidFile(vec![format!("Path {} has no file name", path.display())])
            })?;
        let metadata = tokio::fs::metadata(path).await?;
        let data = tokio::fs::read(path).await?;
        let media_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            name,
            media_type,
            bytes: Bytes::from(data),
            last_modified: metadata.modified().ok().map(DateTime::<Utc>::from),
        })
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }

    pub fn is_pdf(&self) -> bool {
        self.media_type == "application/pdf"
    }

    pub fn to_part(&self) -> Result<Part> {
        let part = Part::stream_with_length(self.bytes.clone(), self.size())
            .file_name(self.name.clone())
            .mime_str(&self.media_type)?;
        Ok(part)
    }
}

/// Binary response body from a download, preview or export call.
#[derive(Debug, Clone)]
pub struct Blob {
    pub bytes: Bytes,
    pub content_type: String,
    pub filename: Option<String>,
}

impl Blob {
    pub fn new(bytes: impl Into<Bytes>, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            content_type: content_type.into(),
            filename: None,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub async fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        tokio::fs::write(path, &self.bytes).await?;
        Ok(())
    }
}

impl From<LocalFile> for Blob {
    fn from(file: LocalFile) -> Self {
        Self {
            bytes: file.bytes,
            content_type: file.media_type,
            filename: Some(file.name),
        }
    }
}

/// `attachment; filename="resume.pdf"` -> `resume.pdf`
///
/// Only the final path component survives, so the result is always safe to
/// join onto a local directory.
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let start = header.find("filename=")? + "filename=".len();
    let rest = header[start..].trim_start();
    let raw = match rest.strip_prefix('"') {
        Some(quoted) => quoted.split('"').next().unwrap_or_default(),
        None => rest.split(';').next().unwrap_or_default().trim(),
    };
    safe_file_name(raw)
}

fn safe_file_name(raw: &str) -> Option<String> {
    let last = raw.rsplit(|c| c == '/' || c == '\\').next().unwrap_or_default();
    Path::new(last)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_filename_is_unquoted() {
        assert_eq!(
            filename_from_disposition("attachment; filename=\"John Doe Resume.pdf\"").as_deref(),
            Some("John Doe Resume.pdf")
        );
        assert_eq!(filename_from_disposition("inline").as_deref(), None);
        assert_eq!(filename_from_disposition("attachment; filename=\"\"").as_deref(), None);
        assert_eq!(
            filename_from_disposition("attachment; filename=report.xlsx; size=12").as_deref(),
            Some("report.xlsx")
        );
    }

    #[test]
    fn disposition_filename_keeps_semicolons_inside_quotes() {
        assert_eq!(
            filename_from_disposition("attachment; filename=\"a;b.pdf\"").as_deref(),
            Some("a;b.pdf")
        );
    }

    #[test]
    fn disposition_filename_drops_directories() {
        assert_eq!(
            filename_from_disposition("attachment; filename=\"../../../tmp/evil.sh\"").as_deref(),
            Some("evil.sh")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=\"/etc/cron.d/x\"").as_deref(),
            Some("x")
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=\"..\\..\\boot.ini\"").as_deref(),
            Some("boot.ini")
        );
        assert_eq!(filename_from_disposition("attachment; filename=\"..\"").as_deref(), None);
        assert_eq!(filename_from_disposition("attachment; filename=\"dir/\"").as_deref(), None);
    }

    #[tokio::test]
    async fn from_path_guesses_media_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passport.PNG");
        tokio::fs::write(&path, b"\x89PNG fake").await.unwrap();

        let file = LocalFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "passport.PNG");
        assert_eq!(file.media_type, "image/png");
        assert_eq!(file.size(), 9);
        assert!(file.is_image());
        assert!(file.last_modified.is_some());
    }
}
