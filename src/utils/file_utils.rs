use serde::Serialize;
use std::fmt;

use crate::models::file::LocalFile;

pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

pub const DEFAULT_ALLOWED_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
    "text/plain",
    "application/vnd.ms-excel",
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    "application/zip",
    "application/x-zip-compressed",
];

const PREVIEWABLE_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png", "gif", "webp", "txt"];

const DEFAULT_ICON: &str = "📎";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub name: String,
    pub size: String,
    pub media_type: String,
    pub last_modified: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileValidation {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub file_info: FileInfo,
}

/// Checks media type, size ceiling and emptiness, reporting every violation.
/// An empty `allowed_types` means [`DEFAULT_ALLOWED_TYPES`].
pub fn validate_file(file: &LocalFile, allowed_types: &[&str], max_size: u64) -> FileValidation {
    let allowed = if allowed_types.is_empty() {
        DEFAULT_ALLOWED_TYPES
    } else {
        allowed_types
    };
    let size = file.size();
    let mut errors = Vec::new();

    if !allowed.iter().any(|t| t.eq_ignore_ascii_case(&file.media_type)) {
        errors.push(format!(
            "File type \"{}\" is not supported. Please upload PDF, Word, Excel, or Image files.",
            file.media_type
        ));
    }

    if size > max_size {
        errors.push(format!(
            "File size exceeds {}MB limit. Current size: {}",
            (max_size as f64 / 1024.0 / 1024.0).round(),
            format_file_size(size as i64)
        ));
    }

    if size == 0 {
        errors.push("File appears to be empty. Please select a valid file.".to_string());
    }

    FileValidation {
        is_valid: errors.is_empty(),
        errors,
        file_info: FileInfo {
            name: file.name.clone(),
            size: format_file_size(size as i64),
            media_type: file.media_type.clone(),
            last_modified: file
                .last_modified
                .map(|ts| ts.format("%Y-%m-%d").to_string()),
        },
    }
}

pub fn format_file_size(bytes: i64) -> String {
    const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];

    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    if bytes < 0 {
        return "Invalid size".to_string();
    }

    let mut exponent = 0;
    while exponent < UNITS.len() - 1 && bytes >= 1024_i64.pow(exponent as u32 + 1) {
        exponent += 1;
    }

    if exponent == 0 {
        return format!("{} {}", bytes, UNITS[0]);
    }

    let scaled = bytes as f64 / 1024_f64.powi(exponent as i32);
    let rendered = format!("{:.1}", scaled);
    let rendered = rendered.strip_suffix(".0").unwrap_or(&rendered);
    format!("{} {}", rendered, UNITS[exponent])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Document,
    Image,
    Spreadsheet,
    Presentation,
    Video,
    Audio,
    Archive,
    Other,
}

impl FileCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileCategory::Document => "document",
            FileCategory::Image => "image",
            FileCategory::Spreadsheet => "spreadsheet",
            FileCategory::Presentation => "presentation",
            FileCategory::Video => "video",
            FileCategory::Audio => "audio",
            FileCategory::Archive => "archive",
            FileCategory::Other => "other",
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lowercased text after the last dot; empty when there is none.
pub fn extension(filename: &str) -> String {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

pub fn file_category(filename: &str) -> FileCategory {
    match extension(filename).as_str() {
        "pdf" | "doc" | "docx" | "txt" | "rtf" => FileCategory::Document,
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" | "svg" => FileCategory::Image,
        "xls" | "xlsx" | "csv" => FileCategory::Spreadsheet,
        "ppt" | "pptx" => FileCategory::Presentation,
        "mp4" | "avi" | "mov" | "wmv" | "flv" | "webm" => FileCategory::Video,
        "mp3" | "wav" | "flac" | "aac" => FileCategory::Audio,
        "zip" | "rar" | "7z" | "tar" | "gz" => FileCategory::Archive,
        _ => FileCategory::Other,
    }
}

pub fn file_icon(filename: &str) -> &'static str {
    match extension(filename).as_str() {
        "pdf" | "txt" | "rtf" => "📄",
        "doc" | "docx" => "📝",
        "xls" | "xlsx" | "csv" => "📊",
        "ppt" | "pptx" => "📽️",
        "jpg" | "jpeg" | "png" | "gif" | "bmp" | "webp" | "svg" => "🖼️",
        "mp4" | "avi" | "mov" | "wmv" | "flv" | "webm" => "🎥",
        "mp3" | "wav" | "flac" | "aac" => "🎵",
        "zip" | "rar" | "7z" | "tar" | "gz" => "🗜️",
        "js" | "html" | "css" | "java" | "py" | "cpp" | "c" => "💻",
        _ => DEFAULT_ICON,
    }
}

pub fn can_preview(filename: &str) -> bool {
    PREVIEWABLE_EXTENSIONS.contains(&extension(filename).as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(media_type: &str, size: usize) -> LocalFile {
        LocalFile::new("upload.bin", media_type, vec![b'x'; size])
    }

    #[test]
    fn empty_file_is_rejected_whatever_its_type() {
        for media_type in ["application/pdf", "video/mp4"] {
            let result = validate_file(&file(media_type, 0), &[], DEFAULT_MAX_FILE_SIZE);
            assert!(!result.is_valid);
            assert!(result.errors.iter().any(|e| e.contains("empty")));
        }
    }

    #[test]
    fn bad_type_and_oversize_are_both_reported() {
        let result = validate_file(&file("video/mp4", 2048), &[], 1024);
        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].contains("video/mp4"));
        assert!(result.errors[1].contains("exceeds"));
        assert!(result.errors[1].contains("2 KB"));
    }

    #[test]
    fn custom_allow_list_replaces_default() {
        let ok = validate_file(&file("image/png", 10), &["image/png"], DEFAULT_MAX_FILE_SIZE);
        assert!(ok.is_valid);
        assert!(ok.errors.is_empty());
        assert_eq!(ok.file_info.size, "10 Bytes");

        let rejected = validate_file(&file("application/pdf", 10), &["image/png"], DEFAULT_MAX_FILE_SIZE);
        assert!(!rejected.is_valid);
    }

    #[test]
    fn size_at_ceiling_passes() {
        let result = validate_file(&file("text/plain", 1024), &[], 1024);
        assert!(result.is_valid);
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(-5), "Invalid size");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10 MB");
        assert_eq!(format_file_size(3 * 1024_i64.pow(3)), "3 GB");
        assert_eq!(format_file_size(2048 * 1024_i64.pow(4)), "2048 TB");
    }

    #[test]
    fn lookups_are_total_and_case_insensitive() {
        assert_eq!(file_icon(""), DEFAULT_ICON);
        assert_eq!(file_icon("no_extension"), DEFAULT_ICON);
        assert_eq!(file_icon("weird.xyz"), DEFAULT_ICON);
        assert_eq!(file_icon("Resume.PDF"), "📄");
        assert_eq!(file_icon("main.PY"), "💻");

        assert_eq!(file_category(""), FileCategory::Other);
        assert_eq!(file_category("trailing."), FileCategory::Other);
        assert_eq!(file_category("Scan.JPEG"), FileCategory::Image);
        assert_eq!(file_category("backup.tar.gz"), FileCategory::Archive);
        assert_eq!(file_category("deck.pptx"), FileCategory::Presentation);
        assert_eq!(file_category("main.py"), FileCategory::Other);
    }

    #[test]
    fn preview_subset() {
        assert!(can_preview("resume.pdf"));
        assert!(can_preview("PHOTO.WEBP"));
        assert!(can_preview("notes.txt"));
        assert!(!can_preview("archive.zip"));
        assert!(!can_preview("diagram.svg"));
        assert!(!can_preview(""));
    }
}
