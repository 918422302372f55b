//! Upload validation for `/image` and `/file`.

use std::path::{Path, PathBuf};

use gptman_client::FilePurpose;

/// Extensions accepted by `/file`.
pub const SUPPORTED_FILES: &[&str] = &[
    ".c", ".cpp", ".cs", ".css", ".doc", ".docx", ".html", ".java", ".js", ".json", ".md", ".pdf",
    ".php", ".pptx", ".py", ".rb", ".sh", ".tex", ".ts", ".txt",
];

/// Extensions accepted by `/image`.
pub const SUPPORTED_IMAGES: &[&str] = &[".png"];

/// Kind of upload a command performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Image,
    Document,
}

impl UploadKind {
    pub fn purpose(&self) -> FilePurpose {
        match self {
            UploadKind::Image => FilePurpose::Vision,
            UploadKind::Document => FilePurpose::Assistants,
        }
    }

    fn allowed(&self) -> &'static [&'static str] {
        match self {
            UploadKind::Image => SUPPORTED_IMAGES,
            UploadKind::Document => SUPPORTED_FILES,
        }
    }
}

/// A recoverable problem with an upload argument.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("Filename should be provided")]
    MissingPath,

    #[error("File {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("{0} file is not supported")]
    Unsupported(String),
}

/// Check an upload argument and return the path to upload.
pub fn validate(argument: &str, kind: UploadKind) -> Result<PathBuf, AttachmentError> {
    let argument = argument.trim();
    if argument.is_empty() {
        return Err(AttachmentError::MissingPath);
    }

    let path = PathBuf::from(argument);
    if !path.exists() {
        return Err(AttachmentError::NotFound(path));
    }

    let suffix = suffix(&path);
    if !kind.allowed().contains(&suffix.as_str()) {
        return Err(AttachmentError::Unsupported(if suffix.is_empty() {
            "Extensionless".to_string()
        } else {
            suffix
        }));
    }

    Ok(path)
}

/// Extension with its leading dot, or an empty string.
fn suffix(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_argument() {
        assert_eq!(
            validate("  ", UploadKind::Document),
            Err(AttachmentError::MissingPath)
        );
    }

    #[test]
    fn test_missing_file() {
        let err = validate("/nonexistent/report.pdf", UploadKind::Document).unwrap_err();
        assert_eq!(
            err.to_string(),
            "File /nonexistent/report.pdf does not exist"
        );
    }

    #[test]
    fn test_document_extensions() {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("notes.txt");
        let binary = dir.path().join("tool.exe");
        let bare = dir.path().join("Makefile");
        for path in [&notes, &binary, &bare] {
            std::fs::write(path, "x").unwrap();
        }

        assert_eq!(
            validate(&notes.display().to_string(), UploadKind::Document),
            Ok(notes.clone())
        );
        assert_eq!(
            validate(&binary.display().to_string(), UploadKind::Document)
                .unwrap_err()
                .to_string(),
            ".exe file is not supported"
        );
        assert!(matches!(
            validate(&bare.display().to_string(), UploadKind::Document),
            Err(AttachmentError::Unsupported(_))
        ));
    }

    #[test]
    fn test_images_are_png_only() {
        let dir = TempDir::new().unwrap();
        let png = dir.path().join("chart.png");
        let jpg = dir.path().join("photo.jpg");
        std::fs::write(&png, "x").unwrap();
        std::fs::write(&jpg, "x").unwrap();

        assert!(validate(&png.display().to_string(), UploadKind::Image).is_ok());
        assert_eq!(
            validate(&jpg.display().to_string(), UploadKind::Image),
            Err(AttachmentError::Unsupported(".jpg".to_string()))
        );
        assert_eq!(UploadKind::Image.purpose(), FilePurpose::Vision);
        assert_eq!(UploadKind::Document.purpose(), FilePurpose::Assistants);
    }
}
