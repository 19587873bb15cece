use uuid::Uuid;

use crate::errors::AppError;

/// Accepted resume MIME types: PDF and MS Word.
pub const ALLOWED_CONTENT_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Upload body limit for the resume route.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// A resume file received from the multipart form.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: bytes::Bytes,
    pub name: Option<String>,
    pub is_default: bool,
}

impl ResumeUpload {
    pub fn validate(&self) -> Result<(), AppError> {
        if !ALLOWED_CONTENT_TYPES.contains(&self.content_type.as_str()) {
            return Err(AppError::Validation(
                "Only PDF and Word documents are allowed".to_string(),
            ));
        }
        Ok(())
    }

    /// Display name: the submitted name, else the original file name.
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.file_name)
            .to_string()
    }
}

/// `resumes/<uuid>.<ext>`; the extension is whatever follows the last dot.
pub fn object_key_for(file_name: &str) -> String {
    let extension = file_name.rsplit('.').next().unwrap_or(file_name);
    format!("resumes/{}.{}", Uuid::new_v4(), extension)
}

/// Size as megabytes with two decimals, e.g. `"1.50 MB"`.
pub fn format_file_size(bytes: usize) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Multipart checkbox values arrive as strings.
pub fn parse_flag(value: &str) -> bool {
    value.trim() == "true"
}

/// Quotes and control characters are dropped so the name fits a
/// `Content-Disposition` header.
pub fn sanitize_download_name(file_name: &str) -> String {
    let cleaned: String = file_name
        .chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect();
    if cleaned.trim().is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: &str) -> ResumeUpload {
        ResumeUpload {
            file_name: "jane-doe.pdf".to_string(),
            content_type: content_type.to_string(),
            bytes: bytes::Bytes::from_static(b"%PDF-1.7"),
            name: None,
            is_default: false,
        }
    }

    #[test]
    fn test_pdf_and_word_types_accepted() {
        for ct in ALLOWED_CONTENT_TYPES {
            assert!(upload(ct).validate().is_ok(), "{ct} should be accepted");
        }
    }

    #[test]
    fn test_other_types_rejected() {
        let err = upload("image/png").validate().unwrap_err();
        assert!(
            matches!(err, AppError::Validation(msg) if msg == "Only PDF and Word documents are allowed")
        );
    }

    #[test]
    fn test_display_name_falls_back_to_file_name() {
        let mut u = upload("application/pdf");
        assert_eq!(u.display_name(), "jane-doe.pdf");
        u.name = Some("  ".to_string());
        assert_eq!(u.display_name(), "jane-doe.pdf");
        u.name = Some("Backend resume".to_string());
        assert_eq!(u.display_name(), "Backend resume");
    }

    #[test]
    fn test_object_key_keeps_extension() {
        let key = object_key_for("Jane.Doe.Resume.docx");
        assert!(key.starts_with("resumes/"));
        assert!(key.ends_with(".docx"));
        let id = key
            .trim_start_matches("resumes/")
            .trim_end_matches(".docx");
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn test_object_key_without_dot_uses_whole_name() {
        let key = object_key_for("resume");
        assert!(key.ends_with(".resume"));
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0.00 MB");
        assert_eq!(format_file_size(1024 * 1024), "1.00 MB");
        assert_eq!(format_file_size(1536 * 1024), "1.50 MB");
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_sanitize_download_name() {
        assert_eq!(sanitize_download_name("cv \"final\".pdf"), "cv final.pdf");
        assert_eq!(sanitize_download_name("\"\""), "resume");
    }
}
