use std::path::Path;

use thiserror::Error;

/// Upload size cap enforced before submission.
pub const MAX_UPLOAD_BYTES: u64 = 50 * 1024 * 1024;

const ALLOWED_EXTENSIONS: [&str; 2] = ["docx", "pptx"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("unsupported file format, expected .docx or .pptx")]
    UnsupportedExtension,
    #[error("file exceeds the 50 MiB upload limit")]
    TooLarge,
}

/// Preflight check applied before a file is offered for submission.
pub fn check_upload(path: &Path, size: u64) -> Result<(), UploadRejection> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext) => {}
        _ => return Err(UploadRejection::UnsupportedExtension),
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(UploadRejection::TooLarge);
    }
    Ok(())
}
