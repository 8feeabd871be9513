/// File intake for contact pictures
///
/// Create and edit requests carry at most one file, under the multipart
/// field named `picture`. Intake accepts only `image/*` MIME types, caps the
/// file at 5 MiB, and writes it under the configured upload directory
/// (created on demand) with a collision-resistant generated name:
/// `{unix_millis}-{random}{.ext}`.
///
/// The file is written while the multipart stream is being parsed. If the
/// request later fails validation or the insert, the stored file is not
/// removed; that leak is a documented property of this service, not an
/// accident of this module.

use axum::extract::multipart::{Field, MultipartError};
use chrono::Utc;
use rand::Rng;
use std::path::Path;

/// Multipart field name carrying the picture
pub const UPLOAD_FIELD: &str = "picture";

/// Maximum accepted picture size (5 MiB)
pub const MAX_PICTURE_BYTES: usize = 5 * 1024 * 1024;

/// Error type for file intake
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The uploaded file is not an image
    #[error("Only image files are allowed")]
    NotAnImage {
        /// MIME type the client declared
        mime: String,
    },

    /// The uploaded file exceeds the size cap
    #[error("File too large")]
    TooLarge,

    /// The multipart stream failed mid-read
    #[error("Invalid upload stream: {0}")]
    Stream(#[from] MultipartError),

    /// Writing the file to disk failed
    #[error("Failed to store upload: {0}")]
    Io(#[from] std::io::Error),
}

/// Reads a `picture` multipart field and stores it in `dir`
///
/// Returns the generated filename, which is what gets persisted on the
/// contact row and later served under `/uploads/`.
///
/// # Errors
///
/// - [`UploadError::NotAnImage`] when the declared MIME type is not
///   `image/*`
/// - [`UploadError::TooLarge`] when the file exceeds 5 MiB (checked
///   incrementally, before the whole file is buffered)
/// - [`UploadError::Stream`] / [`UploadError::Io`] on read/write failures
pub async fn store_picture(dir: &Path, mut field: Field<'_>) -> Result<String, UploadError> {
    let mime = field.content_type().unwrap_or_default().to_string();
    if !is_image(&mime) {
        return Err(UploadError::NotAnImage { mime });
    }

    let filename = generate_filename(field.file_name());

    let mut data: Vec<u8> = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if data.len() + chunk.len() > MAX_PICTURE_BYTES {
            return Err(UploadError::TooLarge);
        }
        data.extend_from_slice(&chunk);
    }

    tokio::fs::create_dir_all(dir).await?;
    tokio::fs::write(dir.join(&filename), &data).await?;

    tracing::debug!(filename = %filename, bytes = data.len(), "Stored uploaded picture");

    Ok(filename)
}

/// Whether a declared MIME type is acceptable for intake
fn is_image(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Generates a collision-resistant filename, preserving the original
/// extension when there is one
fn generate_filename(original: Option<&str>) -> String {
    let extension = original
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();

    let suffix: u32 = rand::thread_rng().gen_range(0..1_000_000_000);

    format!("{}-{}{}", Utc::now().timestamp_millis(), suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image() {
        assert!(is_image("image/jpeg"));
        assert!(is_image("image/png"));
        assert!(is_image("image/svg+xml"));
        assert!(!is_image("application/pdf"));
        assert!(!is_image("text/html"));
        assert!(!is_image(""));
    }

    #[test]
    fn test_generate_filename_preserves_extension() {
        let name = generate_filename(Some("avatar.jpg"));
        assert!(name.ends_with(".jpg"), "got {}", name);

        let name = generate_filename(Some("photo.tar.gz"));
        assert!(name.ends_with(".gz"), "got {}", name);
    }

    #[test]
    fn test_generate_filename_without_extension() {
        let name = generate_filename(Some("avatar"));
        assert!(!name.contains('.'), "got {}", name);

        let name = generate_filename(None);
        assert!(!name.contains('.'), "got {}", name);
    }

    #[test]
    fn test_generate_filename_is_unique() {
        let a = generate_filename(Some("a.png"));
        let b = generate_filename(Some("a.png"));
        // Same millisecond is likely; the random suffix still separates them
        assert_ne!(a, b);
    }

    #[test]
    fn test_generate_filename_shape() {
        let name = generate_filename(Some("pic.jpeg"));
        let stem = name.strip_suffix(".jpeg").expect("extension kept");
        let (millis, suffix) = stem.split_once('-').expect("timestamp-suffix shape");
        assert!(millis.parse::<i64>().is_ok());
        assert!(suffix.parse::<u32>().is_ok());
    }
}
