//! Object storage for villa photos, backed by a local upload directory that
//! is served statically under `/uploads`.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::villa::slugify;

/// Image types the villa form accepts.
const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// A stored photo: its file name on disk and the URL to hand to clients.
#[derive(Debug, Clone, serde::Serialize)]
pub struct StoredPhoto {
    pub file_name: String,
    pub url: String,
}

/// Persist one uploaded image, deriving a collision-free file name from the
/// original one. Rejects anything that is not a png/jpeg by extension.
pub async fn save_photo(
    upload_dir: &str,
    public_base_url: &str,
    original_name: &str,
    data: &[u8],
) -> Result<StoredPhoto, AppError> {
    if data.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".to_string()));
    }

    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| AppError::Validation("File has no extension".to_string()))?;
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::Validation(format!(
            "Unsupported image type '{extension}'. Allowed: png, jpg, jpeg"
        )));
    }

    let stem = Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("foto");
    let slug = slugify(stem);
    let stem = if slug.is_empty() { "foto" } else { slug.as_str() };
    let file_name = format!("{}-{stem}.{extension}", Uuid::new_v4());

    tokio::fs::create_dir_all(upload_dir).await?;
    let path: PathBuf = Path::new(upload_dir).join(&file_name);
    tokio::fs::write(&path, data).await?;

    let url = format!(
        "{}/uploads/{file_name}",
        public_base_url.trim_end_matches('/')
    );
    Ok(StoredPhoto { file_name, url })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn saves_photo_with_derived_name() {
        let dir = tempfile::tempdir().unwrap();
        let stored = save_photo(
            dir.path().to_str().unwrap(),
            "http://localhost:3000/",
            "Villa Sunrise 01.JPG",
            b"fake-image-bytes",
        )
        .await
        .unwrap();

        assert!(stored.file_name.ends_with("-villa-sunrise-01.jpg"));
        assert!(stored
            .url
            .starts_with("http://localhost:3000/uploads/"));
        let on_disk = dir.path().join(&stored.file_name);
        assert_eq!(std::fs::read(on_disk).unwrap(), b"fake-image-bytes");
    }

    #[tokio::test]
    async fn rejects_non_image_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let result = save_photo(
            dir.path().to_str().unwrap(),
            "http://localhost:3000",
            "notes.pdf",
            b"%PDF",
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = save_photo(
            dir.path().to_str().unwrap(),
            "http://localhost:3000",
            "noext",
            b"data",
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn rejects_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let result = save_photo(
            dir.path().to_str().unwrap(),
            "http://localhost:3000",
            "a.png",
            b"",
        )
        .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
