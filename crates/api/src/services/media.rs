//! Storage for uploaded images.
//!
//! Files land under the configured media root, in a subdirectory per kind
//! (`products/`, `payments/`), renamed to a UUID so client-supplied
//! filenames never touch the filesystem. The whole tree is served
//! read-only under `/media`.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while storing an uploaded file.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Filesystem error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// What an uploaded image documents; decides the storage subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// Catalog product image.
    Product,
    /// Customer payment-evidence screenshot.
    Payment,
}

impl MediaKind {
    const fn subdir(self) -> &'static str {
        match self {
            Self::Product => "products",
            Self::Payment => "payments",
        }
    }
}

/// Media storage rooted at a directory on local disk.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Create a store rooted at `root`. The directory is created lazily on
    /// first write.
    #[must_use]
    pub const fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Directory the store writes into.
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Persist uploaded bytes, returning the media-relative path
    /// (e.g. `products/<uuid>.jpg`) to store in the database.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Io` if the directory or file cannot be written.
    pub async fn store(
        &self,
        kind: MediaKind,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, MediaError> {
        let filename = extension_of(original_name).map_or_else(
            || Uuid::new_v4().to_string(),
            |ext| format!("{}.{ext}", Uuid::new_v4()),
        );

        let dir = self.root.join(kind.subdir());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&filename), bytes).await?;

        Ok(format!("{}/{filename}", kind.subdir()))
    }
}

/// Public URL for a media-relative path.
#[must_use]
pub fn public_url(path: &str) -> String {
    format!("/media/{path}")
}

/// Sanitized lowercase extension of a client-supplied filename.
///
/// Only short alphanumeric extensions pass; anything else is dropped and
/// the file is stored without an extension.
fn extension_of(name: Option<&str>) -> Option<String> {
    let ext = std::path::Path::new(name?).extension()?.to_str()?;
    if ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(ext.to_ascii_lowercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_sanitized() {
        assert_eq!(extension_of(Some("photo.JPG")), Some("jpg".to_owned()));
        assert_eq!(extension_of(Some("archive.tar.gz")), Some("gz".to_owned()));
        assert_eq!(extension_of(Some("no-extension")), None);
        assert_eq!(extension_of(Some("weird.j/pg")), None);
        assert_eq!(extension_of(None), None);
    }

    #[test]
    fn public_urls_are_media_relative() {
        assert_eq!(public_url("products/a.jpg"), "/media/products/a.jpg");
    }

    #[tokio::test]
    async fn stores_bytes_under_the_kind_subdir() {
        let root = std::env::temp_dir().join(format!("driftwood-media-test-{}", Uuid::new_v4()));
        let store = MediaStore::new(root.clone());

        let path = store
            .store(MediaKind::Payment, Some("proof.png"), b"not-really-a-png")
            .await
            .unwrap();

        assert!(path.starts_with("payments/"));
        assert!(path.ends_with(".png"));
        let on_disk = tokio::fs::read(root.join(&path)).await.unwrap();
        assert_eq!(on_disk, b"not-really-a-png");

        tokio::fs::remove_dir_all(root).await.unwrap();
    }
}
