//! Media storage for uploaded product images.
//!
//! Files live under `<media_root>/photos/products`. The database only records the
//! path relative to the media root, so the root can move without a migration.

use crate::{config::catalog::MediaConfig, errors::Result, validation::ImageUpload};
use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};
use tracing::{debug, info, instrument};

/// Upload directory for product photos, relative to the media root.
pub const PRODUCT_UPLOAD_DIR: &str = "photos/products";

/// Filesystem-backed media store
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    url: String,
}

impl MediaStorage {
    /// Creates a store rooted at `root`, served under the `url` prefix.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            url: url.into(),
        }
    }

    /// Creates a store from the `[media]` section of `config.toml`.
    #[must_use]
    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(&config.root, &config.url)
    }

    /// Media root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute location of a stored relative path.
    #[must_use]
    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Public URL of a stored relative path, e.g. `/media/photos/products/cola.png`.
    #[must_use]
    pub fn url_for(&self, relative: &str) -> String {
        format!(
            "{}/{}",
            self.url.trim_end_matches('/'),
            relative.trim_start_matches('/')
        )
    }

    /// Size in bytes of a file already stored under the media root.
    ///
    /// # Errors
    /// Returns [`crate::errors::Error::Io`] if the file is missing or unreadable.
    pub async fn stored_size(&self, relative: &str) -> Result<u64> {
        Ok(tokio::fs::metadata(self.path(relative)).await?.len())
    }

    /// Writes an already validated upload under [`PRODUCT_UPLOAD_DIR`] and returns its
    /// relative path. A clashing file name gets a numeric suffix (`cola_1.png`); names
    /// are claimed with `create_new`, so concurrent uploads never share a file.
    ///
    /// # Errors
    /// Returns [`crate::errors::Error::Io`] if the directory or file cannot be written.
    #[instrument(skip(self, upload), fields(name = %upload.name, size = upload.size()))]
    pub async fn store_product_image(&self, upload: &ImageUpload) -> Result<String> {
        let dir = self.root.join(PRODUCT_UPLOAD_DIR);
        tokio::fs::create_dir_all(&dir).await?;

        let (file_name, mut file) = create_unique(&dir, &sanitize_file_name(&upload.name)).await?;
        file.write_all(&upload.content).await?;
        file.flush().await?;

        let relative = format!("{PRODUCT_UPLOAD_DIR}/{file_name}");
        info!(path = %relative, "Stored product image");
        Ok(relative)
    }
}

/// Reduces a client-supplied name to a safe base name.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            _ => None,
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Creates a new file in `dir` named after `file_name`, adding `_1`, `_2`, ... to the
/// stem until a name is free.
async fn create_unique(dir: &Path, file_name: &str) -> Result<(String, tokio::fs::File)> {
    let (stem, extension) = match file_name.rsplit_once('.') {
        Some((stem, extension)) => (stem, format!(".{extension}")),
        None => (file_name, String::new()),
    };

    let mut candidate = file_name.to_string();
    let mut counter = 0_u32;
    loop {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(dir.join(&candidate))
            .await
        {
            Ok(file) => {
                if counter > 0 {
                    debug!(original = file_name, renamed = %candidate, "File name taken, using suffix");
                }
                return Ok((candidate, file));
            }
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                counter += 1;
                candidate = format!("{stem}_{counter}{extension}");
            }
            Err(err) => return Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("cola.png"), "cola.png");
        assert_eq!(sanitize_file_name("../../etc/passwd.png"), "passwd.png");
        assert_eq!(sanitize_file_name("C:\\photos\\my cola.JPG"), "my_cola.JPG");
        assert_eq!(sanitize_file_name("..."), "upload");
    }

    #[test]
    fn test_url_for() {
        let storage = MediaStorage::new("media", "/media/");
        assert_eq!(
            storage.url_for("photos/products/cola.png"),
            "/media/photos/products/cola.png"
        );
    }

    #[tokio::test]
    async fn test_store_product_image() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = MediaStorage::new(dir.path(), "/media/");
        let upload = ImageUpload::new("cola.png", vec![1, 2, 3]);

        let first = storage.store_product_image(&upload).await?;
        assert_eq!(first, "photos/products/cola.png");
        assert_eq!(std::fs::read(storage.path(&first))?, vec![1, 2, 3]);

        let second = storage.store_product_image(&upload).await?;
        assert_eq!(second, "photos/products/cola_1.png");
        assert!(storage.path(&second).exists());
        assert_eq!(storage.stored_size(&second).await?, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_uploads_get_distinct_files() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let storage = MediaStorage::new(dir.path(), "/media/");
        let first = ImageUpload::new("cola.png", vec![1; 64]);
        let second = ImageUpload::new("cola.png", vec![2; 64]);

        let (a, b) = tokio::join!(
            storage.store_product_image(&first),
            storage.store_product_image(&second)
        );
        let (a, b) = (a?, b?);
        assert_ne!(a, b);

        let mut contents = [std::fs::read(storage.path(&a))?, std::fs::read(storage.path(&b))?];
        contents.sort();
        assert_eq!(contents, [vec![1; 64], vec![2; 64]]);

        Ok(())
    }

    #[tokio::test]
    async fn test_stored_size_of_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = MediaStorage::new(dir.path(), "/media/");
        assert!(matches!(
            storage.stored_size("photos/products/gone.png").await,
            Err(crate::errors::Error::Io(_))
        ));
    }
}
