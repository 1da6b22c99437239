//! File-backed catalog and image storage.
//!
//! The catalog is one JSON document. Every mutation is a full
//! read-modify-write of that document with no locking, so concurrent admin
//! writes can lose updates.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::STANDARD, Engine};
use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::{CatalogDocument, Result, StoreError};

const DEFAULT_IMAGE_EXT: &str = ".jpg";

#[derive(Clone, Debug)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Read the document. A missing or unparsable file yields an empty catalog.
    pub async fn load(&self) -> CatalogDocument {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "catalog unreadable, using empty catalog");
                return CatalogDocument::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "catalog unparsable, using empty catalog");
            CatalogDocument::default()
        })
    }

    /// Replace the whole document. Writes a sibling temp file and renames it
    /// over the target, so readers see either the old or the new document.
    pub async fn save(&self, doc: &CatalogDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(doc)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await.inspect_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "catalog rename failed");
        })?;
        tracing::debug!(products = doc.products.len(), blogs = doc.blogs.len(), "catalog saved");
        Ok(())
    }
}

/// Directory of uploaded images, served publicly under `/uploads`.
#[derive(Clone, Debug)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path { &self.dir }

    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Decode a data URI (or bare base64) and write it under a
    /// timestamp-based name that keeps the original extension.
    ///
    /// Names are claimed with `create_new`; a clash within the same
    /// millisecond gets a numeric suffix (`img_<millis>_1.png`).
    pub async fn save_encoded(&self, data: &str, file_name: &str) -> Result<String> {
        let bytes = decode_image(data)?;
        self.ensure_dir().await?;
        let millis = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or_default();
        let ext = image_extension(file_name);

        let mut attempt = 0u32;
        loop {
            let name = match attempt {
                0 => format!("img_{millis}{ext}"),
                n => format!("img_{millis}_{n}{ext}"),
            };
            match OpenOptions::new().write(true).create_new(true).open(self.dir.join(&name)).await {
                Ok(mut file) => {
                    file.write_all(&bytes).await?;
                    file.flush().await?;
                    tracing::info!(file = %name, "image stored");
                    return Ok(name);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

fn decode_image(data: &str) -> Result<Vec<u8>> {
    let payload = data.split_once(',').map_or(data, |(_, b64)| b64).trim();
    if payload.is_empty() {
        return Err(StoreError::InvalidImage("empty payload".into()));
    }
    STANDARD.decode(payload).map_err(|e| StoreError::InvalidImage(e.to_string()))
}

fn image_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map_or_else(|| DEFAULT_IMAGE_EXT.to_string(), |e| format!(".{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlogLink, BlogPost, Product};

    fn sample() -> CatalogDocument {
        CatalogDocument {
            products: vec![Product { id: 4, name: "Vase".into(), description: "Glazed".into(), price: 15000, image: "img_1.png".into() }],
            blogs: vec![BlogPost {
                id: 1,
                title: "Styling shelves".into(),
                excerpt: "Odd numbers".into(),
                date: "Feb 2, 2025".into(),
                image: "img_2.jpg".into(),
                content: Some("Group in threes.".into()),
                links: Some(vec![BlogLink { title: "Guide".into(), url: "https://example.com/guide".into() }]),
            }],
        }
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("data.json"));
        store.save(&sample()).await.unwrap();
        assert_eq!(store.load().await, sample());
        assert!(!dir.path().join("data.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_load_missing_or_corrupt_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("data.json"));
        assert_eq!(store.load().await, CatalogDocument::default());
        tokio::fs::write(store.path(), "{not json").await.unwrap();
        assert_eq!(store.load().await, CatalogDocument::default());
    }

    #[tokio::test]
    async fn test_save_fails_in_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = CatalogStore::new(dir.path().join("nope").join("data.json"));
        assert!(store.save(&sample()).await.is_err());
    }

    #[tokio::test]
    async fn test_save_encoded_image() {
        let dir = tempfile::tempdir().unwrap();
        let images = ImageStore::new(dir.path().join("uploads"));
        let name = images.save_encoded("data:image/png;base64,aGVsbG8=", "photo.png").await.unwrap();
        assert!(name.starts_with("img_") && name.ends_with(".png"));
        let bytes = tokio::fs::read(images.dir().join(&name)).await.unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[tokio::test]
    async fn test_back_to_back_images_get_distinct_names() {
        let dir = tempfile::tempdir().unwrap();
        let images = ImageStore::new(dir.path().join("uploads"));

        let mut names = std::collections::HashSet::new();
        for i in 0..20u8 {
            let payload = STANDARD.encode([i]);
            let (a, b) = tokio::join!(images.save_encoded(&payload, "a.png"), images.save_encoded(&payload, "b.png"));
            assert!(names.insert(a.unwrap()));
            assert!(names.insert(b.unwrap()));
        }
        assert_eq!(names.len(), 40);
        for name in &names {
            assert_eq!(tokio::fs::read(images.dir().join(name)).await.unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn test_existing_file_is_never_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let images = ImageStore::new(dir.path());
        let first = images.save_encoded("aGVsbG8=", "x.png").await.unwrap();
        let second = images.save_encoded("aGk=", "x.png").await.unwrap();
        assert_ne!(first, second);
        assert_eq!(tokio::fs::read(dir.path().join(&first)).await.unwrap(), b"hello");
        assert_eq!(tokio::fs::read(dir.path().join(&second)).await.unwrap(), b"hi");
    }

    #[test]
    fn test_image_extension_default() {
        assert_eq!(image_extension("photo"), ".jpg");
        assert_eq!(image_extension("a.webp"), ".webp");
    }

    #[test]
    fn test_decode_rejects_empty_and_garbage() {
        assert!(matches!(decode_image("data:image/png;base64,"), Err(StoreError::InvalidImage(_))));
        assert!(matches!(decode_image("!!!"), Err(StoreError::InvalidImage(_))));
        assert_eq!(decode_image("aGk=").unwrap(), b"hi");
    }
}
