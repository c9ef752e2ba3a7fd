//! On-disk media store: naming, durable writes, best-effort cleanup

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use crate::transform::{self, AssetClass, MediaError};

/// Public URL prefix under which the media root is served
pub const URL_PREFIX: &str = "/media/";

/// Media root handle
///
/// Files live at `<root>/<class-dir>/<32-hex-uuid>.jpg` and are referenced
/// as `/media/<class-dir>/<name>` in the database. Names are generated,
/// never derived from user input.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    /// Open the store, creating the root and per-class directories
    pub async fn init(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        for class in [AssetClass::Avatar, AssetClass::Vehicle, AssetClass::Background] {
            fs::create_dir_all(root.join(class.dir())).await?;
        }
        Ok(Self { root })
    }

    /// Filesystem root, for mounting a static file service
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run the transform pipeline and durably write the result
    ///
    /// Returns the logical URL to commit into the owner's database row.
    /// The caller updates the row first and only then calls [`remove`] on
    /// the previous URL, so a crash between the two steps leaves at worst
    /// an orphaned file, never a row pointing at nothing.
    ///
    /// [`remove`]: MediaStore::remove
    pub async fn save(
        &self,
        class: AssetClass,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<String, MediaError> {
        let declared = content_type.to_string();
        let processed =
            tokio::task::spawn_blocking(move || transform::process(&data, &declared, class))
                .await
                .map_err(|e| MediaError::Processing(format!("transform task failed: {}", e)))??;

        let name = format!("{}.jpg", Uuid::new_v4().simple());
        let dir = self.root.join(class.dir());
        let tmp_path = dir.join(format!(".{}.tmp", name));
        let final_path = dir.join(&name);

        fs::write(&tmp_path, &processed).await?;
        fs::rename(&tmp_path, &final_path).await?;

        Ok(format!("{}{}/{}", URL_PREFIX, class.dir(), name))
    }

    /// Best-effort deletion of a stored asset by its logical URL
    ///
    /// The database reference is authoritative; file cleanup is advisory.
    /// Every failure (unknown url shape, already missing, permissions) is
    /// swallowed, so calling this twice is harmless.
    pub async fn remove(&self, url: &str) {
        let Some(path) = self.path_for(url) else {
            debug!("Ignoring cleanup for unrecognized asset url: {}", url);
            return;
        };
        if let Err(e) = fs::remove_file(&path).await {
            debug!("Asset cleanup skipped for {}: {}", path.display(), e);
        }
    }

    /// Map a logical URL back to its disk path
    ///
    /// Only URLs of the exact shape this store generates are accepted;
    /// anything else (foreign prefixes, traversal attempts) maps to `None`.
    fn path_for(&self, url: &str) -> Option<PathBuf> {
        let rest = url.strip_prefix(URL_PREFIX)?;
        let (dir, file) = rest.split_once('/')?;

        let known = [
            AssetClass::Avatar.dir(),
            AssetClass::Vehicle.dir(),
            AssetClass::Background.dir(),
        ];
        if !known.contains(&dir) || file.is_empty() || file.contains('/') || file.contains("..") {
            return None;
        }

        Some(self.root.join(dir).join(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    fn sample_png() -> Vec<u8> {
        let img = RgbImage::from_pixel(64, 64, image::Rgb([200, 40, 40]));
        let mut out = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .expect("Failed to encode test image");
        out
    }

    async fn store() -> (tempfile::TempDir, MediaStore) {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = MediaStore::init(dir.path()).await.expect("init failed");
        (dir, store)
    }

    fn on_disk(store: &MediaStore, url: &str) -> PathBuf {
        store.path_for(url).expect("url should map to a path")
    }

    #[tokio::test]
    async fn test_init_creates_class_directories() {
        let (_guard, store) = store().await;
        for class in [AssetClass::Avatar, AssetClass::Vehicle, AssetClass::Background] {
            assert!(store.root().join(class.dir()).is_dir());
        }
    }

    #[tokio::test]
    async fn test_save_writes_jpg_under_class_directory() {
        let (_guard, store) = store().await;

        let url = store
            .save(AssetClass::Avatar, sample_png(), "image/png")
            .await
            .expect("save failed");

        assert!(url.starts_with("/media/avatars/"));
        assert!(url.ends_with(".jpg"));

        let path = on_disk(&store, &url);
        assert!(path.exists());

        // No temp files left behind
        let mut entries = fs::read_dir(store.root().join("avatars")).await.unwrap();
        let mut count = 0;
        while let Some(entry) = entries.next_entry().await.unwrap() {
            assert!(!entry.file_name().to_string_lossy().ends_with(".tmp"));
            count += 1;
        }
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_save_generates_distinct_names() {
        let (_guard, store) = store().await;

        let a = store
            .save(AssetClass::Vehicle, sample_png(), "image/png")
            .await
            .unwrap();
        let b = store
            .save(AssetClass::Vehicle, sample_png(), "image/png")
            .await
            .unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_save_rejects_disallowed_type() {
        let (_guard, store) = store().await;

        let result = store
            .save(AssetClass::Avatar, b"plain text".to_vec(), "text/plain")
            .await;
        assert!(matches!(result, Err(MediaError::UnsupportedType(_))));

        // Nothing written
        let mut entries = fs::read_dir(store.root().join("avatars")).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remove_is_best_effort_and_idempotent() {
        let (_guard, store) = store().await;

        let url = store
            .save(AssetClass::Avatar, sample_png(), "image/png")
            .await
            .unwrap();
        let path = on_disk(&store, &url);
        assert!(path.exists());

        store.remove(&url).await;
        assert!(!path.exists());

        // Second delete of the same url is a no-op
        store.remove(&url).await;

        // So is cleanup of urls the store never issued
        store.remove("/media/avatars/../../etc/passwd").await;
        store.remove("/elsewhere/file.jpg").await;
        store.remove("").await;
    }

    #[tokio::test]
    async fn test_replace_sequence_leaves_single_live_file() {
        let (_guard, store) = store().await;

        let old_url = store
            .save(AssetClass::Avatar, sample_png(), "image/png")
            .await
            .unwrap();

        // Replacement ordering: write new, commit reference (caller), delete old
        let new_url = store
            .save(AssetClass::Avatar, sample_png(), "image/png")
            .await
            .unwrap();
        store.remove(&old_url).await;

        assert!(!on_disk(&store, &old_url).exists());
        assert!(on_disk(&store, &new_url).exists());

        let mut entries = fs::read_dir(store.root().join("avatars")).await.unwrap();
        let mut count = 0;
        while (entries.next_entry().await.unwrap()).is_some() {
            count += 1;
        }
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_path_for_rejects_traversal() {
        let (_guard, store) = store().await;
        assert!(store.path_for("/media/avatars/../secret.jpg").is_none());
        assert!(store.path_for("/media/unknown/x.jpg").is_none());
        assert!(store.path_for("/media/avatars/").is_none());
        assert!(store.path_for("avatars/x.jpg").is_none());
    }
}
