//! Shared list of uploaded image files
//!
//! A set-like sequence guarded by one read/write lock: listing takes the read
//! lock, upload-append and delete-remove take the write lock. The lock is not
//! held across filesystem operations, so a crash between deleting the file
//! and removing the list entry can leave the two inconsistent; the list is
//! rebuilt from the image directory on the next startup.

use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// File extensions accepted as images
const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Returns true if `filename` carries an accepted image extension
pub fn is_image_filename(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// In-memory registry of available image files
pub struct ImageStore {
    dir: PathBuf,
    list: RwLock<Vec<String>>,
}

impl ImageStore {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            list: RwLock::new(Vec::new()),
        }
    }

    /// Directory the image files live in
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Absolute path of a stored image file
    pub fn path_of(&self, filename: &str) -> PathBuf {
        self.dir.join(filename)
    }

    /// Populate the list from the image directory. Called once at startup;
    /// non-image files are skipped.
    pub async fn load_from_dir(&self) -> std::io::Result<usize> {
        let mut entries = tokio::fs::read_dir(&self.dir).await?;
        let mut list = self.list.write().await;
        list.clear();
        while let Some(entry) = entries.next_entry().await? {
            if let Some(name) = entry.file_name().to_str() {
                if is_image_filename(name) {
                    list.push(name.to_string());
                }
            }
        }
        Ok(list.len())
    }

    /// Snapshot of the current file list
    pub async fn list(&self) -> Vec<String> {
        self.list.read().await.clone()
    }

    pub async fn contains(&self, filename: &str) -> bool {
        self.list.read().await.iter().any(|f| f == filename)
    }

    /// Record an uploaded file
    pub async fn push(&self, filename: String) {
        self.list.write().await.push(filename);
    }

    /// Remove the first entry matching `filename`. Returns true if an entry
    /// was removed.
    pub async fn remove(&self, filename: &str) -> bool {
        let mut list = self.list.write().await;
        match list.iter().position(|f| f == filename) {
            Some(i) => {
                list.remove(i);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_filename() {
        assert!(is_image_filename("a.png"));
        assert!(is_image_filename("b.JPG"));
        assert!(is_image_filename("c.jpeg"));
        assert!(!is_image_filename("d.gif"));
        assert!(!is_image_filename("noext"));
    }

    #[tokio::test]
    async fn test_push_and_remove_single_entry() {
        let store = ImageStore::new(PathBuf::from("/tmp/img"));
        store.push("a.png".to_string()).await;
        store.push("b.png".to_string()).await;
        store.push("a.png".to_string()).await;

        assert!(store.contains("a.png").await);
        assert!(store.remove("a.png").await);
        // only the first matching entry is removed
        assert_eq!(store.list().await, vec!["b.png", "a.png"]);

        assert!(!store.remove("missing.png").await);
    }

    #[tokio::test]
    async fn test_load_from_dir_filters_non_images() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("a.png"), b"x").unwrap();
        std::fs::write(tmp.path().join("b.jpeg"), b"x").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"x").unwrap();

        let store = ImageStore::new(tmp.path().to_path_buf());
        let n = store.load_from_dir().await.unwrap();
        assert_eq!(n, 2);

        let mut list = store.list().await;
        list.sort();
        assert_eq!(list, vec!["a.png", "b.jpeg"]);
    }
}
