//! Mission directory layout management.
//!
//! Maps a mission name (and optionally a category) to its canonical
//! directory and keeps the on-disk tree in step with the mission records:
//! `<upload_root>/<mission_name>/<category>/<filename>`.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use dronehub_core::config::StorageConfig;
use dronehub_core::error::{AppError, ErrorKind};
use dronehub_core::result::AppResult;
use dronehub_entity::file::FileCategory;

/// Resolves and maintains the per-mission directory trees.
#[derive(Debug, Clone)]
pub struct MissionLayout {
    /// Root directory for all mission trees.
    root: PathBuf,
}

impl MissionLayout {
    /// Create a layout manager rooted at the configured upload directory.
    /// The root itself is created if absent.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.upload_root);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create upload root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// The upload root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Base directory of a mission.
    pub fn mission_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Category subdirectory of a mission.
    pub fn category_dir(&self, name: &str, category: FileCategory) -> PathBuf {
        self.mission_dir(name).join(category.as_str())
    }

    /// Create a mission's base directory and one subdirectory per known
    /// category. Idempotent — already-present directories are not an error.
    pub async fn ensure_mission_tree(&self, name: &str) -> AppResult<()> {
        let base = self.mission_dir(name);
        for category in FileCategory::KNOWN {
            let dir = base.join(category.as_str());
            fs::create_dir_all(&dir).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create mission directory: {}", dir.display()),
                    e,
                )
            })?;
        }
        debug!(mission = name, "Mission directory tree ready");
        Ok(())
    }

    /// Create a single category directory (used for the lazily created
    /// fallback category). Idempotent.
    pub async fn ensure_category_dir(&self, name: &str, category: FileCategory) -> AppResult<()> {
        let dir = self.category_dir(name, category);
        fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create category directory: {}", dir.display()),
                e,
            )
        })
    }

    /// Rename a mission's base directory.
    ///
    /// The caller must only commit the new name to the mission record after
    /// this succeeds; on failure the record keeps the old name.
    pub async fn rename_mission_tree(&self, old_name: &str, new_name: &str) -> AppResult<()> {
        let from = self.mission_dir(old_name);
        let to = self.mission_dir(new_name);

        fs::rename(&from, &to).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!(
                    "Failed to rename mission directory {} -> {}",
                    from.display(),
                    to.display()
                ),
                e,
            )
        })?;

        debug!(from = old_name, to = new_name, "Mission directory renamed");
        Ok(())
    }

    /// Recursively remove a mission's directory tree. No-op when the
    /// directory is already absent.
    pub async fn delete_mission_tree(&self, name: &str) -> AppResult<()> {
        let base = self.mission_dir(name);
        if base.exists() {
            fs::remove_dir_all(&base).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete mission directory: {}", base.display()),
                    e,
                )
            })?;
            debug!(mission = name, "Mission directory tree deleted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn layout_in(dir: &tempfile::TempDir) -> MissionLayout {
        let config = StorageConfig {
            upload_root: dir.path().to_str().unwrap().to_string(),
            ..StorageConfig::default()
        };
        MissionLayout::new(&config).await.unwrap()
    }

    #[tokio::test]
    async fn test_ensure_tree_creates_category_subdirs() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout_in(&dir).await;

        layout.ensure_mission_tree("Alpha").await.unwrap();

        for category in FileCategory::KNOWN {
            assert!(layout.category_dir("Alpha", category).is_dir());
        }
        // Fallback directory is only created lazily.
        assert!(!layout.category_dir("Alpha", FileCategory::Autres).exists());

        // Idempotent.
        layout.ensure_mission_tree("Alpha").await.unwrap();
    }

    #[tokio::test]
    async fn test_rename_tree() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout_in(&dir).await;

        layout.ensure_mission_tree("Alpha").await.unwrap();
        layout.rename_mission_tree("Alpha", "Beta").await.unwrap();

        assert!(!layout.mission_dir("Alpha").exists());
        assert!(layout.category_dir("Beta", FileCategory::Images).is_dir());
    }

    #[tokio::test]
    async fn test_rename_missing_tree_fails() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout_in(&dir).await;

        let err = layout
            .rename_mission_tree("Nowhere", "Somewhere")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Storage);
    }

    #[tokio::test]
    async fn test_delete_tree_is_noop_when_absent() {
        let dir = tempfile::tempdir().unwrap();
        let layout = layout_in(&dir).await;

        layout.delete_mission_tree("Ghost").await.unwrap();

        layout.ensure_mission_tree("Alpha").await.unwrap();
        layout.delete_mission_tree("Alpha").await.unwrap();
        assert!(!layout.mission_dir("Alpha").exists());
    }
}
