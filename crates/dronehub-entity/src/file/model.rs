//! File entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::category::FileCategory;

/// A file registered to a mission.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MissionFile {
    /// Unique file identifier.
    pub id: i64,
    /// The owning mission.
    pub mission_id: i64,
    /// Original (sanitized) filename.
    pub filename: String,
    /// Absolute storage path, always under the owning mission's directory
    /// in the subdirectory named for the category.
    pub file_path: String,
    /// File category.
    pub file_type: FileCategory,
    /// Size in bytes, measured on disk at registration time.
    pub file_size: i64,
    /// When the file was registered.
    pub uploaded_at: DateTime<Utc>,
}

impl MissionFile {
    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.filename)
            .map(|ext| ext.to_lowercase())
    }
}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMissionFile {
    /// The owning mission.
    pub mission_id: i64,
    /// Original (sanitized) filename.
    pub filename: String,
    /// Absolute storage path.
    pub file_path: String,
    /// File category.
    pub file_type: FileCategory,
    /// Size in bytes on disk.
    pub file_size: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_named(name: &str) -> MissionFile {
        MissionFile {
            id: 1,
            mission_id: 1,
            filename: name.to_string(),
            file_path: format!("/missions/Alpha/images/{name}"),
            file_type: FileCategory::Images,
            file_size: 0,
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_extension() {
        assert_eq!(file_named("IMG_0001.JPG").extension().as_deref(), Some("jpg"));
        assert_eq!(file_named("archive.tar.gz").extension().as_deref(), Some("gz"));
        assert_eq!(file_named("README").extension(), None);
    }
}
