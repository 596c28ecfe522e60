//! Archive orchestration — packages a mission's files for bulk retrieval.

use std::path::PathBuf;
use std::sync::Arc;

use dronehub_core::error::AppError;
use dronehub_core::result::AppResult;
use dronehub_database::repositories::file::FileRepository;
use dronehub_database::repositories::mission::MissionRepository;
use dronehub_entity::file::FileCategory;
use dronehub_storage::archive::{ArchiveBuilder, ArchiveEntry};

/// Builds downloadable archives of a mission's files.
#[derive(Debug, Clone)]
pub struct ArchiveService {
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Mission repository.
    mission_repo: Arc<MissionRepository>,
    /// Zip builder.
    builder: Arc<ArchiveBuilder>,
}

impl ArchiveService {
    /// Creates a new archive service.
    pub fn new(
        file_repo: Arc<FileRepository>,
        mission_repo: Arc<MissionRepository>,
        builder: Arc<ArchiveBuilder>,
    ) -> Self {
        Self {
            file_repo,
            mission_repo,
            builder,
        }
    }

    /// Build an archive of a mission's files, optionally filtered to one
    /// category (given as the caller-supplied category name).
    ///
    /// Returns the path of the freshly built archive; the caller owns
    /// cleanup after sending it.
    pub async fn build_archive(
        &self,
        mission_id: i64,
        category: Option<&str>,
    ) -> AppResult<PathBuf> {
        let mission = self
            .mission_repo
            .find_by_id(mission_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Mission {mission_id} not found")))?;

        let category = category
            .map(|raw| {
                raw.parse::<FileCategory>()
                    .map_err(|_| AppError::validation(format!("Unknown file category '{raw}'")))
            })
            .transpose()?;

        let files = self.file_repo.find_by_mission(mission_id, category).await?;

        let entries = files
            .into_iter()
            .map(|f| ArchiveEntry {
                category: f.file_type,
                filename: f.filename,
                source: PathBuf::from(f.file_path),
            })
            .collect();

        self.builder.build(&mission.name, category, entries).await
    }
}
