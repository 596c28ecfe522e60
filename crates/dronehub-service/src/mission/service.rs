//! Mission registry — CRUD and search over mission records, keeping the
//! on-disk directory tree in step with the relational state.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info, warn};

use dronehub_core::error::AppError;
use dronehub_core::result::AppResult;
use dronehub_database::repositories::file::FileRepository;
use dronehub_database::repositories::metadata::MetadataRepository;
use dronehub_database::repositories::mission::MissionRepository;
use dronehub_entity::file::FileCategory;
use dronehub_entity::metadata::MissionMetadata;
use dronehub_entity::mission::{CreateMission, Mission, MissionSummary, MissionUpdate};
use dronehub_storage::layout::MissionLayout;

use super::lock::MissionLockRegistry;

/// Search filters for [`MissionService::search`]. All filters combine
/// conjunctively; date strings that fail to parse are treated as absent.
#[derive(Debug, Clone, Default)]
pub struct MissionSearch {
    /// Case-insensitive substring matched against name and description.
    pub query: Option<String>,
    /// Inclusive lower bound on the flight date (`YYYY-MM-DD`).
    pub start_date: Option<String>,
    /// Inclusive upper bound on the flight date (`YYYY-MM-DD`).
    pub end_date: Option<String>,
    /// Only missions owning at least one file of this category.
    pub category: Option<FileCategory>,
}

/// Handles mission CRUD, search, and directory-tree coordination.
#[derive(Debug, Clone)]
pub struct MissionService {
    /// Mission repository.
    mission_repo: Arc<MissionRepository>,
    /// File repository (for summaries).
    file_repo: Arc<FileRepository>,
    /// Metadata repository.
    metadata_repo: Arc<MetadataRepository>,
    /// Directory layout manager.
    layout: Arc<MissionLayout>,
    /// Per-mission mutation locks.
    locks: Arc<MissionLockRegistry>,
}

impl MissionService {
    /// Creates a new mission service.
    pub fn new(
        mission_repo: Arc<MissionRepository>,
        file_repo: Arc<FileRepository>,
        metadata_repo: Arc<MetadataRepository>,
        layout: Arc<MissionLayout>,
        locks: Arc<MissionLockRegistry>,
    ) -> Self {
        Self {
            mission_repo,
            file_repo,
            metadata_repo,
            layout,
            locks,
        }
    }

    /// Create a new mission: record, empty metadata, and directory tree.
    ///
    /// The record only survives if the tree build succeeds, so the mission
    /// directory exists exactly when the mission record does.
    pub async fn create(&self, data: CreateMission) -> AppResult<Mission> {
        let name = data.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Mission name must not be empty"));
        }
        if self.mission_repo.find_by_name(name).await?.is_some() {
            return Err(AppError::validation(format!(
                "A mission named '{name}' already exists"
            )));
        }

        let flight_date = data
            .flight_date
            .as_deref()
            .and_then(|s| parse_flight_date(s));

        let mission = self
            .mission_repo
            .create(name, flight_date, data.description.as_deref())
            .await?;

        if let Err(e) = self.layout.ensure_mission_tree(&mission.name).await {
            // Undo the insert so record and directory do not diverge.
            if let Err(cleanup) = self.mission_repo.delete_cascade(mission.id).await {
                error!(
                    mission_id = mission.id,
                    error = %cleanup,
                    "Failed to remove mission record after tree build failure"
                );
            }
            return Err(e);
        }

        info!(mission_id = mission.id, name = %mission.name, "Mission created");
        Ok(mission)
    }

    /// Look up a mission by ID.
    pub async fn get(&self, id: i64) -> AppResult<Option<Mission>> {
        self.mission_repo.find_by_id(id).await
    }

    /// Look up a mission by its exact name.
    pub async fn get_by_name(&self, name: &str) -> AppResult<Option<Mission>> {
        self.mission_repo.find_by_name(name).await
    }

    /// List all missions, newest first.
    pub async fn list(&self) -> AppResult<Vec<Mission>> {
        self.mission_repo.list().await
    }

    /// The mission's metadata record, if any.
    pub async fn metadata(&self, mission_id: i64) -> AppResult<Option<MissionMetadata>> {
        self.metadata_repo.find_by_mission(mission_id).await
    }

    /// Update mission fields.
    ///
    /// A name change renames the directory tree first; only when the rename
    /// succeeds is the new name committed (together with a rebase of the
    /// stored file paths). When the rename is refused the name change is
    /// abandoned — logged, not failed — and the other fields still apply.
    pub async fn update(&self, id: i64, update: MissionUpdate) -> AppResult<Mission> {
        let lock = self.locks.lock_for(id);
        let _guard = lock.lock().await;

        let mut mission = self
            .mission_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Mission {id} not found")))?;

        let old_name = mission.name.clone();
        let mut rename: Option<(String, String)> = None;

        if let Some(new_name) = update.name {
            let new_name = new_name.trim().to_string();
            if new_name.is_empty() {
                return Err(AppError::validation("Mission name must not be empty"));
            }
            if new_name != mission.name {
                if self.mission_repo.find_by_name(&new_name).await?.is_some() {
                    return Err(AppError::validation(format!(
                        "A mission named '{new_name}' already exists"
                    )));
                }

                match self
                    .layout
                    .rename_mission_tree(&mission.name, &new_name)
                    .await
                {
                    Ok(()) => {
                        let old_prefix =
                            self.layout.mission_dir(&mission.name).display().to_string();
                        let new_prefix = self.layout.mission_dir(&new_name).display().to_string();
                        rename = Some((old_prefix, new_prefix));
                        mission.name = new_name;
                    }
                    Err(e) => {
                        error!(
                            mission_id = id,
                            from = %mission.name,
                            to = %new_name,
                            error = %e,
                            "Mission directory rename failed; keeping old name"
                        );
                    }
                }
            }
        }

        if let Some(raw_date) = update.flight_date.as_deref() {
            if let Some(date) = parse_flight_date(raw_date) {
                mission.flight_date = Some(date);
            }
        }

        if let Some(description) = update.description {
            mission.description = Some(description);
        }

        let rebase = rename
            .as_ref()
            .map(|(old, new)| (old.as_str(), new.as_str()));

        match self.mission_repo.update(&mission, rebase).await {
            Ok(updated) => {
                info!(mission_id = id, name = %updated.name, "Mission updated");
                Ok(updated)
            }
            Err(e) => {
                // The tree was already renamed; move it back so record and
                // directory do not diverge.
                if rename.is_some() {
                    if let Err(undo) = self
                        .layout
                        .rename_mission_tree(&mission.name, &old_name)
                        .await
                    {
                        error!(
                            mission_id = id,
                            error = %undo,
                            "Failed to restore mission directory after update failure"
                        );
                    }
                }
                Err(e)
            }
        }
    }

    /// Delete a mission: directory tree, metadata, file records, and the
    /// mission record. Failures are reported as `false`, never thrown, and
    /// leave the relational state unchanged.
    pub async fn delete(&self, id: i64) -> bool {
        let lock = self.locks.lock_for(id);
        let _guard = lock.lock().await;

        let mission = match self.mission_repo.find_by_id(id).await {
            Ok(Some(mission)) => mission,
            Ok(None) => return false,
            Err(e) => {
                error!(mission_id = id, error = %e, "Mission lookup failed during delete");
                return false;
            }
        };

        if let Err(e) = self.layout.delete_mission_tree(&mission.name).await {
            error!(mission_id = id, error = %e, "Failed to delete mission directory tree");
            return false;
        }

        match self.mission_repo.delete_cascade(id).await {
            Ok(deleted) => {
                self.locks.release(id);
                info!(mission_id = id, name = %mission.name, "Mission deleted");
                deleted
            }
            Err(e) => {
                error!(mission_id = id, error = %e, "Failed to delete mission records");
                false
            }
        }
    }

    /// Search missions with conjunctive optional filters, newest first.
    pub async fn search(&self, filters: MissionSearch) -> AppResult<Vec<Mission>> {
        // Unparseable date bounds are treated as absent, not as errors.
        let start = filters.start_date.as_deref().and_then(parse_flight_date);
        let end = filters.end_date.as_deref().and_then(parse_flight_date);

        self.mission_repo
            .search(filters.query.as_deref(), start, end, filters.category)
            .await
    }

    /// Aggregate file statistics for a mission.
    pub async fn summary(&self, id: i64) -> AppResult<MissionSummary> {
        let mission = self
            .mission_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Mission {id} not found")))?;

        let file_count = self.file_repo.count_by_mission(mission.id, None).await?;
        let image_count = self
            .file_repo
            .count_by_mission(mission.id, Some(FileCategory::Images))
            .await?;
        let total_size_bytes = self.file_repo.total_size_bytes(mission.id).await?;
        let categories = self.file_repo.categories_present(mission.id).await?;

        Ok(MissionSummary {
            mission_id: mission.id,
            file_count,
            image_count,
            total_size_bytes,
            categories,
        })
    }
}

/// Parse a `YYYY-MM-DD` date string. Invalid values are logged and
/// dropped rather than failing the surrounding operation.
fn parse_flight_date(raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            warn!(value = raw, "Invalid flight date format; ignoring");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flight_date() {
        assert_eq!(
            parse_flight_date("2025-06-15"),
            NaiveDate::from_ymd_opt(2025, 6, 15)
        );
        assert_eq!(parse_flight_date("15/06/2025"), None);
        assert_eq!(parse_flight_date("not-a-date"), None);
    }
}
