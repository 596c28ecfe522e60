//! File repository implementation.

use sqlx::PgPool;

use dronehub_core::error::{AppError, ErrorKind};
use dronehub_core::result::AppResult;
use dronehub_entity::file::{CreateMissionFile, FileCategory, MissionFile};

/// Repository for file record CRUD and per-mission queries.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new file record.
    pub async fn create(&self, data: &CreateMissionFile) -> AppResult<MissionFile> {
        sqlx::query_as::<_, MissionFile>(
            "INSERT INTO files (mission_id, filename, file_path, file_type, file_size) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(data.mission_id)
        .bind(&data.filename)
        .bind(&data.file_path)
        .bind(data.file_type)
        .bind(data.file_size)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file record", e))
    }

    /// Find a file by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<MissionFile>> {
        sqlx::query_as::<_, MissionFile>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// List a mission's files, optionally restricted to one category.
    pub async fn find_by_mission(
        &self,
        mission_id: i64,
        category: Option<FileCategory>,
    ) -> AppResult<Vec<MissionFile>> {
        sqlx::query_as::<_, MissionFile>(
            "SELECT * FROM files \
             WHERE mission_id = $1 AND ($2::file_category IS NULL OR file_type = $2) \
             ORDER BY uploaded_at DESC",
        )
        .bind(mission_id)
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// Delete a file record; returns whether the row existed.
    pub async fn delete(&self, file_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(file_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete file record", e)
            })?;
        Ok(result.rows_affected() > 0)
    }

    /// Count a mission's files, optionally restricted to one category.
    pub async fn count_by_mission(
        &self,
        mission_id: i64,
        category: Option<FileCategory>,
    ) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM files \
             WHERE mission_id = $1 AND ($2::file_category IS NULL OR file_type = $2)",
        )
        .bind(mission_id)
        .bind(category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count files", e))?;
        Ok(count)
    }

    /// Distinct categories that have at least one file in the mission.
    pub async fn categories_present(&self, mission_id: i64) -> AppResult<Vec<FileCategory>> {
        sqlx::query_scalar::<_, FileCategory>(
            "SELECT DISTINCT file_type FROM files WHERE mission_id = $1",
        )
        .bind(mission_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list file categories", e)
        })
    }

    /// Total size in bytes of a mission's registered files.
    pub async fn total_size_bytes(&self, mission_id: i64) -> AppResult<i64> {
        let size: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(file_size), 0) FROM files WHERE mission_id = $1",
        )
        .bind(mission_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to sum file sizes", e)
        })?;
        Ok(size)
    }
}
