//! Mission repository implementation.

use chrono::NaiveDate;
use sqlx::PgPool;

use dronehub_core::error::{AppError, ErrorKind};
use dronehub_core::result::AppResult;
use dronehub_entity::file::FileCategory;
use dronehub_entity::mission::Mission;

/// Repository for mission CRUD and search operations.
#[derive(Debug, Clone)]
pub struct MissionRepository {
    pool: PgPool,
}

impl MissionRepository {
    /// Create a new mission repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a mission record together with its empty metadata record.
    ///
    /// Both rows are written in one transaction so a mission can never
    /// exist without its metadata companion.
    pub async fn create(
        &self,
        name: &str,
        flight_date: Option<NaiveDate>,
        description: Option<&str>,
    ) -> AppResult<Mission> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let mission = sqlx::query_as::<_, Mission>(
            "INSERT INTO missions (name, flight_date, description) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(name)
        .bind(flight_date)
        .bind(description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("missions_name_key") =>
            {
                AppError::validation(format!("A mission named '{name}' already exists"))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create mission", e),
        })?;

        sqlx::query("INSERT INTO mission_metadata (mission_id) VALUES ($1)")
            .bind(mission.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create mission metadata", e)
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit mission creation", e)
        })?;

        Ok(mission)
    }

    /// Find a mission by ID.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Mission>> {
        sqlx::query_as::<_, Mission>("SELECT * FROM missions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find mission", e))
    }

    /// Find a mission by its exact (case-sensitive) name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Mission>> {
        sqlx::query_as::<_, Mission>("SELECT * FROM missions WHERE name = $1")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find mission by name", e)
            })
    }

    /// List all missions, newest first.
    pub async fn list(&self) -> AppResult<Vec<Mission>> {
        sqlx::query_as::<_, Mission>("SELECT * FROM missions ORDER BY date_created DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list missions", e))
    }

    /// Persist updated mission fields.
    ///
    /// When `path_rebase` is given as `(old_prefix, new_prefix)`, every
    /// stored file path of the mission is rebased onto the new prefix in
    /// the same transaction — the record update and the path rewrite
    /// cannot be observed separately.
    pub async fn update(
        &self,
        mission: &Mission,
        path_rebase: Option<(&str, &str)>,
    ) -> AppResult<Mission> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let updated = sqlx::query_as::<_, Mission>(
            "UPDATE missions SET name = $2, flight_date = $3, description = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(mission.id)
        .bind(&mission.name)
        .bind(mission.flight_date)
        .bind(&mission.description)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("missions_name_key") =>
            {
                AppError::validation(format!(
                    "A mission named '{}' already exists",
                    mission.name
                ))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to update mission", e),
        })?
        .ok_or_else(|| AppError::not_found(format!("Mission {} not found", mission.id)))?;

        if let Some((old_prefix, new_prefix)) = path_rebase {
            sqlx::query(
                "UPDATE files SET file_path = REPLACE(file_path, $2, $3) WHERE mission_id = $1",
            )
            .bind(mission.id)
            .bind(old_prefix)
            .bind(new_prefix)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to rebase file paths", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit mission update", e)
        })?;

        Ok(updated)
    }

    /// Delete a mission together with its metadata and file records.
    ///
    /// All three deletes run in one transaction; returns whether the
    /// mission row existed.
    pub async fn delete_cascade(&self, mission_id: i64) -> AppResult<bool> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM mission_metadata WHERE mission_id = $1")
            .bind(mission_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete mission metadata", e)
            })?;

        sqlx::query("DELETE FROM files WHERE mission_id = $1")
            .bind(mission_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete file records", e)
            })?;

        let result = sqlx::query("DELETE FROM missions WHERE id = $1")
            .bind(mission_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete mission", e)
            })?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit mission deletion", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Search missions with conjunctive optional filters.
    ///
    /// `query` matches name or description as a case-insensitive substring;
    /// the flight-date window is inclusive on both bounds; `category`
    /// restricts to missions owning at least one file of that category.
    /// Results come back newest-created first.
    pub async fn search(
        &self,
        query: Option<&str>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
        category: Option<FileCategory>,
    ) -> AppResult<Vec<Mission>> {
        sqlx::query_as::<_, Mission>(
            "SELECT m.* FROM missions m \
             WHERE ($1::text IS NULL \
                    OR m.name ILIKE '%' || $1 || '%' \
                    OR m.description ILIKE '%' || $1 || '%') \
               AND ($2::date IS NULL OR m.flight_date >= $2) \
               AND ($3::date IS NULL OR m.flight_date <= $3) \
               AND ($4::file_category IS NULL OR EXISTS \
                    (SELECT 1 FROM files f \
                     WHERE f.mission_id = m.id AND f.file_type = $4)) \
             ORDER BY m.date_created DESC",
        )
        .bind(query)
        .bind(start_date)
        .bind(end_date)
        .bind(category)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search missions", e))
    }
}
