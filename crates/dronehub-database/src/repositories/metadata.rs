//! Mission metadata repository implementation.

use sqlx::PgPool;

use dronehub_core::error::{AppError, ErrorKind};
use dronehub_core::result::AppResult;
use dronehub_entity::metadata::MissionMetadata;

/// Computed geo fields written by the extractor as one unit.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComputedGeoFields {
    /// Approximate covered area in square meters.
    pub area_covered: Option<f64>,
    /// Mean latitude of all samples.
    pub center_latitude: Option<f64>,
    /// Mean longitude of all samples.
    pub center_longitude: Option<f64>,
    /// Lowest recorded altitude.
    pub min_altitude: Option<f64>,
    /// Highest recorded altitude.
    pub max_altitude: Option<f64>,
}

/// Repository for the one-to-one mission metadata records.
#[derive(Debug, Clone)]
pub struct MetadataRepository {
    pool: PgPool,
}

impl MetadataRepository {
    /// Create a new metadata repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find the metadata record for a mission.
    pub async fn find_by_mission(&self, mission_id: i64) -> AppResult<Option<MissionMetadata>> {
        sqlx::query_as::<_, MissionMetadata>(
            "SELECT * FROM mission_metadata WHERE mission_id = $1",
        )
        .bind(mission_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find mission metadata", e)
        })
    }

    /// Load the metadata record for a mission, creating an empty one if it
    /// does not exist yet. At most one record per mission.
    pub async fn find_or_create(&self, mission_id: i64) -> AppResult<MissionMetadata> {
        sqlx::query_as::<_, MissionMetadata>(
            "INSERT INTO mission_metadata (mission_id) VALUES ($1) \
             ON CONFLICT (mission_id) DO UPDATE SET mission_id = EXCLUDED.mission_id \
             RETURNING *",
        )
        .bind(mission_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load mission metadata", e)
        })
    }

    /// Overwrite the computed geo fields for a mission.
    ///
    /// Values are replaced wholesale, never merged with earlier extractions.
    pub async fn update_computed(
        &self,
        mission_id: i64,
        fields: &ComputedGeoFields,
    ) -> AppResult<MissionMetadata> {
        sqlx::query_as::<_, MissionMetadata>(
            "UPDATE mission_metadata SET \
             area_covered = $2, center_latitude = $3, center_longitude = $4, \
             min_altitude = $5, max_altitude = $6 \
             WHERE mission_id = $1 RETURNING *",
        )
        .bind(mission_id)
        .bind(fields.area_covered)
        .bind(fields.center_latitude)
        .bind(fields.center_longitude)
        .bind(fields.min_altitude)
        .bind(fields.max_altitude)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update mission metadata", e)
        })?
        .ok_or_else(|| {
            AppError::not_found(format!("Metadata for mission {mission_id} not found"))
        })
    }

}
