//! Geo-metadata extraction service.
//!
//! Parses an uploaded geo-position file and overwrites the owning
//! mission's computed metadata fields. Extraction failures are fully
//! contained: logged, nothing persisted, never surfaced to the caller —
//! the triggering upload still succeeds.

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use dronehub_core::result::AppResult;
use dronehub_database::repositories::metadata::{ComputedGeoFields, MetadataRepository};

use super::parse::parse_geo_summary;

/// Derives mission metadata from uploaded geo-position files.
#[derive(Debug, Clone)]
pub struct GeoMetadataExtractor {
    /// Metadata repository.
    metadata_repo: Arc<MetadataRepository>,
}

impl GeoMetadataExtractor {
    /// Creates a new extractor.
    pub fn new(metadata_repo: Arc<MetadataRepository>) -> Self {
        Self { metadata_repo }
    }

    /// Extract metadata from the file at `path` for the given mission.
    ///
    /// Never fails from the caller's perspective; all errors end here.
    pub async fn extract(&self, path: &Path, mission_id: i64) {
        match self.try_extract(path, mission_id).await {
            Ok(true) => {}
            Ok(false) => {
                warn!(
                    mission_id,
                    path = %path.display(),
                    "Geo-position file had no usable samples; metadata left unchanged"
                );
            }
            Err(e) => {
                error!(
                    mission_id,
                    path = %path.display(),
                    error = %e,
                    "Geo-metadata extraction failed; metadata left unchanged"
                );
            }
        }
    }

    /// Parse and persist; returns whether anything was written.
    ///
    /// The metadata row is only touched after a successful parse, so a
    /// mid-flight failure leaves no partial state behind.
    async fn try_extract(&self, path: &Path, mission_id: i64) -> AppResult<bool> {
        let content = tokio::fs::read(path).await?;
        let summary = parse_geo_summary(&content)?;

        if summary.is_empty() {
            return Ok(false);
        }

        // Create-if-absent, then overwrite the computed fields as one unit.
        self.metadata_repo.find_or_create(mission_id).await?;
        self.metadata_repo
            .update_computed(
                mission_id,
                &ComputedGeoFields {
                    area_covered: summary.area_covered,
                    center_latitude: summary.center_latitude,
                    center_longitude: summary.center_longitude,
                    min_altitude: summary.min_altitude,
                    max_altitude: summary.max_altitude,
                },
            )
            .await?;

        info!(
            mission_id,
            positions = summary.position_samples,
            altitudes = summary.altitude_samples,
            area = ?summary.area_covered,
            "Mission metadata updated from geo-position file"
        );

        Ok(true)
    }
}
