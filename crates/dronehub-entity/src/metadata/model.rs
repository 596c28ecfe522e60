//! Mission metadata entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Derived metadata for one mission, one-to-one with [`Mission`].
///
/// Created empty alongside the mission; the computed fields stay absent
/// until at least one geo-position file has been successfully parsed, and
/// are overwritten (not merged) by every subsequent successful parse.
///
/// [`Mission`]: crate::mission::Mission
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MissionMetadata {
    /// Unique metadata record identifier.
    pub id: i64,
    /// The mission this record belongs to (unique).
    pub mission_id: i64,
    /// Approximate covered area in square meters (bounding-box estimate).
    pub area_covered: Option<f64>,
    /// Mean latitude of all collected samples.
    pub center_latitude: Option<f64>,
    /// Mean longitude of all collected samples.
    pub center_longitude: Option<f64>,
    /// Lowest recorded altitude.
    pub min_altitude: Option<f64>,
    /// Highest recorded altitude.
    pub max_altitude: Option<f64>,
    /// Drone model used for the flight.
    pub drone_model: String,
    /// Camera model, if known.
    pub camera_model: Option<String>,
    /// Flight duration in seconds, if known.
    pub flight_duration: Option<i32>,
}

impl MissionMetadata {
    /// Whether any geo-position file has contributed computed fields yet.
    pub fn has_geo_data(&self) -> bool {
        self.center_latitude.is_some() && self.center_longitude.is_some()
    }
}
