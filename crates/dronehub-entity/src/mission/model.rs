//! Mission entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::file::FileCategory;

/// A recorded drone flight session.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Mission {
    /// Unique mission identifier.
    pub id: i64,
    /// Mission name, unique across all missions. Also names the on-disk
    /// directory holding the mission's files.
    pub name: String,
    /// When the mission record was created. Set once, immutable.
    pub date_created: DateTime<Utc>,
    /// Calendar date of the flight, if known.
    pub flight_date: Option<NaiveDate>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Data required to create a new mission record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMission {
    /// Mission name (must be non-empty and unique).
    pub name: String,
    /// Flight date as supplied by the caller (`YYYY-MM-DD`). Invalid
    /// values are logged and ignored rather than rejected.
    pub flight_date: Option<String>,
    /// Free-text description.
    pub description: Option<String>,
}

/// Partial update of a mission. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MissionUpdate {
    /// New mission name. A name change also renames the mission directory.
    pub name: Option<String>,
    /// New flight date as supplied by the caller (`YYYY-MM-DD`).
    pub flight_date: Option<String>,
    /// New description. `Some("")` clears the text.
    pub description: Option<String>,
}

/// Aggregated file statistics for one mission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionSummary {
    /// The mission the summary describes.
    pub mission_id: i64,
    /// Total number of registered files.
    pub file_count: i64,
    /// Number of files in the `images` category.
    pub image_count: i64,
    /// Combined size of all registered files, in bytes.
    pub total_size_bytes: i64,
    /// Categories with at least one registered file.
    pub categories: Vec<FileCategory>,
}
