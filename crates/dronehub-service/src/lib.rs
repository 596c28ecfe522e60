//! # dronehub-service
//!
//! Business logic service layer for DroneHub. Each service orchestrates
//! repositories and the storage layout to implement application-level use
//! cases: the mission registry, the file registry, archive building, and
//! geo-metadata extraction.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod file;
pub mod geo;
pub mod mission;

pub use file::{ArchiveService, FileContent, FileService, RejectedFile, UploadFile, UploadReport};
pub use geo::GeoMetadataExtractor;
pub use mission::{MissionLockRegistry, MissionService};
pub use mission::service::MissionSearch;
