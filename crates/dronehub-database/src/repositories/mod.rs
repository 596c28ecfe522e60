//! Concrete repository implementations, one per entity.

pub mod file;
pub mod metadata;
pub mod mission;

pub use file::FileRepository;
pub use metadata::MetadataRepository;
pub use mission::MissionRepository;
