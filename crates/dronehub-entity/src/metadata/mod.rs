//! Mission metadata entity.

pub mod model;

pub use model::MissionMetadata;
