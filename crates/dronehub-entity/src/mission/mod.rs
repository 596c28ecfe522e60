//! Mission entity.

pub mod model;

pub use model::{CreateMission, Mission, MissionSummary, MissionUpdate};
