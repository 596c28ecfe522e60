//! # dronehub-storage
//!
//! Filesystem side of DroneHub: the on-disk mission directory layout,
//! extension-based file classification, filename sanitation, MIME lookup,
//! and mission archive building. Nothing in this crate touches the
//! relational store.

pub mod archive;
pub mod classify;
pub mod layout;
pub mod mime;
pub mod sanitize;

pub use archive::ArchiveBuilder;
pub use classify::FileClassifier;
pub use layout::MissionLayout;
