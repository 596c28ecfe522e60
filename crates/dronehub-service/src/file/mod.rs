//! File registry services.

pub mod archive;
pub mod service;

pub use archive::ArchiveService;
pub use service::{FileContent, FileService, RejectedFile, UploadFile, UploadReport};
