//! File registry — upload registration, retrieval, and deletion of
//! mission files, linking physical files to their records.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use dronehub_core::error::AppError;
use dronehub_core::result::AppResult;
use dronehub_database::repositories::file::FileRepository;
use dronehub_database::repositories::mission::MissionRepository;
use dronehub_entity::file::{CreateMissionFile, FileCategory, MissionFile};
use dronehub_storage::classify::FileClassifier;
use dronehub_storage::layout::MissionLayout;
use dronehub_storage::mime::mime_from_filename;
use dronehub_storage::sanitize::sanitize_filename;

use crate::geo::GeoMetadataExtractor;
use crate::mission::MissionLockRegistry;

/// One file in an upload batch.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Original filename as declared by the caller.
    pub filename: String,
    /// File content.
    pub data: Bytes,
}

/// A file rejected during batch upload; the batch itself continues.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RejectedFile {
    /// The declared filename.
    pub filename: String,
    /// Why the file was not accepted.
    pub reason: String,
}

/// Outcome of a batch upload: per-file accept/reject, never all-or-nothing.
#[derive(Debug, Clone, serde::Serialize)]
pub struct UploadReport {
    /// Successfully registered files.
    pub accepted: Vec<MissionFile>,
    /// Files rejected with their reasons.
    pub rejected: Vec<RejectedFile>,
}

/// Content and type information for single-file retrieval.
#[derive(Debug, Clone)]
pub struct FileContent {
    /// The file record.
    pub file: MissionFile,
    /// File content bytes.
    pub data: Bytes,
    /// MIME type for the Content-Type header.
    pub content_type: String,
}

/// Handles upload registration, retrieval, and deletion of mission files.
#[derive(Debug, Clone)]
pub struct FileService {
    /// File repository.
    file_repo: Arc<FileRepository>,
    /// Mission repository.
    mission_repo: Arc<MissionRepository>,
    /// Directory layout manager.
    layout: Arc<MissionLayout>,
    /// Extension-based classifier.
    classifier: FileClassifier,
    /// Geo-metadata extractor, invoked for geopos CSV uploads.
    extractor: Arc<GeoMetadataExtractor>,
    /// Per-mission mutation locks.
    locks: Arc<MissionLockRegistry>,
    /// Maximum accepted size for a single file, in bytes.
    max_upload_size_bytes: u64,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        file_repo: Arc<FileRepository>,
        mission_repo: Arc<MissionRepository>,
        layout: Arc<MissionLayout>,
        classifier: FileClassifier,
        extractor: Arc<GeoMetadataExtractor>,
        locks: Arc<MissionLockRegistry>,
        max_upload_size_bytes: u64,
    ) -> Self {
        Self {
            file_repo,
            mission_repo,
            layout,
            classifier,
            extractor,
            locks,
            max_upload_size_bytes,
        }
    }

    /// Register a batch of uploaded files for a mission.
    ///
    /// The mission must exist. Individual files are rejected (not-allowed
    /// extension, oversize, storage write failure) without aborting the
    /// rest of the batch; a mixed batch is a partial success.
    pub async fn register_upload(
        &self,
        mission_id: i64,
        files: Vec<UploadFile>,
    ) -> AppResult<UploadReport> {
        let mission = self
            .mission_repo
            .find_by_id(mission_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Mission {mission_id} not found")))?;

        let lock = self.locks.lock_for(mission_id);
        let _guard = lock.lock().await;

        // The tree normally exists since mission creation; recreate it if
        // something external removed it.
        self.layout.ensure_mission_tree(&mission.name).await?;

        let mut report = UploadReport {
            accepted: Vec::new(),
            rejected: Vec::new(),
        };

        for upload in files {
            if upload.filename.is_empty() {
                continue;
            }

            if !self.classifier.is_allowed(&upload.filename, None) {
                report.rejected.push(RejectedFile {
                    filename: upload.filename,
                    reason: "File type not allowed".to_string(),
                });
                continue;
            }

            if upload.data.len() as u64 > self.max_upload_size_bytes {
                report.rejected.push(RejectedFile {
                    filename: upload.filename,
                    reason: format!(
                        "File exceeds maximum upload size of {} bytes",
                        self.max_upload_size_bytes
                    ),
                });
                continue;
            }

            match self.store_one(&mission.name, mission_id, upload).await {
                Ok(record) => report.accepted.push(record),
                Err(rejected) => report.rejected.push(rejected),
            }
        }

        info!(
            mission_id,
            accepted = report.accepted.len(),
            rejected = report.rejected.len(),
            "Upload batch registered"
        );

        Ok(report)
    }

    /// Store one accepted file and create its record. Failures are turned
    /// into per-file rejections so the batch continues.
    async fn store_one(
        &self,
        mission_name: &str,
        mission_id: i64,
        upload: UploadFile,
    ) -> Result<MissionFile, RejectedFile> {
        let filename = sanitize_filename(&upload.filename);
        let category = self.classifier.category_for(&filename);

        if category.is_fallback() {
            if let Err(e) = self.layout.ensure_category_dir(mission_name, category).await {
                return Err(reject(&upload.filename, &e));
            }
        }

        let dest = self.layout.category_dir(mission_name, category).join(&filename);

        if let Err(e) = tokio::fs::write(&dest, &upload.data).await {
            warn!(
                mission_id,
                filename = %filename,
                error = %e,
                "Failed to write uploaded file"
            );
            return Err(RejectedFile {
                filename: upload.filename,
                reason: format!("Failed to store file: {e}"),
            });
        }

        // Record the size as measured on disk, not as declared.
        let file_size = match tokio::fs::metadata(&dest).await {
            Ok(meta) => meta.len() as i64,
            Err(e) => return Err(reject(&upload.filename, &e)),
        };

        let record = self
            .file_repo
            .create(&CreateMissionFile {
                mission_id,
                filename: filename.clone(),
                file_path: dest.display().to_string(),
                file_type: category,
                file_size,
            })
            .await
            .map_err(|e| reject(&upload.filename, &e))?;

        if category == FileCategory::Geopos && filename.to_lowercase().ends_with(".csv") {
            self.extractor.extract(&dest, mission_id).await;
        }

        Ok(record)
    }

    /// List a mission's files, optionally restricted to one category.
    pub async fn list_files(
        &self,
        mission_id: i64,
        category: Option<FileCategory>,
    ) -> AppResult<Vec<MissionFile>> {
        if self.mission_repo.find_by_id(mission_id).await?.is_none() {
            return Err(AppError::not_found(format!(
                "Mission {mission_id} not found"
            )));
        }
        self.file_repo.find_by_mission(mission_id, category).await
    }

    /// Look up a file record by ID.
    pub async fn get_file(&self, file_id: i64) -> AppResult<Option<MissionFile>> {
        self.file_repo.find_by_id(file_id).await
    }

    /// Read a file's content for retrieval.
    pub async fn read_file(&self, file_id: i64) -> AppResult<FileContent> {
        let file = self
            .file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        let data = tokio::fs::read(&file.file_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File {} missing on disk", file.file_path))
            } else {
                AppError::storage(format!("Failed to read file {}: {e}", file.file_path))
            }
        })?;

        let content_type = mime_from_filename(&file.filename)
            .unwrap_or("application/octet-stream")
            .to_string();

        Ok(FileContent {
            file,
            data: Bytes::from(data),
            content_type,
        })
    }

    /// Delete a file: physical file first, then the record.
    ///
    /// A physical remove failure is logged but does not keep the record
    /// alive — an orphaned file on disk is preferred over a permanently
    /// orphaned record.
    pub async fn delete_file(&self, file_id: i64) -> AppResult<()> {
        let file = self
            .file_repo
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("File {file_id} not found")))?;

        let lock = self.locks.lock_for(file.mission_id);
        let _guard = lock.lock().await;

        if let Err(e) = tokio::fs::remove_file(&file.file_path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    file_id,
                    path = %file.file_path,
                    error = %e,
                    "Failed to remove physical file; deleting record anyway"
                );
            }
        }

        self.file_repo.delete(file_id).await?;
        info!(file_id, filename = %file.filename, "File deleted");
        Ok(())
    }
}

fn reject(filename: &str, error: &dyn std::fmt::Display) -> RejectedFile {
    RejectedFile {
        filename: filename.to_string(),
        reason: error.to_string(),
    }
}
