//! Mission archive building.
//!
//! Packages a mission's files into a compressed zip under a scratch
//! directory. The archive is handed back as a path; cleanup after sending
//! is the caller's responsibility.

use std::fs::File;
use std::io::{Read, Write};
use std::path::PathBuf;

use tracing::info;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use dronehub_core::config::StorageConfig;
use dronehub_core::error::{AppError, ErrorKind};
use dronehub_core::result::AppResult;
use dronehub_entity::file::FileCategory;

/// Copy buffer size for zip entries.
const BUFFER_SIZE: usize = 64 * 1024;

/// One file to include in an archive.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Category deciding the archive-internal directory.
    pub category: FileCategory,
    /// Filename, taken verbatim as stored.
    pub filename: String,
    /// Absolute path of the file on disk.
    pub source: PathBuf,
}

/// Builds timestamped zip archives of mission files.
#[derive(Debug, Clone)]
pub struct ArchiveBuilder {
    /// Directory where finished archives are placed.
    scratch_dir: PathBuf,
}

impl ArchiveBuilder {
    /// Create an archive builder writing into the configured scratch
    /// directory, creating it if absent.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let scratch_dir = PathBuf::from(&config.scratch_dir);
        tokio::fs::create_dir_all(&scratch_dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create scratch directory: {}", scratch_dir.display()),
                e,
            )
        })?;
        Ok(Self { scratch_dir })
    }

    /// Build a zip archive of the given entries.
    ///
    /// The archive is named `<mission>_<category|complete>_<timestamp>.zip`
    /// and entries are stored as `<category>/<filename>`. Two entries with
    /// the same category and filename collapse to the later one.
    pub async fn build(
        &self,
        mission_name: &str,
        category: Option<FileCategory>,
        entries: Vec<ArchiveEntry>,
    ) -> AppResult<PathBuf> {
        let label = category.map(|c| c.as_str()).unwrap_or("complete");
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let zip_path = self
            .scratch_dir
            .join(format!("{mission_name}_{label}_{timestamp}.zip"));

        let out_path = zip_path.clone();
        let entry_count = entries.len();

        tokio::task::spawn_blocking(move || write_zip(&out_path, entries))
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Archive build task failed", e)
            })??;

        info!(
            mission = mission_name,
            category = label,
            files = entry_count,
            path = %zip_path.display(),
            "Archive built"
        );

        Ok(zip_path)
    }
}

/// Write the zip file synchronously (runs on the blocking pool).
fn write_zip(zip_path: &PathBuf, mut entries: Vec<ArchiveEntry>) -> AppResult<()> {
    // Later entries shadow earlier ones with the same archive name.
    let mut seen = std::collections::HashSet::new();
    entries.reverse();
    entries.retain(|e| seen.insert(format!("{}/{}", e.category, e.filename)));
    entries.reverse();

    let file = File::create(zip_path).map_err(|e| {
        AppError::with_source(
            ErrorKind::Storage,
            format!("Failed to create archive: {}", zip_path.display()),
            e,
        )
    })?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default();

    let mut buffer = vec![0u8; BUFFER_SIZE];
    for entry in &entries {
        let arc_name = format!("{}/{}", entry.category, entry.filename);
        writer.start_file(arc_name.as_str(), options).map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to add archive entry: {arc_name}"),
                e,
            )
        })?;

        let mut source = File::open(&entry.source).map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to open file for archiving: {}", entry.source.display()),
                e,
            )
        })?;
        loop {
            let n = source.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            writer.write_all(&buffer[..n])?;
        }
    }

    writer.finish().map_err(|e| {
        AppError::with_source(ErrorKind::Storage, "Failed to finalize archive", e)
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use zip::ZipArchive;

    fn write_source(dir: &tempfile::TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    async fn builder_in(dir: &tempfile::TempDir) -> ArchiveBuilder {
        let config = StorageConfig {
            scratch_dir: dir.path().join("temp").to_str().unwrap().to_string(),
            ..StorageConfig::default()
        };
        ArchiveBuilder::new(&config).await.unwrap()
    }

    fn entry(category: FileCategory, filename: &str, source: PathBuf) -> ArchiveEntry {
        ArchiveEntry {
            category,
            filename: filename.to_string(),
            source,
        }
    }

    #[tokio::test]
    async fn test_build_places_entries_under_category_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let builder = builder_in(&dir).await;

        let a = write_source(&dir, "a.jpg", "image-a");
        let b = write_source(&dir, "b.jpg", "image-b");

        let path = builder
            .build(
                "Alpha",
                Some(FileCategory::Images),
                vec![
                    entry(FileCategory::Images, "a.jpg", a),
                    entry(FileCategory::Images, "b.jpg", b),
                ],
            )
            .await
            .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("Alpha_images_"));
        assert!(name.ends_with(".zip"));

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);
        assert!(archive.by_name("images/a.jpg").is_ok());
        assert!(archive.by_name("images/b.jpg").is_ok());
    }

    #[tokio::test]
    async fn test_unfiltered_archive_named_complete() {
        let dir = tempfile::tempdir().unwrap();
        let builder = builder_in(&dir).await;

        let log = write_source(&dir, "flight.log", "log-data");
        let path = builder
            .build("Beta", None, vec![entry(FileCategory::Logs, "flight.log", log)])
            .await
            .unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("Beta_complete_"));

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert!(archive.by_name("logs/flight.log").is_ok());
    }

    #[tokio::test]
    async fn test_duplicate_names_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let builder = builder_in(&dir).await;

        let first = write_source(&dir, "first.log", "first");
        let second = write_source(&dir, "second.log", "second");

        let path = builder
            .build(
                "Gamma",
                None,
                vec![
                    entry(FileCategory::Logs, "flight.log", first),
                    entry(FileCategory::Logs, "flight.log", second),
                ],
            )
            .await
            .unwrap();

        let mut archive = ZipArchive::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(archive.len(), 1);
        let mut content = String::new();
        archive
            .by_name("logs/flight.log")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "second");
    }

    #[tokio::test]
    async fn test_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let builder = builder_in(&dir).await;

        let err = builder
            .build(
                "Delta",
                None,
                vec![entry(
                    FileCategory::Logs,
                    "ghost.log",
                    dir.path().join("ghost.log"),
                )],
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Storage);
    }
}
