//! Mission file management CLI commands.

use std::path::PathBuf;

use bytes::Bytes;
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use dronehub_core::error::AppError;
use dronehub_entity::file::{FileCategory, MissionFile};
use dronehub_service::UploadFile;

use super::Services;
use crate::output::{self, OutputFormat};

/// Arguments for file commands
#[derive(Debug, Args)]
pub struct FileArgs {
    /// File subcommand
    #[command(subcommand)]
    pub command: FileCommand,
}

/// File subcommands
#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Upload files to a mission
    Upload {
        /// Mission ID
        #[arg(short, long)]
        mission_id: i64,
        /// Paths of the files to upload
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// List a mission's files
    List {
        /// Mission ID
        #[arg(short, long)]
        mission_id: i64,
        /// Restrict to one category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Fetch one file's content to a local path
    Get {
        /// File ID
        id: i64,
        /// Destination path (defaults to the stored filename)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Delete a file
    Delete {
        /// File ID
        id: i64,
    },
}

/// File display row
#[derive(Debug, Serialize, Tabled)]
struct FileRow {
    /// File ID
    id: i64,
    /// Filename
    filename: String,
    /// Category
    category: String,
    /// Size in bytes
    size: i64,
    /// Uploaded at
    uploaded: String,
}

impl From<&MissionFile> for FileRow {
    fn from(file: &MissionFile) -> Self {
        Self {
            id: file.id,
            filename: file.filename.clone(),
            category: file.file_type.to_string(),
            size: file.file_size,
            uploaded: file.uploaded_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute file commands
pub async fn execute(
    args: &FileArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        FileCommand::Upload { mission_id, paths } => {
            let mut uploads = Vec::with_capacity(paths.len());
            for path in paths {
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .ok_or_else(|| {
                        AppError::validation(format!("Not a file path: {}", path.display()))
                    })?;
                let data = tokio::fs::read(path).await?;
                uploads.push(UploadFile {
                    filename,
                    data: Bytes::from(data),
                });
            }

            let report = services.files.register_upload(*mission_id, uploads).await?;

            output::print_success(&format!(
                "{} file(s) uploaded, {} rejected",
                report.accepted.len(),
                report.rejected.len()
            ));
            for rejected in &report.rejected {
                output::print_warning(&format!("{}: {}", rejected.filename, rejected.reason));
            }
            Ok(())
        }
        FileCommand::List {
            mission_id,
            category,
        } => {
            let category = parse_category(category.as_deref())?;
            let files = services.files.list_files(*mission_id, category).await?;
            let rows: Vec<FileRow> = files.iter().map(FileRow::from).collect();
            output::print_list(&rows, format);
            Ok(())
        }
        FileCommand::Get { id, out } => {
            let content = services.files.read_file(*id).await?;
            let dest = out
                .clone()
                .unwrap_or_else(|| PathBuf::from(&content.file.filename));
            tokio::fs::write(&dest, &content.data).await?;
            output::print_success(&format!(
                "{} ({}, {} bytes) written to {}",
                content.file.filename,
                content.content_type,
                content.data.len(),
                dest.display()
            ));
            Ok(())
        }
        FileCommand::Delete { id } => {
            services.files.delete_file(*id).await?;
            output::print_success(&format!("File {id} deleted"));
            Ok(())
        }
    }
}

/// Parse an optional category name supplied on the command line.
pub fn parse_category(raw: Option<&str>) -> Result<Option<FileCategory>, AppError> {
    raw.map(|s| {
        s.parse::<FileCategory>()
            .map_err(|_| AppError::validation(format!("Unknown file category '{s}'")))
    })
    .transpose()
}
