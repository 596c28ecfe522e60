//! CLI command definitions and dispatch.

pub mod archive;
pub mod file;
pub mod mission;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use dronehub_core::config::AppConfig;
use dronehub_core::error::AppError;
use dronehub_database::DatabasePool;
use dronehub_database::repositories::{FileRepository, MetadataRepository, MissionRepository};
use dronehub_service::{
    ArchiveService, FileService, GeoMetadataExtractor, MissionLockRegistry, MissionService,
};
use dronehub_storage::archive::ArchiveBuilder;
use dronehub_storage::classify::FileClassifier;
use dronehub_storage::layout::MissionLayout;

use crate::output::OutputFormat;

/// DroneHub — drone flight mission and file management
#[derive(Debug, Parser)]
#[command(name = "dronehub", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (merges config/default and config/<env>)
    #[arg(short, long, default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Mission management
    Mission(mission::MissionArgs),
    /// Mission file management
    File(file::FileArgs),
    /// Archive building
    Archive(archive::ArchiveArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.env)?;
        init_logging(&config);

        let services = Services::build(&config).await?;

        match &self.command {
            Commands::Mission(args) => mission::execute(args, &services, self.format).await,
            Commands::File(args) => file::execute(args, &services, self.format).await,
            Commands::Archive(args) => archive::execute(args, &services).await,
        }
    }
}

/// Initialize tracing from the logging configuration.
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

/// The wired service graph every command runs against.
pub struct Services {
    /// Mission registry.
    pub missions: MissionService,
    /// File registry.
    pub files: FileService,
    /// Archive builder.
    pub archives: ArchiveService,
}

impl Services {
    /// Connect to the database, run migrations, and wire all services.
    pub async fn build(config: &AppConfig) -> Result<Self, AppError> {
        let db = DatabasePool::connect(&config.database).await?;
        dronehub_database::migration::run_migrations(db.pool()).await?;

        let mission_repo = Arc::new(MissionRepository::new(db.pool().clone()));
        let file_repo = Arc::new(FileRepository::new(db.pool().clone()));
        let metadata_repo = Arc::new(MetadataRepository::new(db.pool().clone()));

        let layout = Arc::new(MissionLayout::new(&config.storage).await?);
        let builder = Arc::new(ArchiveBuilder::new(&config.storage).await?);
        let classifier = FileClassifier::new(config.storage.extensions.clone());
        let locks = Arc::new(MissionLockRegistry::new());
        let extractor = Arc::new(GeoMetadataExtractor::new(Arc::clone(&metadata_repo)));

        let missions = MissionService::new(
            Arc::clone(&mission_repo),
            Arc::clone(&file_repo),
            Arc::clone(&metadata_repo),
            Arc::clone(&layout),
            Arc::clone(&locks),
        );

        let files = FileService::new(
            Arc::clone(&file_repo),
            Arc::clone(&mission_repo),
            Arc::clone(&layout),
            classifier,
            Arc::clone(&extractor),
            Arc::clone(&locks),
            config.storage.max_upload_size_bytes,
        );

        let archives = ArchiveService::new(file_repo, mission_repo, builder);

        Ok(Self {
            missions,
            files,
            archives,
        })
    }
}
