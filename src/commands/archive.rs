//! Archive building CLI commands.

use clap::{Args, Subcommand};

use dronehub_core::error::AppError;

use super::Services;
use crate::output;

/// Arguments for archive commands
#[derive(Debug, Args)]
pub struct ArchiveArgs {
    /// Archive subcommand
    #[command(subcommand)]
    pub command: ArchiveCommand,
}

/// Archive subcommands
#[derive(Debug, Subcommand)]
pub enum ArchiveCommand {
    /// Build a zip archive of a mission's files
    Build {
        /// Mission ID
        #[arg(short, long)]
        mission_id: i64,
        /// Restrict to one category (whole mission when omitted)
        #[arg(short, long)]
        category: Option<String>,
    },
}

/// Execute archive commands
pub async fn execute(args: &ArchiveArgs, services: &Services) -> Result<(), AppError> {
    match &args.command {
        ArchiveCommand::Build {
            mission_id,
            category,
        } => {
            let path = services
                .archives
                .build_archive(*mission_id, category.as_deref())
                .await?;
            output::print_success(&format!("Archive built: {}", path.display()));
            Ok(())
        }
    }
}
