//! Mission management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use dronehub_core::error::AppError;
use dronehub_entity::mission::{CreateMission, Mission, MissionUpdate};
use dronehub_service::MissionSearch;

use super::Services;
use crate::output::{self, OutputFormat};

/// Arguments for mission commands
#[derive(Debug, Args)]
pub struct MissionArgs {
    /// Mission subcommand
    #[command(subcommand)]
    pub command: MissionCommand,
}

/// Mission subcommands
#[derive(Debug, Subcommand)]
pub enum MissionCommand {
    /// Create a new mission
    Create {
        /// Mission name
        name: String,
        /// Flight date (YYYY-MM-DD)
        #[arg(short = 'd', long)]
        flight_date: Option<String>,
        /// Description
        #[arg(long)]
        description: Option<String>,
    },
    /// List all missions
    List,
    /// Show one mission with its metadata
    Show {
        /// Mission ID
        id: i64,
    },
    /// Update a mission
    Update {
        /// Mission ID
        id: i64,
        /// New mission name (renames the mission directory)
        #[arg(short, long)]
        name: Option<String>,
        /// New flight date (YYYY-MM-DD)
        #[arg(short = 'd', long)]
        flight_date: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a mission and all of its files
    Delete {
        /// Mission ID
        id: i64,
    },
    /// Search missions
    Search {
        /// Substring matched against name and description
        #[arg(short, long)]
        query: Option<String>,
        /// Inclusive flight-date lower bound (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,
        /// Inclusive flight-date upper bound (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,
        /// Only missions owning at least one file of this category
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show aggregated file statistics for a mission
    Summary {
        /// Mission ID
        id: i64,
    },
}

/// Mission display row
#[derive(Debug, Serialize, Tabled)]
struct MissionRow {
    /// Mission ID
    id: i64,
    /// Name
    name: String,
    /// Flight date
    flight_date: String,
    /// Created at
    created: String,
    /// Description
    description: String,
}

impl From<&Mission> for MissionRow {
    fn from(mission: &Mission) -> Self {
        Self {
            id: mission.id,
            name: mission.name.clone(),
            flight_date: mission
                .flight_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            created: mission.date_created.format("%Y-%m-%d %H:%M").to_string(),
            description: mission.description.clone().unwrap_or_default(),
        }
    }
}

/// Execute mission commands
pub async fn execute(
    args: &MissionArgs,
    services: &Services,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        MissionCommand::Create {
            name,
            flight_date,
            description,
        } => {
            let mission = services
                .missions
                .create(CreateMission {
                    name: name.clone(),
                    flight_date: flight_date.clone(),
                    description: description.clone(),
                })
                .await?;
            output::print_success(&format!("Mission '{}' created (id {})", mission.name, mission.id));
            Ok(())
        }
        MissionCommand::List => {
            let missions = services.missions.list().await?;
            let rows: Vec<MissionRow> = missions.iter().map(MissionRow::from).collect();
            output::print_list(&rows, format);
            Ok(())
        }
        MissionCommand::Show { id } => {
            let mission = services
                .missions
                .get(*id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Mission {id} not found")))?;

            println!("Mission {}", mission.id);
            output::print_kv("name", &mission.name);
            output::print_kv(
                "flight date",
                &mission
                    .flight_date
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            );
            output::print_kv("created", &mission.date_created.to_rfc3339());
            output::print_kv("description", mission.description.as_deref().unwrap_or("-"));

            if let Some(meta) = services.missions.metadata(mission.id).await? {
                println!("Metadata");
                output::print_kv("drone model", &meta.drone_model);
                output::print_kv("camera model", meta.camera_model.as_deref().unwrap_or("-"));
                output::print_kv("area covered (m²)", &opt_num(meta.area_covered));
                output::print_kv("center latitude", &opt_num(meta.center_latitude));
                output::print_kv("center longitude", &opt_num(meta.center_longitude));
                output::print_kv("min altitude", &opt_num(meta.min_altitude));
                output::print_kv("max altitude", &opt_num(meta.max_altitude));
                output::print_kv(
                    "flight duration (s)",
                    &meta
                        .flight_duration
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                );
            }
            Ok(())
        }
        MissionCommand::Update {
            id,
            name,
            flight_date,
            description,
        } => {
            let mission = services
                .missions
                .update(
                    *id,
                    MissionUpdate {
                        name: name.clone(),
                        flight_date: flight_date.clone(),
                        description: description.clone(),
                    },
                )
                .await?;
            output::print_success(&format!("Mission {} updated (name '{}')", mission.id, mission.name));
            Ok(())
        }
        MissionCommand::Delete { id } => {
            if services.missions.delete(*id).await {
                output::print_success(&format!("Mission {id} deleted"));
                Ok(())
            } else {
                Err(AppError::internal(format!(
                    "Mission {id} could not be deleted"
                )))
            }
        }
        MissionCommand::Search {
            query,
            start_date,
            end_date,
            category,
        } => {
            let category = super::file::parse_category(category.as_deref())?;

            let missions = services
                .missions
                .search(MissionSearch {
                    query: query.clone(),
                    start_date: start_date.clone(),
                    end_date: end_date.clone(),
                    category,
                })
                .await?;
            let rows: Vec<MissionRow> = missions.iter().map(MissionRow::from).collect();
            output::print_list(&rows, format);
            Ok(())
        }
        MissionCommand::Summary { id } => {
            let summary = services.missions.summary(*id).await?;
            println!("Mission {}", summary.mission_id);
            output::print_kv("files", &summary.file_count.to_string());
            output::print_kv("images", &summary.image_count.to_string());
            output::print_kv("total size (bytes)", &summary.total_size_bytes.to_string());
            let categories: Vec<&str> = summary.categories.iter().map(|c| c.as_str()).collect();
            output::print_kv("categories", &categories.join(", "));
            Ok(())
        }
    }
}

fn opt_num(value: Option<f64>) -> String {
    value
        .map(|v| format!("{v:.2}"))
        .unwrap_or_else(|| "-".to_string())
}
