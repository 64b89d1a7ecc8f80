use clap::Subcommand;
use serde_json::json;

use crate::cli::{utils::output_success, OutputFormat};
use crate::config;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Create tables if they do not exist")]
    Migrate,

    #[command(about = "Apply the schema and load the demo fixture")]
    Seed,

    #[command(about = "Check database connectivity")]
    Check,
}

pub async fn handle(cmd: DbCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config::config().database).await?;

    let result = match cmd {
        DbCommands::Migrate => {
            DatabaseManager::migrate(&pool).await?;
            output_success(output_format, "Schema applied", None)
        }
        DbCommands::Seed => {
            DatabaseManager::migrate(&pool).await?;
            DatabaseManager::seed(&pool).await?;
            output_success(output_format, "Seed fixture loaded", None)
        }
        DbCommands::Check => {
            DatabaseManager::health_check(&pool).await?;
            let url = config::config().database.url.as_deref().unwrap_or_default();
            output_success(
                output_format,
                "Database reachable",
                Some(json!({ "database": DatabaseManager::redacted_url(url) })),
            )
        }
    };

    pool.close().await;
    result
}
