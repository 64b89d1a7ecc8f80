use anyhow::Context;
use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, Claims, MAX_EXPIRY_HOURS};
use crate::cli::{utils::output_success, OutputFormat};
use crate::config;
use crate::database::{DatabaseManager, PgStore, RepairsStore};

#[derive(Debug, Args)]
pub struct TokenArgs {
    #[arg(help = "User ID to issue the token for")]
    pub user_id: i64,

    #[arg(
        long,
        value_parser = clap::value_parser!(u64).range(1..=MAX_EXPIRY_HOURS),
        help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)"
    )]
    pub hours: Option<u64>,
}

pub async fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config::config();
    let pool = DatabaseManager::connect(&config.database).await?;
    let store = PgStore::new(pool.clone());

    let user = store
        .find_user(args.user_id)
        .await?
        .with_context(|| format!("user {} does not exist", args.user_id))?;
    pool.close().await;

    if !user.is_active {
        anyhow::bail!("user '{}' is inactive", user.username);
    }

    let hours = args.hours.unwrap_or(config.security.jwt_expiry_hours);
    let claims = Claims::new(user.id, &user.username, hours)?;
    let token = generate_jwt(&claims, &config.security.jwt_secret)?;

    match output_format {
        OutputFormat::Json => output_success(
            output_format,
            "Token issued",
            Some(json!({
                "token": token,
                "user_id": user.id,
                "username": user.username,
                "is_staff": user.is_staff,
                "expires_in_hours": hours,
            })),
        ),
        OutputFormat::Text => {
            println!("{}", token);
            Ok(())
        }
    }
}
