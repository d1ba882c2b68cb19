use clap::{Parser, Subcommand};
use sqlx::PgPool;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use crate::adapters::PostgresFundingStore;
use crate::config::Config;
use crate::use_cases::{ApplyDonation, DonationInput};
use crate::validation::{parse_amount, AmountInput};
use crate::{create_app, db, AppState};

#[derive(Parser)]
#[command(name = "betterfund-core")]
#[command(about = "BetterFund Core - campaign funding ledger", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Configuration validation
    Config,

    /// Apply a donation to a campaign from the operator console
    Donate {
        /// Campaign id
        #[arg(value_name = "CAMPAIGN_ID")]
        campaign_id: i64,

        /// Amount, e.g. 50 or 12.50
        #[arg(value_name = "AMOUNT", allow_negative_numbers = true)]
        amount: String,
    },
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

pub async fn handle_serve(config: &Config) -> anyhow::Result<()> {
    let pool = db::create_pool(config).await?;
    db::run_migrations(&pool, Path::new(db::MIGRATIONS_DIR)).await?;

    let store = Arc::new(PostgresFundingStore::new(pool));
    let app = create_app(AppState::new(store, config.ledger_max_retries));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

pub async fn handle_db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = db::create_pool(config).await?;

    tracing::info!("Running database migrations...");
    db::run_migrations(&pool, Path::new(db::MIGRATIONS_DIR)).await?;

    println!("✓ Database migrations completed");

    Ok(())
}

pub fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Database URL: {}", mask_password(&config.database_url));
    println!("  DB Max Connections: {}", config.db_max_connections);
    println!("  Ledger Max Retries: {}", config.ledger_max_retries);
    println!("  Log Format: {:?}", config.log_format);

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");

    Ok(())
}

pub async fn handle_donate(
    pool: &PgPool,
    config: &Config,
    campaign_id: i64,
    amount: &str,
) -> anyhow::Result<()> {
    let amount = parse_amount(&AmountInput::Text(amount.to_string()))?;

    let ledger = ApplyDonation::new(Arc::new(PostgresFundingStore::new(pool.clone())))
        .with_max_retries(config.ledger_max_retries);

    let output = ledger
        .execute(DonationInput {
            campaign_id,
            amount,
        })
        .await?;

    println!("✓ Donation {} applied to campaign {}", output.donation_id, output.campaign_id);
    println!("  Amount: {}", output.amount);
    println!("  Raised: {}", output.new_amount);
    println!("  Balance: {}", output.new_balance);

    Ok(())
}

fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if let Some(slash_pos) = url[..colon_pos].rfind("//") {
                let prefix = &url[..slash_pos + 2];
                let user = &url[slash_pos + 2..colon_pos];
                let suffix = &url[at_pos..];
                return format!("{}{}:****{}", prefix, user, suffix);
            }
        }
    }
    url.to_string()
}
