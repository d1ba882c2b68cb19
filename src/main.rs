use betterfund_core::cli::{self, Cli, Commands, DbCommands};
use betterfund_core::config::Config;
use betterfund_core::{db, telemetry};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    telemetry::init_tracing(config.log_format);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => cli::handle_serve(&config).await,
        Commands::Db(DbCommands::Migrate) => cli::handle_db_migrate(&config).await,
        Commands::Config => cli::handle_config_validate(&config),
        Commands::Donate {
            campaign_id,
            amount,
        } => {
            let pool = db::create_pool(&config).await?;
            cli::handle_donate(&pool, &config, campaign_id, &amount).await
        }
    }
}
