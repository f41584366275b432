use account_service::{AccountService, AccountServiceConfig};
use clap::{Parser, Subcommand};
use common::db;
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Account Service CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set the log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Database URL (falls back to DATABASE_URL)
    #[arg(short, long, global = true)]
    database_url: Option<String>,

    /// Database pool size
    #[arg(short, long, global = true)]
    pool_size: Option<u32>,

    /// Commands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Print open accounts, or every active account of one owner, as JSON lines
    List {
        /// Owner reference
        #[arg(short, long)]
        owner: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    // Parse command line arguments
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("account_service={},common={}", cli.log_level, cli.log_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = AccountServiceConfig::from_env();
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }
    if let Some(pool_size) = cli.pool_size {
        config.db_pool_size = pool_size;
    }

    match cli.command {
        Commands::Migrate => {
            let pool = db::connect(&config.database_url, config.db_pool_size).await?;
            db::run_migrations(&pool).await?;
            info!("Migrations complete");
        }
        Commands::List { owner } => {
            config.run_migrations = false;
            let service = AccountService::with_config(&config).await?;

            let accounts = match owner {
                Some(owner) => service.list_accounts_by_owner(&owner).await?,
                None => service.list_accounts().await?,
            };

            info!("Found {} accounts", accounts.len());
            for account in accounts {
                println!("{}", serde_json::to_string(&account)?);
            }
        }
    }

    Ok(())
}
