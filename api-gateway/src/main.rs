//! API Gateway for the cooperative account service

use account_service::{AccountService, AccountServiceConfig};
use api_gateway::{config::AppConfig, router, AppState};
use clap::Parser;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};

/// Cooperative accounts API server
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Listening address (defaults to API_ADDR or 127.0.0.1:3000)
    #[clap(short, long)]
    addr: Option<String>,

    /// Database URL (defaults to DATABASE_URL)
    #[clap(short, long)]
    database_url: Option<String>,

    /// Keep accounts in memory instead of PostgreSQL
    #[clap(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging with debug level when DEBUG=1 env var is set
    let env = std::env::var("DEBUG").unwrap_or_else(|_| "0".to_string());
    let log_level = if env == "1" { Level::DEBUG } else { Level::INFO };

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(FmtSpan::CLOSE)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Debug logging enabled");

    // Resolve configuration: CLI flags override the environment
    let mut config = AppConfig::new();
    if let Some(addr) = args.addr {
        config.addr = addr;
    }
    if args.database_url.is_some() {
        config.database_url = args.database_url;
    }
    config.in_memory |= args.in_memory;

    // Initialize services
    let account_service = if config.in_memory {
        info!("Using in-memory account repository");
        AccountService::new()
    } else {
        let mut service_config = AccountServiceConfig::from_env();
        if let Some(url) = config.database_url.clone() {
            service_config.database_url = url;
        }
        AccountService::with_config(&service_config).await?
    };

    let app = router(AppState::new(account_service), log_level);

    // Start the server
    let addr: std::net::SocketAddr = config.addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);
    info!("Account form available at http://{}/", addr);
    info!("Swagger UI available at http://{}/swagger-ui", addr);

    // Run until interrupt signal
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
