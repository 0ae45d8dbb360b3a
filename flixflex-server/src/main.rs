use std::sync::Arc;

use anyhow::Context;
use clap::{Args as ClapArgs, Parser, Subcommand};
use flixflex_core::{
    AuthCrypto, InMemoryDatabase, MetadataProvider, PostgresDatabase, TmdbProvider,
};
use flixflex_server::{AppState, create_app, infra::config::Config};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI entry point
#[derive(Parser, Debug)]
#[command(name = "flixflex-server")]
#[command(about = "Movie and series API over a cached TMDB proxy")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    serve: ServeArgs,
}

#[derive(ClapArgs, Debug, Clone)]
struct ServeArgs {
    /// Server port (overrides config)
    #[arg(short, long, env = "SERVER_PORT")]
    port: Option<u16>,

    /// Server host (overrides config)
    #[arg(long, env = "SERVER_HOST")]
    host: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(subcommand)]
    Db(DbCommand),
}

#[derive(Debug, Subcommand)]
enum DbCommand {
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::from_env().context("failed to load configuration")?;
    if let Some(port) = cli.serve.port {
        config.server_port = port;
    }
    if let Some(host) = cli.serve.host.clone() {
        config.server_host = host;
    }

    match cli.command {
        Some(Command::Db(DbCommand::Migrate)) => run_db_migrate(&config).await,
        None => run_server(config).await,
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn run_db_migrate(config: &Config) -> anyhow::Result<()> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set to run migrations")?;
    let pg = PostgresDatabase::connect(database_url)
        .await
        .context("failed to connect to PostgreSQL for migration")?;
    pg.migrate().await.context("database migration failed")?;
    info!("Database migrations applied successfully");
    Ok(())
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let provider = build_provider(&config)?;
    let auth_crypto = AuthCrypto::new(&config.auth_password_pepper)
        .context("failed to initialise password hashing")?;
    if config.auth_password_pepper.is_empty() {
        warn!("AUTH_PASSWORD_PEPPER is not set; password hashes are unpeppered");
    }

    let state = match config.database_url.clone() {
        Some(database_url) => {
            let pg = PostgresDatabase::connect(&database_url)
                .await
                .context("failed to connect to PostgreSQL")?;
            pg.migrate().await.context("database migration failed")?;
            AppState::new(config, provider, Arc::new(pg), auth_crypto)
        }
        None => {
            warn!("DATABASE_URL is not set; using the in-memory store, nothing will persist");
            AppState::new(config, provider, Arc::new(InMemoryDatabase::new()), auth_crypto)
        }
    };

    let addr = state.config().bind_address();
    let cache_writer = state.proxy.cache_writer().clone();
    let router = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Starting FlixFlex API on {addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(in_flight = cache_writer.in_flight(), "draining cache writes");
    cache_writer.drain().await;
    info!("Server stopped");
    Ok(())
}

fn build_provider(config: &Config) -> anyhow::Result<Arc<dyn MetadataProvider>> {
    let token = config.tmdb_api_token.clone().unwrap_or_else(|| {
        warn!("TMDB_API_TOKEN is not set; upstream requests will be rejected");
        String::new()
    });
    let provider = TmdbProvider::with_base_url(token, &config.tmdb_base_url)
        .context("invalid TMDB_BASE_URL")?;
    Ok(Arc::new(provider))
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
