use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use subgate::config::Config;
use subgate::db::{AppState, open_pool, queries};
use subgate::models::AdminRole;
use subgate::{crypto, handlers};

#[derive(Parser)]
#[command(name = "subgate", about = "Subscription and receipt lifecycle server")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// One-time setup: create an administrator account.
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
        /// "admin" or "super_admin"
        #[arg(long, default_value = "admin")]
        role: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::CreateAdmin {
            email,
            name,
            password,
            role,
        } => create_admin(&config, &email, &name, &password, &role),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    bootstrap_admin(&state, &config)?;

    let app = handlers::router(state, &config);
    let listener = tokio::net::TcpListener::bind(config.addr())
        .await
        .with_context(|| format!("failed to bind {}", config.addr()))?;

    tracing::info!("listening on {}", config.addr());
    if config.dev_mode {
        tracing::warn!("dev mode enabled: /dev routes are mounted");
    }

    axum::serve(listener, app).await?;
    Ok(())
}

fn create_admin(
    config: &Config,
    email: &str,
    name: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<()> {
    let role: AdminRole = role
        .parse()
        .map_err(|_| anyhow::anyhow!("role must be \"admin\" or \"super_admin\""))?;

    let pool = open_pool(&config.database_path)?;
    let conn = pool.get()?;
    let admin = queries::create_admin(&conn, email, name, &crypto::hash_password(password), role)?;

    println!("Created {} {} ({})", admin.role.as_ref(), admin.email, admin.id);
    Ok(())
}

/// Seed a super_admin from the environment when the admins table is empty,
/// so a fresh deployment is reachable without shell access.
fn bootstrap_admin(state: &AppState, config: &Config) -> anyhow::Result<()> {
    let (Some(email), Some(password)) = (
        config.bootstrap_admin_email.as_deref(),
        config.bootstrap_admin_password.as_deref(),
    ) else {
        return Ok(());
    };

    let conn = state.db.get()?;
    if queries::count_admins(&conn)? > 0 {
        return Ok(());
    }

    let admin = queries::create_admin(
        &conn,
        email,
        "Bootstrap Admin",
        &crypto::hash_password(password),
        AdminRole::SuperAdmin,
    )?;
    tracing::info!("bootstrapped super_admin {} ({})", admin.email, admin.id);
    Ok(())
}
