use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::app::{app, build_stores, AppState};
use crate::auth::TokenService;
use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "company-employees-api")]
#[command(about = "Companies and employees REST API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Listen port, overrides API_PORT")]
        port: Option<u16>,
    },

    #[command(about = "Mint an access token signed with the configured secret")]
    Token {
        #[arg(help = "Token subject")]
        subject: String,

        #[arg(long = "role", help = "Role claim, repeatable")]
        roles: Vec<String>,
    },
}

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Token { subject, roles } => {
            let tokens = TokenService::new(&config.security).context("cannot sign tokens")?;
            println!("{}", tokens.issue(&subject, &roles)?);
            Ok(())
        }
    }
}

async fn serve(config: &AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    let stores = build_stores(&config.database).await.context("failed to open store")?;
    let state = AppState::new(stores, config).context("invalid security configuration")?;
    let router = app(state, &config.security);

    let bind_addr = format!("0.0.0.0:{}", port.unwrap_or(config.api.port));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Company Employees API listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
