// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Server entry point and developer utilities.
//!
//! ```bash
//! # Generate a signing secret
//! stateless-auth-server keygen
//!
//! # Hash a password for the users file
//! stateless-auth-server hash-password user123
//!
//! # Run the server
//! JWT_SECRET=base64:... JWT_EXPIRATION_SECS=3600 USERS_FILE=users.json stateless-auth-server
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use stateless_auth_server::api::router;
use stateless_auth_server::auth::TokenService;
use stateless_auth_server::config::{AppConfig, LogFormat, SigningSecret, DEFAULT_LOG_FILTER};
use stateless_auth_server::credentials::{hash_password, InMemoryUserStore, StoreCredentialVerifier};
use stateless_auth_server::state::AppState;

#[derive(Parser)]
#[command(name = "stateless-auth-server")]
#[command(about = "Password login and stateless bearer-token authentication", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Print a random 256-bit signing secret in JWT_SECRET format
    Keygen,

    /// Hash a password and print the credential entry for the users file
    HashPassword {
        /// Plaintext password
        password: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve().await,
        Commands::Keygen => keygen(),
        Commands::HashPassword { password } => print_password_hash(&password),
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

async fn serve() -> ExitCode {
    init_tracing(LogFormat::from_env());

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration, refusing to start");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Server failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = match &config.users_file {
        Some(path) => InMemoryUserStore::load(path)?,
        None => {
            warn!("USERS_FILE is not set; every login will be rejected");
            InMemoryUserStore::new()
        }
    };
    info!(users = store.len(), "User store loaded");

    let verifier = StoreCredentialVerifier::new(store)?;
    let tokens = TokenService::new(&config.token);
    let app = router(AppState::new(tokens, Arc::new(verifier)));

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        %addr,
        token_lifetime_secs = config.token.lifetime_secs,
        "Auth server listening (docs at /docs)"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Auth server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn keygen() -> ExitCode {
    match SigningSecret::generate() {
        Ok(secret) => {
            println!("{}", secret.to_env_value());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn print_password_hash(password: &str) -> ExitCode {
    let credential = match hash_password(password) {
        Ok(credential) => credential,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    match serde_json::to_string_pretty(&credential) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
