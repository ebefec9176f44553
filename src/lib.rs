//! MediFlow: a terminal client for the MediFlow patient-records API.
//!
//! The core is transport-agnostic: [`app::App`] owns the view state machine,
//! [`api::MediFlowClient`] speaks to the REST service, and [`view`] renders
//! snapshots as text. [`shell`] is the interactive front-end the binary runs.

pub mod api;
pub mod app;
pub mod config;
pub mod forms;
pub mod models;
pub mod notify;
pub mod shell;
pub mod view;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::api::PatientApi;

/// Command-line options for the `mediflow` binary.
#[derive(Debug, Parser)]
#[command(
    name = "mediflow",
    version,
    about = "Terminal client for the MediFlow patient-records API"
)]
pub struct Cli {
    /// Base URL of the MediFlow API (overrides MEDIFLOW_API_URL).
    #[arg(long)]
    pub api_url: Option<String>,

    /// Tracing filter, e.g. "mediflow=debug" (overrides RUST_LOG).
    #[arg(long)]
    pub log_filter: Option<String>,
}

pub async fn run() {
    run_with(Cli::parse()).await;
}

pub async fn run_with(cli: Cli) {
    // Initialize tracing
    let filter = match cli.log_filter {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let base_url = cli.api_url.unwrap_or_else(config::api_base_url);
    let client = Arc::new(api::MediFlowClient::new(&base_url));

    // Startup connectivity report; the list view repeats any failure inline.
    match client.health_check().await {
        Ok(health) => {
            tracing::info!(message = %health.message, base_url = %base_url, "API reachable");
        }
        Err(e) => {
            tracing::warn!(error = %e, base_url = %base_url, "API not reachable");
        }
    }

    let app = Arc::new(app::App::new(client, Arc::new(shell::ConsoleSink)));
    let mut shell = shell::Shell::new(app);
    if let Err(e) = shell.run().await {
        tracing::error!(error = %e, "Shell terminated with an I/O error");
    }
}
