//! bulkwaste: bulk-waste disposal fee lookup
//!
//! Usage:
//!   bulkwaste                         - Open the search window
//!   bulkwaste search <query> [--sido S] [--sigungu G]
//!   bulkwaste locations [--sido S]    - List provinces, or the cities of one
//!   bulkwaste status                  - Check the search backend

mod app;
mod backend;
mod config;
mod format;
mod location;
mod session;
mod ui;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use iced::{window, Size};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::BulkWaste;
use backend::api::BackendClient;
use config::{Overrides, Settings};
use location::LocationFilter;
use session::{SearchSession, Submission};

#[derive(Debug, Parser)]
#[command(name = "bulkwaste", version, about = "Bulk-waste disposal fee search")]
struct Cli {
    /// JSON config file (defaults to <config_dir>/bulkwaste/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the search backend
    #[arg(long, global = true, env = "BULKWASTE_API_BASE")]
    api_base: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "BULKWASTE_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open the search window (default)
    Gui,
    /// Run one search and print the ranked results
    Search {
        query: String,
        #[arg(long)]
        sido: Option<String>,
        /// City within `--sido`
        #[arg(long, requires = "sido")]
        sigungu: Option<String>,
    },
    /// List provinces, or the cities of one province
    Locations {
        #[arg(long)]
        sido: Option<String>,
    },
    /// Check if the backend is up
    Status,
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let cli = Cli::parse();
    let settings = Settings::resolve(&Overrides {
        config: cli.config,
        api_base: cli.api_base,
        timeout_secs: cli.timeout_secs,
    })?;
    let backend = BackendClient::new(&settings.api_base, settings.timeout)?;
    tracing::info!("Using search backend at {}", backend.base_url());

    match cli.command.unwrap_or(Command::Gui) {
        Command::Gui => start_gui(backend),
        Command::Search { query, sido, sigungu } => {
            let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
            rt.block_on(run_search(&backend, query, sido, sigungu))
        }
        Command::Locations { sido } => {
            let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
            rt.block_on(list_locations(&backend, sido))
        }
        Command::Status => {
            let rt = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
            rt.block_on(async {
                let health = backend.health_check().await.context("Backend unreachable")?;
                println!("{}: {}", health.status, health.message);
                Ok::<_, anyhow::Error>(())
            })
        }
    }
}

fn start_gui(backend: BackendClient) -> Result<()> {
    tracing::info!("Starting search window...");

    iced::application(app::TITLE, BulkWaste::update, BulkWaste::view)
        .subscription(BulkWaste::subscription)
        .theme(BulkWaste::theme)
        .window(window::Settings {
            size: Size::new(720.0, 640.0),
            position: window::Position::Centered,
            resizable: true,
            ..Default::default()
        })
        .antialiasing(true)
        .run_with(move || BulkWaste::new(backend))?;

    Ok(())
}

/// One pass through the search session, printed instead of rendered
async fn run_search(
    backend: &BackendClient,
    query: String,
    sido: Option<String>,
    sigungu: Option<String>,
) -> Result<()> {
    let mut filter = LocationFilter::new();
    if let Some(sido) = sido {
        filter.select_province(sido);
    }
    if let Some(sigungu) = sigungu {
        filter.apply_loaded(backend.locations().await);
        if let Some(message) = filter.load_error() {
            bail!(message);
        }
        filter.select_city(sigungu);
        if !filter.city_is_listed() {
            bail!(
                "{} is not a city of {}",
                filter.selected_sigungu(),
                filter.selected_sido()
            );
        }
    }

    let mut session = SearchSession::new();
    session.set_query(query);

    if let Submission::Dispatch { id, query } =
        session.submit(filter.selected_sido(), filter.selected_sigungu())
    {
        let outcome = backend.search(&query).await;
        session.complete(id, outcome);
    }

    if let Some(message) = session.error() {
        bail!(message);
    }
    if session.is_empty_result() {
        println!("{}", session::EMPTY_RESULT);
        return Ok(());
    }
    for item in session.results() {
        println!("{}", format::result_line(item));
    }
    Ok(())
}

async fn list_locations(backend: &BackendClient, sido: Option<String>) -> Result<()> {
    let mut filter = LocationFilter::new();
    filter.apply_loaded(backend.locations().await);
    if let Some(message) = filter.load_error() {
        bail!(message);
    }

    let names = match sido {
        Some(sido) => {
            filter.select_province(sido);
            filter.available_cities()
        }
        None => filter.provinces(),
    };
    for name in names {
        println!("{}", name);
    }
    Ok(())
}
