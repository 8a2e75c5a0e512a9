use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

mod cli;

use cli::{Cli, Commands, ResourceKind};
use fleetdash::{
    api::{ApiClient, BearerTokenSigner, Resource, ResourceClient},
    config::Config,
    dashboard,
    entities::{Drivers, Entity, Trips, Vehicles},
    listing,
    session::SessionStore,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);

    let config = Config::from_env()?;
    init_logging(&config.log_file, matches!(command, Commands::Tui));
    config.validate()?;

    let session = SessionStore::new(config.session_file.clone());

    match command {
        Commands::Tui => {
            info!("Launching dashboard");
            if let Err(e) = dashboard::run(config) {
                error!("Dashboard failed: {:#}", e);
                return Err(e);
            }
        }

        Commands::List {
            resource,
            sort,
            filter,
        } => {
            let api = ApiClient::new(&config.api, Arc::new(BearerTokenSigner::new(session)))?;
            let sort = sort.as_deref();
            match resource {
                ResourceKind::Vehicles => list_records::<Vehicles>(api, sort, &filter).await?,
                ResourceKind::Drivers => list_records::<Drivers>(api, sort, &filter).await?,
                ResourceKind::Trips => list_records::<Trips>(api, sort, &filter).await?,
            }
        }

        Commands::Login { token } => {
            session.save_token(&token)?;
            println!("Session token saved to {}", session.path().display());
        }

        Commands::Logout => {
            session.clear()?;
            println!("Logged out");
        }
    }

    Ok(())
}

/// Fetch one collection and print it through the same sort/filter engine as the grid
async fn list_records<E: Entity>(api: ApiClient, sort: Option<&str>, filters: &[String]) -> Result<()> {
    let columns = E::columns();
    let view = listing::build_view(&columns, sort, filters)?;

    let records = ResourceClient::<E>::new(api)
        .list()
        .await
        .with_context(|| format!("Failed to fetch {}", E::PLURAL.to_lowercase()))?;
    info!("Fetched {} {}", records.len(), E::PLURAL.to_lowercase());

    let rows = view.rows(&columns, &records);
    print!("{}", listing::render_table(&columns, &rows));
    println!();
    println!("Showing {} of {} {}", rows.len(), records.len(), E::PLURAL.to_lowercase());
    Ok(())
}

/// Log to stderr and the log file; the dashboard logs to the file only so the screen stays intact
fn init_logging(log_file: &Path, tui: bool) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "fleetdash=info");
    }

    let directory = log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = log_file
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "fleetdash.log".into());
    let file_appender = tracing_appender::rolling::never(directory, file_name);

    let stderr_layer = (!tui).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::from_default_env())
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_filter(EnvFilter::from_default_env()),
        )
        .init();
}
