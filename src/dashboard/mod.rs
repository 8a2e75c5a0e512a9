//! fleetdash Terminal User Interface (TUI)
//!
//! One home screen plus a management screen per entity type. Each management
//! screen shows the loaded records in a sortable, filterable grid next to a
//! validated create/edit form.

pub mod app;
pub mod components;
pub mod events;
pub mod screens;
pub mod traits;
pub mod ui;

use std::io;
use std::sync::Arc;

use anyhow::{Context, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info, warn};

pub use app::{App, Screen};

use crate::api::{ApiClient, BearerTokenSigner};
use crate::config::Config;
use crate::session::SessionStore;

/// Set up the terminal, run the dashboard until the user quits, then restore the terminal
pub fn run(config: Config) -> Result<()> {
    let session = SessionStore::new(config.session_file.clone());
    let logged_in = match session.load_token() {
        Ok(token) => token.is_some(),
        Err(e) => {
            warn!("Could not read session: {}", e);
            false
        }
    };
    let api = ApiClient::new(&config.api, Arc::new(BearerTokenSigner::new(session)))
        .context("Failed to create HTTP client")?;

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, api);
    if !logged_in {
        app.status
            .set_error("Not logged in: run 'fleetdash login --token <TOKEN>'".to_string());
    }

    info!("Starting dashboard against {}", app.config.api.base_url);
    let result = app.run(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match &result {
        Ok(()) => info!("Dashboard exited"),
        Err(e) => error!("Dashboard encountered an error: {}", e),
    }
    result
}
