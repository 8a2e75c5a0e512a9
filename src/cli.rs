use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "fleetdash")]
#[command(about = "Terminal admin dashboard for managing fleet vehicles, drivers and trips")]
#[command(version)]
pub struct Cli {
    /// Defaults to the interactive dashboard
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive dashboard
    Tui,

    /// Print one entity collection as a table and exit
    List {
        /// Which collection to fetch
        #[arg(value_enum)]
        resource: ResourceKind,

        /// Sort column, optionally with direction (e.g. vehicleName:desc)
        #[arg(short, long)]
        sort: Option<String>,

        /// Case-insensitive substring filter, repeatable (e.g. status=planned)
        #[arg(short, long)]
        filter: Vec<String>,
    },

    /// Store the session token used for every request
    Login {
        /// Bearer token issued by the backend
        #[arg(short, long)]
        token: String,
    },

    /// Remove the stored session token
    Logout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResourceKind {
    Vehicles,
    Drivers,
    Trips,
}
