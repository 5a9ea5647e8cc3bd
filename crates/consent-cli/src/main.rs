mod commands;
mod logging;
mod session;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "consent", about = "Cookie consent controller", version)]
struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Directory holding the consent storage (default: ./.consent)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Deployment app id; the record is stored as cookie_consent_<app-id>
    #[arg(long, global = true)]
    app_id: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the stored decision and show what a visitor would see
    Status,

    /// Accept all cookie categories (banner "accept all")
    AcceptAll,

    /// Open the settings panel, set the analytics toggle and save
    Configure {
        /// Allow analytics cookies
        #[arg(long, action = clap::ArgAction::Set)]
        analytics: bool,
    },

    /// List cookie categories and whether each is currently allowed
    Categories,

    /// Forget the stored decision
    Reset,
}

fn main() {
    logging::init_tracing();
    let cli = Cli::parse();
    let opts = session::Options {
        store: cli.store,
        app_id: cli.app_id,
    };

    let result = match cli.command {
        Commands::Status => commands::status::run(&opts, cli.json),
        Commands::AcceptAll => commands::accept::run(&opts, cli.json),
        Commands::Configure { analytics } => commands::configure::run(&opts, analytics, cli.json),
        Commands::Categories => commands::categories::run(&opts, cli.json),
        Commands::Reset => commands::reset::run(&opts),
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}
