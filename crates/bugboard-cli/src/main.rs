//! Bugboard CLI: the `bugboard` command.

mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use support::Session;

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let session = Session::open_or_exit(cli.config, cli.acting_as);

    match cli.command {
        Commands::Init { empty, json } => commands::init::run(&session, empty, json),

        Commands::Bug { command } => commands::bug::run(&session, command),

        Commands::Board {
            search,
            severity,
            json,
        } => commands::board::run(&session, search, severity, json),

        Commands::Dashboard { json } => commands::dashboard::run(&session, json),

        Commands::Analytics { json } => commands::analytics::run(&session, json),

        Commands::User { command } => commands::user::run(&session, command),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    // RUST_LOG sets the baseline; an explicit -v overrides its default level
    let filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    let filter = if verbosity > 0 {
        filter.add_directive(level.into())
    } else {
        filter
    };

    // stdout is reserved for command output (and `--json` payloads)
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}
