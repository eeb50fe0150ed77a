use std::io;

mod cli;
use cli::{CliMode, USAGE, load_event_source, parse_cli_mode, run_agenda_mode};
mod tui;
use tui::run_tui;

use calgrid::storage::config::Config;

fn main() -> Result<(), io::Error> {
    setup_logging();

    let cli_mode = match parse_cli_mode() {
        Ok(mode) => mode,
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{}", USAGE);
            return Ok(());
        }
    };

    if cli_mode == CliMode::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = match Config::load_or_create() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}", e);
            tracing::error!("Failed to load config: {}", e);
            return Err(io::Error::other(e.to_string()));
        }
    };

    match cli_mode {
        CliMode::Help => Ok(()),
        CliMode::Agenda { date, sample, events_file } => {
            let source = load_source(&config, sample, events_file)?;
            run_agenda_mode(&config, date, source)
        }
        CliMode::Default { sample, events_file } => {
            let source = load_source(&config, sample, events_file)?;
            run_tui(&config, source)
        }
    }
}

fn load_source(
    config: &Config,
    sample: bool,
    events_file: Option<std::path::PathBuf>,
) -> Result<tui::EventSource, io::Error> {
    load_event_source(config, sample, events_file).inspect_err(|e| {
        eprintln!("Failed to load events: {}", e);
        tracing::error!("Failed to load events: {}", e);
    })
}

fn setup_logging() {
    let log_dir = Config::config_dir();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "calgrid.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("calgrid started");
}
