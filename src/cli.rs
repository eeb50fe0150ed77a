use std::{
    collections::HashSet,
    env,
    io::{self, Write},
    path::PathBuf,
    process::{Command, Stdio},
};

use chrono::{Local, NaiveDate};

use calgrid::{
    calendar::{Event, OccurrenceMatcher},
    storage::{config::Config, events_file},
};

use crate::tui::{sample_events, EventSource};

pub const USAGE: &str = "Usage: calgrid [--agenda [YYYY/MM/DD]] [--events FILE] [--sample]";

#[derive(Debug, Clone, PartialEq)]
pub enum CliMode {
    Default { sample: bool, events_file: Option<PathBuf> },
    Agenda { date: NaiveDate, sample: bool, events_file: Option<PathBuf> },
    Help,
}

pub fn parse_cli_mode() -> Result<CliMode, String> {
    parse_args(env::args().skip(1), Local::now().date_naive())
}

pub fn parse_args(args: impl IntoIterator<Item = String>, today: NaiveDate) -> Result<CliMode, String> {
    let mut sample = false;
    let mut agenda_date = None;
    let mut events_file = None;
    let mut args = args.into_iter().peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sample" => {
                sample = true;
            }
            "--events" => {
                let path = args.next().ok_or_else(|| "--events requires a file path".to_string())?;
                events_file = Some(PathBuf::from(path));
            }
            "--agenda" => {
                let target_date = match args.next_if(|next| !next.starts_with("--")) {
                    Some(date_str) => NaiveDate::parse_from_str(&date_str, "%Y/%m/%d")
                        .map_err(|_| format!("Invalid date '{}'. Use YYYY/MM/DD.", date_str))?,
                    None => today,
                };
                agenda_date = Some(target_date);
            }
            "--help" | "-h" => return Ok(CliMode::Help),
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    if let Some(date) = agenda_date {
        Ok(CliMode::Agenda { date, sample, events_file })
    } else {
        Ok(CliMode::Default { sample, events_file })
    }
}

/// Events for this run: the file from the command line, else the configured
/// one, plus demo data when asked for. Demo events are tagged so the session
/// never writes them back to the file.
pub fn load_event_source(
    config: &Config,
    sample: bool,
    file_override: Option<PathBuf>,
) -> Result<EventSource, io::Error> {
    let file = file_override.or_else(|| config.events.file.clone());

    let mut events = match &file {
        Some(path) if path.exists() => events_file::load_events(path, &config.policy())
            .map_err(|e| io::Error::other(format!("{}: {}", path.display(), e)))?,
        Some(path) => {
            tracing::info!("Events file {} does not exist yet", path.display());
            Vec::new()
        }
        None => Vec::new(),
    };

    let mut sample_ids = HashSet::new();
    if sample {
        for event in sample_events() {
            if events.iter().any(|existing| existing.id == event.id) {
                tracing::warn!("Skipping sample event '{}': id already in use", event.id);
                continue;
            }
            sample_ids.insert(event.id.clone());
            events.push(event);
        }
    }

    Ok(EventSource { events, file, sample_ids })
}

pub fn run_agenda_mode(config: &Config, date: NaiveDate, source: EventSource) -> Result<(), io::Error> {
    let matcher = OccurrenceMatcher::new(config.policy());
    let events = matcher.events_on_date(&source.events, date);

    tracing::info!("Agenda for {}: {} events", date, events.len());
    let agenda = format_agenda_text(date, &events, config.clock_format());
    display_with_pager(&agenda)
}

fn format_agenda_text(date: NaiveDate, events: &[&Event], clock_format: &str) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Agenda – {}", date.format("%A, %B %d, %Y")));
    lines.push(String::new());

    if events.is_empty() {
        lines.push("No events scheduled.".to_string());
    } else {
        for event in events {
            lines.push(format!("- {}", build_agenda_line(event, clock_format, usize::MAX)));
        }
    }

    lines.join("\n")
}

fn build_agenda_line(event: &Event, clock_format: &str, width: usize) -> String {
    let time_label = event.time_label_with(clock_format);

    let mut line = format!("{:<19} {}", time_label, event.title);
    if let Some(rule) = &event.recurrence {
        line.push_str(&format!(" ({})", rule.summary()));
    }
    if let Some(category) = &event.category {
        line.push_str(&format!(" #{}", category));
    }
    truncate_to_width(&line, width)
}

fn truncate_to_width(line: &str, width: usize) -> String {
    if width > 0 && line.chars().count() > width {
        let mut truncated = line.chars().take(width.saturating_sub(1)).collect::<String>();
        truncated.push('…');
        truncated
    } else {
        line.to_string()
    }
}

fn display_with_pager(text: &str) -> Result<(), io::Error> {
    let pager_value = env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut parts = pager_value.split_whitespace();
    let cmd = match parts.next() {
        Some(c) => c,
        None => {
            print!("{text}");
            return Ok(());
        }
    };
    let args: Vec<&str> = parts.collect();

    match Command::new(cmd)
        .args(&args)
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }
            let _ = child.wait();
        }
        Err(_) => {
            print!("{text}");
        }
    }

    Ok(())
}
