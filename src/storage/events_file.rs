use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::calendar::{Event, EventError, RecurrencePolicy};

#[derive(Debug, Error)]
pub enum EventsFileError {
    #[error("Failed to read events file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse events file: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Event '{id}' is invalid: {source}")]
    Invalid {
        id: String,
        #[source]
        source: EventError,
    },
    #[error("Event id '{id}' appears more than once")]
    DuplicateId { id: String },
}

/// Reads a JSON array of events and validates each one under `policy`.
/// One bad event or a repeated id fails the whole import.
pub fn load_events(path: &Path, policy: &RecurrencePolicy) -> Result<Vec<Event>, EventsFileError> {
    let content = std::fs::read_to_string(path)?;
    parse_events(&content, policy)
}

pub fn parse_events(content: &str, policy: &RecurrencePolicy) -> Result<Vec<Event>, EventsFileError> {
    let events: Vec<Event> = serde_json::from_str(content)?;

    let mut seen = HashSet::new();
    if let Some(event) = events.iter().find(|event| !seen.insert(event.id.as_str())) {
        return Err(EventsFileError::DuplicateId { id: event.id.clone() });
    }

    let events = events
        .into_iter()
        .map(|event| {
            let id = event.id.clone();
            event
                .validated(policy)
                .map_err(|source| EventsFileError::Invalid { id, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    tracing::info!("Loaded {} events", events.len());
    Ok(events)
}

pub fn save_events(path: &Path, events: &[Event]) -> Result<(), EventsFileError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(events)?;
    std::fs::write(path, content)?;
    Ok(())
}
