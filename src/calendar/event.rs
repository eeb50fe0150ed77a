use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::recurrence::{RecurrencePolicy, RecurrenceRule, ValidationError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
pub const DEFAULT_COLOR: &str = "#3b82f6";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("Event title must not be empty")]
    EmptyTitle,
    #[error("Event ends on {end} which is before it starts on {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("Event ends at {end} which is before it starts at {start}")]
    EndTimeBeforeStartTime { start: NaiveTime, end: NaiveTime },
    #[error("Event needs both a start and an end time, or neither")]
    IncompleteTimeRange,
    #[error("Event is marked recurring but has no recurrence rule")]
    MissingRecurrence,
    #[error("Event has a recurrence rule but is not marked recurring")]
    UnexpectedRecurrence,
    #[error("Invalid recurrence: {0}")]
    Recurrence(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EventRecord", into = "EventRecord")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub color: String,
    pub category: Option<String>,
    pub recurrence: Option<RecurrenceRule>,
}

impl Event {
    pub fn new(id: impl Into<String>, title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            start_date: date,
            end_date: date,
            start_time: None,
            end_time: None,
            color: DEFAULT_COLOR.to_string(),
            category: None,
            recurrence: None,
        }
    }

    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    pub fn ending_on(mut self, end_date: NaiveDate) -> Self {
        self.end_date = end_date;
        self
    }

    pub fn repeating(mut self, rule: RecurrenceRule) -> Self {
        self.recurrence = Some(rule);
        self
    }

    pub fn is_recurring(&self) -> bool {
        self.recurrence.is_some()
    }

    pub fn is_all_day(&self) -> bool {
        self.start_time.is_none() && self.end_time.is_none()
    }

    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn time_label(&self) -> String {
        self.time_label_with(TIME_FORMAT)
    }

    /// Like `time_label` with a caller-chosen strftime pattern for the clock.
    pub fn time_label_with(&self, clock_format: &str) -> String {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => format!("{}-{}", start.format(clock_format), end.format(clock_format)),
            (Some(start), None) => start.format(clock_format).to_string(),
            _ => "All Day".to_string(),
        }
    }

    /// Checks the whole event and returns it with its recurrence rule
    /// normalized.
    pub fn validated(mut self, policy: &RecurrencePolicy) -> Result<Self, EventError> {
        if self.title.trim().is_empty() {
            return Err(EventError::EmptyTitle);
        }

        if self.end_date < self.start_date {
            return Err(EventError::EndBeforeStart { start: self.start_date, end: self.end_date });
        }

        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) if self.start_date == self.end_date && end < start => {
                return Err(EventError::EndTimeBeforeStartTime { start, end });
            }
            (Some(_), None) | (None, Some(_)) => return Err(EventError::IncompleteTimeRange),
            _ => {}
        }

        if let Some(rule) = &self.recurrence {
            self.recurrence = Some(policy.validate(rule, self.start_date)?);
        }

        Ok(self)
    }
}

/// Wire shape of an event, matching the form data of the web calendar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventRecord {
    id: String,
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    start_date: NaiveDate,
    end_date: NaiveDate,
    #[serde(default, with = "optional_time", skip_serializing_if = "Option::is_none")]
    start_time: Option<NaiveTime>,
    #[serde(default, with = "optional_time", skip_serializing_if = "Option::is_none")]
    end_time: Option<NaiveTime>,
    #[serde(default = "default_color")]
    color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    #[serde(default)]
    is_recurring: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recurrence: Option<RecurrenceRule>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<EventRecord> for Event {
    type Error = EventError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        let recurrence = match (record.is_recurring, record.recurrence) {
            (true, Some(rule)) => Some(rule),
            (true, None) => return Err(EventError::MissingRecurrence),
            (false, Some(_)) => return Err(EventError::UnexpectedRecurrence),
            (false, None) => None,
        };

        Ok(Self {
            id: record.id,
            title: record.title,
            description: non_empty(record.description),
            start_date: record.start_date,
            end_date: record.end_date,
            start_time: record.start_time,
            end_time: record.end_time,
            color: record.color,
            category: non_empty(record.category),
            recurrence,
        })
    }
}

impl From<Event> for EventRecord {
    fn from(event: Event) -> Self {
        Self {
            is_recurring: event.recurrence.is_some(),
            id: event.id,
            title: event.title,
            description: event.description,
            start_date: event.start_date,
            end_date: event.end_date,
            start_time: event.start_time,
            end_time: event.end_time,
            color: event.color,
            category: event.category,
            recurrence: event.recurrence,
        }
    }
}

pub fn parse_time(value: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
}

mod optional_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{parse_time, TIME_FORMAT};

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_str(&t.format(TIME_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        let value: Option<String> = Option::deserialize(deserializer)?;
        value
            .filter(|s| !s.is_empty())
            .map(|s| parse_time(&s).map_err(|e| serde::de::Error::custom(format!("invalid time '{}': {}", s, e))))
            .transpose()
    }
}
