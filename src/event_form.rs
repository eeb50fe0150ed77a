use std::collections::BTreeSet;
use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use thiserror::Error;

use crate::calendar::event::{parse_time, DATE_FORMAT, DEFAULT_COLOR, TIME_FORMAT};
use crate::calendar::recurrence::{weekday_index, RecurrenceRule, RecurrenceType, SATURDAY};
use crate::calendar::{Event, EventError, RecurrencePolicy};

const DEFAULT_START: &str = "09:00";
const DEFAULT_END: &str = "10:00";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("{field} must be a date like 2025-01-31, got '{value}'")]
    InvalidDate { field: &'static str, value: String },
    #[error("{field} must be a time like 14:30, got '{value}'")]
    InvalidTime { field: &'static str, value: String },
    #[error("{field} must be a whole number, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("Color must look like #3b82f6, got '{0}'")]
    InvalidColor(String),
    #[error(transparent)]
    Event(#[from] EventError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    StartDate,
    EndDate,
    StartTime,
    EndTime,
    Color,
    Category,
    Recurring,
    RecurrenceType,
    Frequency,
    DaysOfWeek,
    RecurrenceEndDate,
    EndAfterOccurrences,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::StartDate => "Start Date",
            FormField::EndDate => "End Date",
            FormField::StartTime => "Start Time",
            FormField::EndTime => "End Time",
            FormField::Color => "Color",
            FormField::Category => "Category",
            FormField::Recurring => "Recurring",
            FormField::RecurrenceType => "Repeats",
            FormField::Frequency => "Every",
            FormField::DaysOfWeek => "On",
            FormField::RecurrenceEndDate => "Ends On",
            FormField::EndAfterOccurrences => "Ends After",
        }
    }

    /// Fields that only accept digits.
    pub fn is_numeric(self) -> bool {
        matches!(self, FormField::Frequency | FormField::EndAfterOccurrences)
    }
}

/// Recurrence fields as typed into the form. Parsed on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceDraft {
    pub kind: RecurrenceType,
    pub frequency_input: String,
    pub days_of_week: BTreeSet<u8>,
    pub end_date_input: String,
    pub end_after_input: String,
}

impl Default for RecurrenceDraft {
    fn default() -> Self {
        Self {
            kind: RecurrenceType::Weekly,
            frequency_input: "1".to_string(),
            days_of_week: BTreeSet::new(),
            end_date_input: String::new(),
            end_after_input: String::new(),
        }
    }
}

impl RecurrenceDraft {
    pub fn from_rule(rule: &RecurrenceRule) -> Self {
        Self {
            kind: rule.kind,
            frequency_input: rule.frequency.to_string(),
            days_of_week: rule.days_of_week.clone(),
            end_date_input: rule.end_date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default(),
            end_after_input: rule.end_after_occurrences.map(|n| n.to_string()).unwrap_or_default(),
        }
    }

    pub fn to_rule(&self) -> Result<RecurrenceRule, FormError> {
        let frequency = parse_number("Frequency", &self.frequency_input)?
            .ok_or_else(|| FormError::InvalidNumber {
                field: "Frequency",
                value: String::new(),
            })?;

        Ok(RecurrenceRule {
            kind: self.kind,
            frequency,
            days_of_week: if self.kind == RecurrenceType::Weekly {
                self.days_of_week.clone()
            } else {
                BTreeSet::new()
            },
            end_date: parse_optional_date("Recurrence end date", &self.end_date_input)?,
            end_after_occurrences: parse_number("Occurrence count", &self.end_after_input)?,
        })
    }
}

/// The draft of an event being created or edited. One per edit session;
/// committed through `AppState::submit_event_form`.
#[derive(Debug, Clone)]
pub struct EventForm {
    pub event_id: Option<String>,
    pub title: String,
    pub description: String,
    pub start_date_input: String,
    pub end_date_input: String,
    pub start_time_input: String,
    pub end_time_input: String,
    pub color: String,
    pub category: String,
    pub is_recurring: bool,
    pub recurrence: Option<RecurrenceDraft>,
    pub active_field: FormField,
    pub weekday_cursor: u8,
    pub error: Option<String>,
}

impl EventForm {
    pub fn new(date: NaiveDate, title: String) -> Self {
        let date_text = date.format(DATE_FORMAT).to_string();
        Self {
            event_id: None,
            title,
            description: String::new(),
            start_date_input: date_text.clone(),
            end_date_input: date_text,
            start_time_input: DEFAULT_START.to_string(),
            end_time_input: DEFAULT_END.to_string(),
            color: DEFAULT_COLOR.to_string(),
            category: String::new(),
            is_recurring: false,
            recurrence: None,
            active_field: FormField::Title,
            weekday_cursor: weekday_index(date),
            error: None,
        }
    }

    /// All-day draft covering `start..=end`.
    pub fn for_range(start: NaiveDate, end: NaiveDate, title: String) -> Self {
        let mut form = Self::new(start, title);
        form.end_date_input = end.format(DATE_FORMAT).to_string();
        form.start_time_input.clear();
        form.end_time_input.clear();
        form
    }

    pub fn for_event(event: &Event) -> Self {
        let format_time = |t: Option<NaiveTime>| t.map(|t| t.format(TIME_FORMAT).to_string()).unwrap_or_default();

        Self {
            event_id: Some(event.id.clone()),
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            start_date_input: event.start_date.format(DATE_FORMAT).to_string(),
            end_date_input: event.end_date.format(DATE_FORMAT).to_string(),
            start_time_input: format_time(event.start_time),
            end_time_input: format_time(event.end_time),
            color: event.color.clone(),
            category: event.category.clone().unwrap_or_default(),
            is_recurring: event.is_recurring(),
            recurrence: event.recurrence.as_ref().map(RecurrenceDraft::from_rule),
            active_field: FormField::Title,
            weekday_cursor: weekday_index(event.start_date),
            error: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.event_id.is_some()
    }

    /// Fields currently shown. Recurrence settings only appear for recurring
    /// events and the weekday picker only for weekly rules.
    pub fn visible_fields(&self) -> Vec<FormField> {
        let mut fields = vec![
            FormField::Title,
            FormField::Description,
            FormField::StartDate,
            FormField::EndDate,
            FormField::StartTime,
            FormField::EndTime,
            FormField::Color,
            FormField::Category,
            FormField::Recurring,
        ];

        if let Some(draft) = self.active_recurrence() {
            fields.push(FormField::RecurrenceType);
            fields.push(FormField::Frequency);
            if draft.kind == RecurrenceType::Weekly {
                fields.push(FormField::DaysOfWeek);
            }
            fields.push(FormField::RecurrenceEndDate);
            fields.push(FormField::EndAfterOccurrences);
        }

        fields
    }

    pub fn next_field(&mut self) {
        let fields = self.visible_fields();
        let position = fields.iter().position(|f| *f == self.active_field).unwrap_or(0);
        self.active_field = fields[(position + 1) % fields.len()];
    }

    pub fn prev_field(&mut self) {
        let fields = self.visible_fields();
        let position = fields.iter().position(|f| *f == self.active_field).unwrap_or(0);
        self.active_field = fields[(position + fields.len() - 1) % fields.len()];
    }

    /// Recurrence draft that will be submitted, if the event is recurring.
    pub fn active_recurrence(&self) -> Option<&RecurrenceDraft> {
        self.recurrence.as_ref().filter(|_| self.is_recurring)
    }

    /// Switching on attaches a weekly, every-week draft the first time;
    /// switching off keeps the draft for this session but detaches it.
    pub fn toggle_recurring(&mut self) {
        self.is_recurring = !self.is_recurring;
        if self.is_recurring && self.recurrence.is_none() {
            self.recurrence = Some(RecurrenceDraft::default());
        }
    }

    pub fn cycle_recurrence_type(&mut self, forward: bool) {
        if !self.is_recurring {
            return;
        }
        if let Some(draft) = self.recurrence.as_mut() {
            draft.kind = if forward { draft.kind.next() } else { draft.kind.prev() };
        }
    }

    pub fn toggle_weekday(&mut self, day: u8) {
        if day > SATURDAY {
            return;
        }
        if let Some(draft) = self.recurrence.as_mut() {
            if !draft.days_of_week.remove(&day) {
                draft.days_of_week.insert(day);
            }
        }
    }

    pub fn toggle_weekday_at_cursor(&mut self) {
        self.toggle_weekday(self.weekday_cursor);
    }

    pub fn move_weekday_cursor(&mut self, forward: bool) {
        self.weekday_cursor = if forward {
            (self.weekday_cursor + 1) % 7
        } else {
            (self.weekday_cursor + 6) % 7
        };
    }

    pub fn is_weekday_selected(&self, day: u8) -> bool {
        self.recurrence
            .as_ref()
            .is_some_and(|draft| draft.days_of_week.contains(&day))
    }

    /// Text buffer behind the active field, if it is a free-text field.
    pub fn active_input_mut(&mut self) -> Option<&mut String> {
        match self.active_field {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            FormField::StartDate => Some(&mut self.start_date_input),
            FormField::EndDate => Some(&mut self.end_date_input),
            FormField::StartTime => Some(&mut self.start_time_input),
            FormField::EndTime => Some(&mut self.end_time_input),
            FormField::Color => Some(&mut self.color),
            FormField::Category => Some(&mut self.category),
            FormField::Frequency => self.recurrence.as_mut().map(|d| &mut d.frequency_input),
            FormField::RecurrenceEndDate => self.recurrence.as_mut().map(|d| &mut d.end_date_input),
            FormField::EndAfterOccurrences => self.recurrence.as_mut().map(|d| &mut d.end_after_input),
            FormField::Recurring | FormField::RecurrenceType | FormField::DaysOfWeek => None,
        }
    }

    pub fn frequency_label(&self) -> String {
        let Some(draft) = self.active_recurrence() else {
            return String::new();
        };
        let count = draft.frequency_input.parse::<u32>().unwrap_or(1);
        format!("Repeat every {} {}(s)", count, draft.kind.unit())
    }

    /// Parses every buffer and validates the result.
    pub fn to_event(&self, id: String, policy: &RecurrencePolicy) -> Result<Event, FormError> {
        if !color_pattern().is_match(self.color.trim()) {
            return Err(FormError::InvalidColor(self.color.clone()));
        }

        let start_date = parse_date("Start date", &self.start_date_input)?;
        let end_date = parse_date("End date", &self.end_date_input)?;
        let start_time = parse_optional_time("Start time", &self.start_time_input)?;
        let end_time = parse_optional_time("End time", &self.end_time_input)?;

        let recurrence = match self.active_recurrence() {
            Some(draft) => Some(draft.to_rule()?),
            None => None,
        };

        let event = Event {
            id,
            title: self.title.trim().to_string(),
            description: non_empty(&self.description),
            start_date,
            end_date,
            start_time,
            end_time,
            color: self.color.trim().to_lowercase(),
            category: non_empty(&self.category),
            recurrence,
        };

        Ok(event.validated(policy)?)
    }
}

fn color_pattern() -> &'static Regex {
    static COLOR_RE: OnceLock<Regex> = OnceLock::new();
    COLOR_RE.get_or_init(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("invalid color regex"))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_date(field: &'static str, input: &str) -> Result<NaiveDate, FormError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT).map_err(|_| FormError::InvalidDate {
        field,
        value: input.to_string(),
    })
}

fn parse_optional_date(field: &'static str, input: &str) -> Result<Option<NaiveDate>, FormError> {
    if input.trim().is_empty() {
        return Ok(None);
    }
    parse_date(field, input).map(Some)
}

/// Accepts `HH:MM`, `HHMM`, `HMM` or a bare hour.
fn parse_clock(input: &str) -> Option<NaiveTime> {
    if input.contains(':') {
        return parse_time(input).ok();
    }
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let number: u32 = input.parse().ok()?;
    match input.len() {
        1 | 2 => NaiveTime::from_hms_opt(number, 0, 0),
        3 | 4 => NaiveTime::from_hms_opt(number / 100, number % 100, 0),
        _ => None,
    }
}

fn parse_optional_time(field: &'static str, input: &str) -> Result<Option<NaiveTime>, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_clock(trimmed).map(Some).ok_or_else(|| FormError::InvalidTime {
        field,
        value: input.to_string(),
    })
}

fn parse_number(field: &'static str, input: &str) -> Result<Option<u32>, FormError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed.parse().map(Some).map_err(|_| FormError::InvalidNumber {
        field,
        value: input.to_string(),
    })
}
