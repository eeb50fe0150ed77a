use chrono::{Local, NaiveDate, Weekday};
use uuid::Uuid;

use crate::calendar::event::TIME_FORMAT;
use crate::calendar::{Event, OccurrenceMatcher};
use crate::event_form::{EventForm, FormError};
use crate::ui::theme::Theme;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,
    Insert,
    Visual,
    Command,
}

pub struct AppState {
    pub mode: Mode,
    pub selected_date: NaiveDate,
    /// Events in insertion order; the order breaks ties on a day's list.
    pub events: Vec<Event>,
    pub matcher: OccurrenceMatcher,
    pub week_start: Weekday,
    pub clock_format: &'static str,
    pub command_buffer: String,
    pub status_message: Option<String>,
    pub show_help: bool,
    pub help_scroll: usize,
    pub theme: Theme,
    pub event_form: Option<EventForm>,
    pub selected_event_index: usize,
    pub delete_confirmation_event_id: Option<String>,
    pub visual_selection_start: Option<NaiveDate>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            selected_date: Local::now().date_naive(),
            events: Vec::new(),
            matcher: OccurrenceMatcher::default(),
            week_start: Weekday::Sun,
            clock_format: TIME_FORMAT,
            command_buffer: String::new(),
            status_message: None,
            show_help: false,
            help_scroll: 0,
            theme: Theme::default(),
            event_form: None,
            selected_event_index: 0,
            delete_confirmation_event_id: None,
            visual_selection_start: None,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_matcher(mut self, matcher: OccurrenceMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn with_week_start(mut self, week_start: Weekday) -> Self {
        self.week_start = week_start;
        self
    }

    pub fn with_clock_format(mut self, clock_format: &'static str) -> Self {
        self.clock_format = clock_format;
        self
    }

    /// Replaces an event with the same id in place, or appends it.
    pub fn add_event(&mut self, event: Event) {
        match self.events.iter_mut().find(|e| e.id == event.id) {
            Some(existing) => *existing = event,
            None => self.events.push(event),
        }
    }

    pub fn remove_event(&mut self, event_id: &str) {
        self.events.retain(|e| e.id != event_id);
    }

    pub fn get_event(&self, event_id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id == event_id)
    }

    pub fn get_events_for_date(&self, date: NaiveDate) -> Vec<&Event> {
        self.matcher.events_on_date(&self.events, date)
    }

    pub fn get_selected_event(&self) -> Option<&Event> {
        let events = self.get_events_for_date(self.selected_date);
        events.get(self.selected_event_index).copied()
    }

    pub fn move_event_selection_down(&mut self) {
        let event_count = self.get_events_for_date(self.selected_date).len();
        if event_count > 0 && self.selected_event_index < event_count - 1 {
            self.selected_event_index += 1;
        }
    }

    pub fn move_event_selection_up(&mut self) {
        if self.selected_event_index > 0 {
            self.selected_event_index -= 1;
        }
    }

    pub fn reset_event_selection(&mut self) {
        self.selected_event_index = 0;
    }

    pub fn open_new_event_form(&mut self, title: String) {
        self.event_form = Some(EventForm::new(self.selected_date, title));
        self.mode = Mode::Insert;
    }

    pub fn open_edit_form(&mut self) {
        if let Some(event) = self.get_selected_event() {
            self.event_form = Some(EventForm::for_event(event));
            self.mode = Mode::Insert;
        }
    }

    /// Commits the open draft. On failure the draft stays open with the
    /// error attached.
    pub fn submit_event_form(&mut self) -> Result<(), FormError> {
        let Some(mut form) = self.event_form.take() else {
            return Ok(());
        };

        let id = form.event_id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
        match form.to_event(id, &self.matcher.policy()) {
            Ok(event) => {
                tracing::info!(
                    "{} event {} ({})",
                    if form.is_editing() { "Updated" } else { "Created" },
                    event.id,
                    event.title
                );
                self.status_message = Some(format!("Saved \"{}\"", event.title));
                self.add_event(event);
                self.mode = Mode::Normal;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Rejected event form: {}", e);
                form.error = Some(e.to_string());
                self.event_form = Some(form);
                Err(e)
            }
        }
    }

    pub fn cancel_event_form(&mut self) {
        self.event_form = None;
        self.mode = Mode::Normal;
    }

    pub fn request_delete(&mut self) {
        if let Some(event) = self.get_selected_event() {
            self.delete_confirmation_event_id = Some(event.id.clone());
            self.mode = Mode::Visual;
        }
    }

    pub fn confirm_delete(&mut self) {
        if let Some(event_id) = self.delete_confirmation_event_id.take() {
            tracing::info!("Deleting event: {}", event_id);
            self.remove_event(&event_id);
            self.status_message = Some("Event deleted".to_string());
            if self.selected_event_index > 0 {
                self.selected_event_index -= 1;
            }
        }
        self.mode = Mode::Normal;
    }

    pub fn cancel_delete(&mut self) {
        self.delete_confirmation_event_id = None;
        self.mode = Mode::Normal;
    }

    pub fn get_visual_selection_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.visual_selection_start.map(|start| {
            let end = self.selected_date;
            if start <= end {
                (start, end)
            } else {
                (end, start)
            }
        })
    }

    pub fn is_date_in_visual_selection(&self, date: NaiveDate) -> bool {
        if let Some((start, end)) = self.get_visual_selection_range() {
            date >= start && date <= end
        } else {
            false
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
