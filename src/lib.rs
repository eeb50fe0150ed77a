pub mod calendar;
pub mod event_form;
pub mod input;
pub mod ui;
pub mod storage;
pub mod app;

pub use calendar::{events_on_date, occurs_on, validate_recurrence, Event, RecurrenceRule, RecurrenceType};
pub use app::{AppState, Mode};

pub use input::{normal_mode, command_mode};
