pub mod event;
pub mod recurrence;
pub mod occurrence;
pub mod day_events;

pub use event::{Event, EventError};
pub use recurrence::{
    validate_recurrence, EmptyWeekdays, RecurrencePolicy, RecurrenceRule, RecurrenceType,
    ShortMonths, ValidationError,
};
pub use occurrence::{occurs_on, OccurrenceMatcher, Occurrences};
pub use day_events::events_on_date;
