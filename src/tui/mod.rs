mod session;
mod presentation;
mod sample_events;
mod calendar_views;
mod dialogs;

pub use sample_events::sample_events;
pub use session::{run_tui, EventSource};
