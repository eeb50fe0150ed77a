use chrono::Days;
use crossterm::event::KeyCode;

use crate::app::{AppState, Mode};
use crate::event_form::EventForm;

pub fn handle_key(key: KeyCode, state: &mut AppState) {
    match key {
        KeyCode::Char('h') | KeyCode::Left => {
            if let Some(new_date) = state.selected_date.checked_sub_days(Days::new(1)) {
                state.selected_date = new_date;
            }
        }
        KeyCode::Char('l') | KeyCode::Right => {
            if let Some(new_date) = state.selected_date.checked_add_days(Days::new(1)) {
                state.selected_date = new_date;
            }
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if let Some(new_date) = state.selected_date.checked_add_days(Days::new(7)) {
                state.selected_date = new_date;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if let Some(new_date) = state.selected_date.checked_sub_days(Days::new(7)) {
                state.selected_date = new_date;
            }
        }
        KeyCode::Char('a') | KeyCode::Enter => {
            if let Some((start, end)) = state.get_visual_selection_range() {
                let duration_days = (end - start).num_days() + 1;
                let form = if duration_days == 1 {
                    EventForm::new(start, String::from("New Event"))
                } else {
                    EventForm::for_range(start, end, format!("{}-day Event", duration_days))
                };

                state.event_form = Some(form);
                state.visual_selection_start = None;
                state.mode = Mode::Insert;
            }
        }
        KeyCode::Esc => {
            state.visual_selection_start = None;
            state.mode = Mode::Normal;
        }
        _ => {}
    }
}
