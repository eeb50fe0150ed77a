use chrono::{Days, NaiveDate};
use crossterm::event::KeyCode;

use crate::app::{AppState, Mode};
use crate::ui::month_view::{first_of_month, last_of_month, shift_month};

pub fn handle_key(key: KeyCode, state: &mut AppState) {
    match key {
        KeyCode::Char('h') | KeyCode::Left => move_by_days(state, -1),
        KeyCode::Char('l') | KeyCode::Right => move_by_days(state, 1),
        KeyCode::Char('j') | KeyCode::Down => {
            if has_events_on_selected_date(state) {
                state.move_event_selection_down();
            } else {
                move_by_days(state, 7);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            if has_events_on_selected_date(state) {
                state.move_event_selection_up();
            } else {
                move_by_days(state, -7);
            }
        }
        KeyCode::Char('J') => move_by_days(state, 7),
        KeyCode::Char('K') => move_by_days(state, -7),
        KeyCode::Char('t') => select_date(state, chrono::Local::now().date_naive()),
        KeyCode::Char('g') => {
            if let Some(first) = first_of_month(state.selected_date) {
                select_date(state, first);
            }
        }
        KeyCode::Char('G') => {
            if let Some(last) = last_of_month(state.selected_date) {
                select_date(state, last);
            }
        }
        KeyCode::Char('{') => move_by_months(state, -1),
        KeyCode::Char('}') => move_by_months(state, 1),
        KeyCode::Char('a') => state.open_new_event_form(String::new()),
        KeyCode::Char('E') | KeyCode::Enter => state.open_edit_form(),
        KeyCode::Char('x') => state.request_delete(),
        KeyCode::Char('v') => {
            state.visual_selection_start = Some(state.selected_date);
            state.mode = Mode::Visual;
        }
        KeyCode::Char(':') => {
            state.mode = Mode::Command;
            state.command_buffer = ":".to_string();
        }
        KeyCode::Char('?') => {
            state.show_help = true;
            state.help_scroll = 0;
        }
        _ => {}
    }
}

fn has_events_on_selected_date(state: &AppState) -> bool {
    !state.get_events_for_date(state.selected_date).is_empty()
}

fn select_date(state: &mut AppState, date: NaiveDate) {
    if state.selected_date != date {
        state.selected_date = date;
        state.reset_event_selection();
    }
}

fn move_by_days(state: &mut AppState, days: i64) {
    let moved = if days >= 0 {
        state.selected_date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        state.selected_date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    if let Some(date) = moved {
        select_date(state, date);
    }
}

fn move_by_months(state: &mut AppState, months: i32) {
    if let Some(date) = shift_month(state.selected_date, months) {
        select_date(state, date);
    }
}
