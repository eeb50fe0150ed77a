use crossterm::event::KeyCode;

use crate::app::AppState;
use crate::event_form::FormField;

/// Edits the open form. Enter and Esc are left to the session, which owns
/// submit and cancel.
pub fn handle_key(key: KeyCode, state: &mut AppState) {
    let Some(form) = state.event_form.as_mut() else {
        return;
    };

    match key {
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left | KeyCode::Right => {
            let forward = key == KeyCode::Right;
            match form.active_field {
                FormField::RecurrenceType => form.cycle_recurrence_type(forward),
                FormField::DaysOfWeek => form.move_weekday_cursor(forward),
                FormField::Recurring => form.toggle_recurring(),
                _ => {}
            }
        }
        KeyCode::Char(' ') if !accepts_text(form.active_field) => match form.active_field {
            FormField::Recurring => form.toggle_recurring(),
            FormField::RecurrenceType => form.cycle_recurrence_type(true),
            FormField::DaysOfWeek => form.toggle_weekday_at_cursor(),
            _ => {}
        },
        KeyCode::Backspace => {
            if let Some(buffer) = form.active_input_mut() {
                buffer.pop();
            }
        }
        KeyCode::Char(c) => {
            let numeric = form.active_field.is_numeric();
            if numeric && !c.is_ascii_digit() {
                return;
            }
            if let Some(buffer) = form.active_input_mut() {
                buffer.push(c);
            }
        }
        _ => {}
    }

    form.error = None;
}

fn accepts_text(field: FormField) -> bool {
    !matches!(field, FormField::Recurring | FormField::RecurrenceType | FormField::DaysOfWeek)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::RecurrenceType;
    use crate::event_form::EventForm;
    use chrono::NaiveDate;

    fn setup_state_with_form() -> AppState {
        let mut state = AppState::new();
        state.event_form = Some(EventForm::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            "Test Event".to_string(),
        ));
        state
    }

    fn form(state: &AppState) -> &EventForm {
        state.event_form.as_ref().unwrap()
    }

    #[test]
    fn tab_moves_to_next_field() {
        let mut state = setup_state_with_form();
        assert_eq!(form(&state).active_field, FormField::Title);

        handle_key(KeyCode::Tab, &mut state);

        assert_eq!(form(&state).active_field, FormField::Description);
    }

    #[test]
    fn backtab_wraps_to_last_field() {
        let mut state = setup_state_with_form();

        handle_key(KeyCode::BackTab, &mut state);

        assert_eq!(form(&state).active_field, FormField::Recurring);
    }

    #[test]
    fn char_appends_to_title_field() {
        let mut state = setup_state_with_form();
        state.event_form.as_mut().unwrap().title.clear();

        handle_key(KeyCode::Char('H'), &mut state);
        handle_key(KeyCode::Char('i'), &mut state);
        handle_key(KeyCode::Char(' '), &mut state);

        assert_eq!(form(&state).title, "Hi ");
    }

    #[test]
    fn backspace_removes_from_active_field() {
        let mut state = setup_state_with_form();
        state.event_form.as_mut().unwrap().active_field = FormField::StartTime;

        handle_key(KeyCode::Backspace, &mut state);

        assert_eq!(form(&state).start_time_input, "09:0");
    }

    #[test]
    fn space_toggles_recurring_switch() {
        let mut state = setup_state_with_form();
        state.event_form.as_mut().unwrap().active_field = FormField::Recurring;

        handle_key(KeyCode::Char(' '), &mut state);

        assert!(form(&state).is_recurring);
        assert!(form(&state).recurrence.is_some());
    }

    #[test]
    fn arrows_cycle_recurrence_type() {
        let mut state = setup_state_with_form();
        state.event_form.as_mut().unwrap().toggle_recurring();
        state.event_form.as_mut().unwrap().active_field = FormField::RecurrenceType;

        handle_key(KeyCode::Left, &mut state);

        assert_eq!(form(&state).recurrence.as_ref().unwrap().kind, RecurrenceType::Daily);
    }

    #[test]
    fn weekday_picker_moves_and_toggles() {
        let mut state = setup_state_with_form();
        state.event_form.as_mut().unwrap().toggle_recurring();
        state.event_form.as_mut().unwrap().active_field = FormField::DaysOfWeek;
        // 2024-01-01 is a Monday, so the cursor starts there.
        handle_key(KeyCode::Right, &mut state);
        handle_key(KeyCode::Char(' '), &mut state);

        assert!(form(&state).is_weekday_selected(2));
        assert!(!form(&state).is_weekday_selected(1));
    }

    #[test]
    fn numeric_fields_ignore_letters() {
        let mut state = setup_state_with_form();
        state.event_form.as_mut().unwrap().toggle_recurring();
        state.event_form.as_mut().unwrap().active_field = FormField::Frequency;

        handle_key(KeyCode::Char('x'), &mut state);
        handle_key(KeyCode::Char('2'), &mut state);

        assert_eq!(form(&state).recurrence.as_ref().unwrap().frequency_input, "12");
    }

    #[test]
    fn editing_clears_previous_error() {
        let mut state = setup_state_with_form();
        state.event_form.as_mut().unwrap().error = Some("bad".to_string());

        handle_key(KeyCode::Char('!'), &mut state);

        assert!(form(&state).error.is_none());
    }
}
