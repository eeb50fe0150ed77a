use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    Terminal,
};
use calgrid::{
    app::{AppState, Mode},
    calendar::{Event, OccurrenceMatcher},
    input::{command_mode, insert_mode, normal_mode, visual_mode},
    storage::{config::Config, events_file},
    ui::theme::Theme,
};
use crate::tui::presentation::ui;

/// Where the session's events came from and, if a file, where edits go.
/// Events listed in `sample_ids` are demo data and never written back.
pub struct EventSource {
    pub events: Vec<Event>,
    pub file: Option<PathBuf>,
    pub sample_ids: HashSet<String>,
}

struct SaveTarget<'a> {
    path: &'a Path,
    sample_ids: &'a HashSet<String>,
}

pub fn run_tui(config: &Config, source: EventSource) -> Result<(), io::Error> {
    let mut app = AppState::new()
        .with_theme(Theme::get_by_name(&config.ui.theme))
        .with_matcher(OccurrenceMatcher::new(config.policy()))
        .with_week_start(config.week_start())
        .with_clock_format(config.clock_format());

    for event in source.events {
        app.add_event(event);
    }
    tracing::info!("Starting TUI with {} events", app.events.len());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let target = source.file.as_deref().map(|path| SaveTarget { path, sample_ids: &source.sample_ids });
    let res = run_app(&mut terminal, &mut app, target.as_ref());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!("TUI loop failed: {}", err);
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    target: Option<&SaveTarget>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let TermEvent::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            if !matches!(app.mode, Mode::Command) {
                app.status_message = None;
            }

            match app.mode {
                Mode::Normal => {
                    if app.show_help {
                        handle_help_keys(key.code, app);
                    } else {
                        match key.code {
                            KeyCode::Char('q') => return Ok(()),
                            _ => normal_mode::handle_key(key.code, app),
                        }
                    }
                }
                Mode::Command => {
                    if handle_command_mode(key.code, app) {
                        return Ok(());
                    }
                }
                Mode::Insert => handle_insert_mode(key.code, app, target),
                Mode::Visual => {
                    if app.delete_confirmation_event_id.is_some() {
                        handle_delete_confirmation(key.code, app, target);
                    } else {
                        visual_mode::handle_key(key.code, app);
                    }
                }
            }
        }
    }
}

fn handle_help_keys(code: KeyCode, app: &mut AppState) {
    match code {
        KeyCode::Char('j') => {
            app.help_scroll = app.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') => {
            app.help_scroll = app.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            app.show_help = false;
            app.help_scroll = 0;
        }
        _ => {}
    }
}

/// Returns true when the session should end.
fn handle_command_mode(code: KeyCode, app: &mut AppState) -> bool {
    match code {
        KeyCode::Enter => {
            let command_text = app.command_buffer.clone();
            app.command_buffer.clear();
            app.mode = Mode::Normal;

            match command_mode::parse_command(&command_text) {
                command_mode::Command::Quit => return true,
                command_mode::Command::Goto(date) => {
                    app.selected_date = date;
                    app.reset_event_selection();
                }
                command_mode::Command::Help => {
                    app.show_help = !app.show_help;
                    app.help_scroll = 0;
                }
                command_mode::Command::Theme(theme_name) => {
                    app.theme = Theme::get_by_name(&theme_name);
                    if app.theme.name != theme_name.to_lowercase() {
                        app.status_message = Some(format!("Theme now '{}'", app.theme.name));
                    }
                }
                command_mode::Command::NewEvent(title) => {
                    app.open_new_event_form(title.unwrap_or_default());
                }
                command_mode::Command::Error(message) => {
                    tracing::warn!("Command failed: {}", message);
                    app.status_message = Some(message);
                }
            }
            false
        }
        KeyCode::Esc => {
            app.command_buffer.clear();
            app.mode = Mode::Normal;
            false
        }
        KeyCode::Backspace => {
            app.command_buffer.pop();
            if app.command_buffer.is_empty() {
                app.mode = Mode::Normal;
            }
            false
        }
        KeyCode::Char(c) => {
            app.command_buffer.push(c);
            false
        }
        _ => false
    }
}

fn handle_insert_mode(code: KeyCode, app: &mut AppState, target: Option<&SaveTarget>) {
    match code {
        KeyCode::Esc => app.cancel_event_form(),
        KeyCode::Enter => {
            if app.submit_event_form().is_ok() {
                persist(app, target);
            }
        }
        _ => insert_mode::handle_key(code, app),
    }
}

fn handle_delete_confirmation(code: KeyCode, app: &mut AppState, target: Option<&SaveTarget>) {
    match code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.confirm_delete();
            persist(app, target);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

fn persist(app: &mut AppState, target: Option<&SaveTarget>) {
    let Some(target) = target else {
        return;
    };

    let events: Vec<Event> = app
        .events
        .iter()
        .filter(|event| !target.sample_ids.contains(&event.id))
        .cloned()
        .collect();

    if let Err(e) = events_file::save_events(target.path, &events) {
        tracing::error!("Failed to save events to {}: {}", target.path.display(), e);
        app.status_message = Some(format!("Failed to save events: {}", e));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn save_to<'a>(path: &'a Path, sample_ids: &'a HashSet<String>) -> SaveTarget<'a> {
        SaveTarget { path, sample_ids }
    }

    fn type_command(app: &mut AppState, text: &str) -> bool {
        app.mode = Mode::Command;
        app.command_buffer = text.to_string();
        handle_command_mode(KeyCode::Enter, app)
    }

    #[test]
    fn quit_command_ends_session() {
        let mut app = AppState::new();
        assert!(type_command(&mut app, ":q"));
    }

    #[test]
    fn goto_command_moves_selection() {
        let mut app = AppState::new();
        assert!(!type_command(&mut app, ":goto 2024-02-29"));
        assert_eq!(app.selected_date, date(2024, 2, 29));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn bad_command_reports_in_status_bar() {
        let mut app = AppState::new();
        type_command(&mut app, ":sync");
        assert_eq!(app.status_message.as_deref(), Some("Unknown command: sync"));
    }

    #[test]
    fn new_command_opens_form_with_title() {
        let mut app = AppState::new();
        type_command(&mut app, ":new Dentist");
        assert_eq!(app.mode, Mode::Insert);
        assert_eq!(app.event_form.as_ref().unwrap().title, "Dentist");
    }

    #[test]
    fn submitted_events_are_written_to_the_events_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        let mut app = AppState::new();
        app.selected_date = date(2024, 1, 1);
        app.open_new_event_form("Standup".to_string());
        let no_samples = HashSet::new();

        handle_insert_mode(KeyCode::Enter, &mut app, Some(&save_to(&path, &no_samples)));

        let saved = events_file::load_events(&path, &app.matcher.policy()).unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].title, "Standup");
    }

    #[test]
    fn rejected_submission_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        let mut app = AppState::new();
        app.open_new_event_form(String::new());
        let no_samples = HashSet::new();

        handle_insert_mode(KeyCode::Enter, &mut app, Some(&save_to(&path, &no_samples)));

        assert!(!path.exists());
        assert_eq!(app.mode, Mode::Insert);
    }

    #[test]
    fn confirmed_delete_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        let mut app = AppState::new();
        app.selected_date = date(2024, 1, 1);
        app.add_event(Event::new("a", "Old", date(2024, 1, 1)));
        app.request_delete();
        let no_samples = HashSet::new();

        handle_delete_confirmation(KeyCode::Char('y'), &mut app, Some(&save_to(&path, &no_samples)));

        assert!(app.events.is_empty());
        let saved = events_file::load_events(&path, &app.matcher.policy()).unwrap();
        assert!(saved.is_empty());
    }

    #[test]
    fn sample_events_stay_out_of_the_events_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        let sample_ids: HashSet<String> = ["demo".to_string()].into_iter().collect();
        let mut app = AppState::new();
        app.selected_date = date(2024, 1, 1);
        app.add_event(Event::new("mine", "Mine", date(2024, 1, 1)));
        app.add_event(Event::new("demo", "Demo", date(2024, 1, 2)));
        app.open_new_event_form("Added".to_string());

        handle_insert_mode(KeyCode::Enter, &mut app, Some(&save_to(&path, &sample_ids)));

        assert_eq!(app.events.len(), 3);
        let saved = events_file::load_events(&path, &app.matcher.policy()).unwrap();
        let mut titles: Vec<&str> = saved.iter().map(|e| e.title.as_str()).collect();
        titles.sort();
        assert_eq!(titles, vec!["Added", "Mine"]);
    }
}
