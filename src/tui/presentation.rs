use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use calgrid::app::{AppState, Mode};
use crate::tui::{calendar_views, dialogs};

pub fn ui(f: &mut Frame, app: &AppState) {
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.size());

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(60),
            Constraint::Percentage(40),
        ])
        .split(main_chunks[1]);

    let title_text = format!("calgrid - {:?} Mode - {}", app.mode, app.theme.name);

    let title = Paragraph::new(title_text)
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, main_chunks[0]);

    calendar_views::month::render(f, app, content_chunks[0]);
    calendar_views::event_list::render(f, app, content_chunks[1]);

    let is_command = matches!(app.mode, Mode::Command);
    let status_text = if is_command {
        app.command_buffer.to_string()
    } else if let Some(message) = &app.status_message {
        message.clone()
    } else {
        let recurring = app.events.iter().filter(|e| e.is_recurring()).count();
        format!(
            "Events: {} ({} recurring) | Press 'q' to quit, '?' for help",
            app.events.len(),
            recurring
        )
    };

    let status = Paragraph::new(status_text)
        .style(Style::default().fg(app.theme.status_bar))
        .alignment(if is_command { Alignment::Left } else { Alignment::Center })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(status, main_chunks[2]);

    if app.show_help {
        dialogs::help::render(f, app);
    }

    if app.event_form.is_some() {
        dialogs::event_form::render(f, app);
    }

    if app.delete_confirmation_event_id.is_some() {
        dialogs::delete_confirmation::render(f, app);
    }
}
