use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use calgrid::app::AppState;

pub fn render(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let events = app.get_events_for_date(app.selected_date);

    let title = format!("Events on {}", app.selected_date.format("%B %d, %Y"));

    let mut lines = vec![
        Line::from(vec![
            Span::styled(title, Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
    ];

    if events.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("No events", Style::default().fg(app.theme.outside_month)),
        ]));
    } else {
        let selected_base = Style::default().bg(app.theme.selected_bg).add_modifier(Modifier::BOLD);

        for (idx, event) in events.iter().enumerate() {
            let time_str = event.time_label_with(app.clock_format);
            let is_selected = idx == app.selected_event_index;

            let (time_style, title_style, detail_style) = if is_selected {
                (
                    selected_base.fg(app.theme.selected_fg),
                    selected_base.fg(app.theme.selected_fg),
                    Style::default().bg(app.theme.selected_bg).fg(app.theme.outside_month),
                )
            } else {
                (
                    Style::default().fg(app.theme.today),
                    Style::default().fg(app.theme.status_bar),
                    Style::default().fg(app.theme.outside_month),
                )
            };

            let cursor = if is_selected { ">" } else { " " };

            lines.push(Line::from(vec![
                Span::styled(cursor, Style::default().fg(app.theme.selected_bg)),
                Span::styled(time_str, time_style),
                Span::raw(" "),
                Span::styled(event.title.as_str(), title_style),
            ]));

            if let Some(rule) = &event.recurrence {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled("↻ ", Style::default().fg(app.theme.recurring_marker)),
                    Span::styled(rule.summary(), detail_style),
                ]));
            }

            if event.span_days() > 1 {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{} to {}", event.start_date.format("%b %d"), event.end_date.format("%b %d")),
                        detail_style,
                    ),
                ]));
            }

            if let Some(category) = &event.category {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(format!("#{}", category), detail_style),
                ]));
            }

            lines.push(Line::from(""));
        }

        lines.push(Line::from(vec![
            Span::styled("j/k", Style::default().fg(app.theme.title)),
            Span::raw(" = Navigate | "),
            Span::styled("E", Style::default().fg(app.theme.today)),
            Span::raw(" = Edit | "),
            Span::styled("x", Style::default().fg(app.theme.error)),
            Span::raw(" = Delete"),
        ]));
    }

    let content = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(content, area);
}
