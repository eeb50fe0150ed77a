use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use chrono::{Datelike, NaiveDate};
use calgrid::{
    app::{AppState, Mode},
    calendar::recurrence::WEEKDAY_LABELS,
    ui::month_view::{self, DayCell},
};

pub fn render(f: &mut Frame, app: &AppState, area: ratatui::layout::Rect) {
    let layout = month_view::calculate_layout(app);

    let month_name = NaiveDate::from_ymd_opt(layout.year, layout.month, 1)
        .map(|d| d.format("%B %Y").to_string())
        .unwrap_or_else(|| format!("{}-{:02}", layout.year, layout.month));

    let header: Vec<Span> = layout
        .weekdays
        .iter()
        .map(|day| {
            let label = WEEKDAY_LABELS[day.num_days_from_sunday() as usize];
            Span::styled(format!(" {}  ", label), Style::default().fg(app.theme.weekday_header))
        })
        .collect();

    let mut lines = vec![
        Line::from(vec![
            Span::styled(month_name, Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(""),
        Line::from(header),
    ];

    for week in &layout.weeks {
        let mut day_spans = Vec::new();

        for day_cell in &week.days {
            day_spans.push(Span::styled(format!(" {:>2}", day_cell.date.day()), day_style(app, day_cell)));
            day_spans.push(marker(app, day_cell));
        }

        lines.push(Line::from(day_spans));
    }

    lines.push(Line::from(""));

    if app.mode == Mode::Visual && app.visual_selection_start.is_some() {
        if let Some((start, end)) = app.get_visual_selection_range() {
            let days = (end - start).num_days() + 1;
            lines.push(Line::from(vec![
                Span::styled("VISUAL ", Style::default().fg(app.theme.recurring_marker).add_modifier(Modifier::BOLD)),
                Span::styled(format!("({} day{})", days, if days == 1 { "" } else { "s" }), Style::default().fg(app.theme.weekday_header)),
                Span::raw(" | "),
                Span::styled("Enter", Style::default().fg(app.theme.today)),
                Span::raw(" = Create event | "),
                Span::styled("Esc", Style::default().fg(app.theme.error)),
                Span::raw(" = Cancel"),
            ]));
        }
    } else {
        lines.push(Line::from(vec![
            Span::styled("hjkl", Style::default().fg(app.theme.title)),
            Span::raw(" = Navigate | "),
            Span::styled("{ }", Style::default().fg(app.theme.title)),
            Span::raw(" = Month | "),
            Span::styled("a", Style::default().fg(app.theme.today)),
            Span::raw(" = Add event | "),
            Span::styled("v", Style::default().fg(app.theme.recurring_marker)),
            Span::raw(" = Visual"),
        ]));
        lines.push(Line::from(vec![
            Span::styled("•", Style::default().fg(app.theme.event_marker)),
            Span::raw(" event  "),
            Span::styled("↻", Style::default().fg(app.theme.recurring_marker)),
            Span::raw(" recurring"),
        ]));
    }

    let content = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(content, area);
}

fn day_style(app: &AppState, day_cell: &DayCell) -> Style {
    let style = Style::default();

    if day_cell.in_visual_selection {
        style.bg(app.theme.field_inactive).fg(app.theme.selected_fg).add_modifier(Modifier::BOLD)
    } else if day_cell.is_selected {
        style.bg(app.theme.selected_bg).fg(app.theme.selected_fg).add_modifier(Modifier::BOLD)
    } else if !day_cell.is_current_month {
        style.fg(app.theme.outside_month)
    } else if day_cell.is_today {
        style.fg(app.theme.today).add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

fn marker(app: &AppState, day_cell: &DayCell) -> Span<'static> {
    if day_cell.has_recurring {
        Span::styled("↻ ", Style::default().fg(app.theme.recurring_marker))
    } else if day_cell.has_events() {
        Span::styled("• ", Style::default().fg(app.theme.event_marker))
    } else {
        Span::raw("  ")
    }
}
