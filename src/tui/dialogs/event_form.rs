use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use calgrid::{
    app::AppState,
    calendar::recurrence::WEEKDAY_LABELS,
    event_form::{EventForm, FormField},
};

pub fn render(f: &mut Frame, app: &AppState) {
    let Some(form) = &app.event_form else {
        return;
    };

    let fields = form.visible_fields();

    let area = f.size();
    let form_width = 70.min(area.width);
    let form_height = (fields.len() as u16 + 9).min(area.height);
    let x = (area.width.saturating_sub(form_width)) / 2;
    let y = (area.height.saturating_sub(form_height)) / 2;

    let form_area = ratatui::layout::Rect {
        x,
        y,
        width: form_width,
        height: form_height,
    };

    f.render_widget(Clear, form_area);

    let form_title = if form.is_editing() { "Edit Event" } else { "Create New Event" };

    let mut form_text = vec![
        Line::from(vec![Span::styled(form_title, Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD))]),
        Line::from(""),
    ];

    for field in fields {
        let label_color = if form.active_field == field { app.theme.field_active } else { app.theme.field_inactive };
        let mut spans = vec![Span::styled(format!("{:<12}", field.label()), Style::default().fg(label_color))];
        spans.extend(field_value(app, form, field));
        form_text.push(Line::from(spans));
    }

    form_text.push(Line::from(""));

    if form.is_recurring {
        form_text.push(Line::from(vec![
            Span::styled(form.frequency_label(), Style::default().fg(app.theme.recurring_marker)),
        ]));
    }

    if let Some(error) = &form.error {
        form_text.push(Line::from(vec![Span::styled(error.as_str(), Style::default().fg(app.theme.error))]));
    } else {
        form_text.push(Line::from(""));
    }

    form_text.push(Line::from(vec![
        Span::styled("Tab", Style::default().fg(app.theme.title)),
        Span::raw(" = Next field | "),
        Span::styled("Space", Style::default().fg(app.theme.title)),
        Span::raw(" = Toggle | "),
        Span::styled("Enter", Style::default().fg(app.theme.today)),
        Span::raw(" = Save | "),
        Span::styled("Esc", Style::default().fg(app.theme.error)),
        Span::raw(" = Cancel"),
    ]));

    let block_title = if form.is_editing() { " Edit Event " } else { " New Event " };

    let form_paragraph = Paragraph::new(form_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(block_title))
        .alignment(Alignment::Left);

    f.render_widget(form_paragraph, form_area);
}

fn field_value<'a>(app: &AppState, form: &'a EventForm, field: FormField) -> Vec<Span<'a>> {
    let hint = |text: &'static str| Span::styled(text, Style::default().fg(app.theme.field_inactive));
    let draft = form.recurrence.as_ref();

    match field {
        FormField::Title => vec![Span::raw(form.title.as_str())],
        FormField::Description => vec![Span::raw(form.description.as_str())],
        FormField::StartDate => vec![Span::raw(form.start_date_input.as_str()), hint(" YYYY-MM-DD")],
        FormField::EndDate => vec![Span::raw(form.end_date_input.as_str())],
        FormField::StartTime => vec![Span::raw(form.start_time_input.as_str()), hint(" HH:MM, empty = all day")],
        FormField::EndTime => vec![Span::raw(form.end_time_input.as_str())],
        FormField::Color => vec![
            Span::raw(form.color.as_str()),
            Span::raw(" "),
            Span::styled("■", Style::default().fg(swatch(&form.color).unwrap_or(app.theme.event_marker))),
        ],
        FormField::Category => vec![Span::raw(form.category.as_str())],
        FormField::Recurring => vec![Span::raw(if form.is_recurring { "[x]" } else { "[ ]" })],
        FormField::RecurrenceType => vec![
            Span::raw(draft.map(|d| format!("< {:?} >", d.kind)).unwrap_or_default()),
        ],
        FormField::Frequency => vec![Span::raw(draft.map(|d| d.frequency_input.as_str()).unwrap_or_default()), hint(" 1-52")],
        FormField::DaysOfWeek => WEEKDAY_LABELS
            .iter()
            .enumerate()
            .map(|(index, label)| {
                let day = index as u8;
                let mut style = if form.is_weekday_selected(day) {
                    Style::default().fg(app.theme.recurring_marker).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(app.theme.field_inactive)
                };
                if form.active_field == FormField::DaysOfWeek && form.weekday_cursor == day {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Span::styled(format!("{} ", label), style)
            })
            .collect(),
        FormField::RecurrenceEndDate => vec![Span::raw(draft.map(|d| d.end_date_input.as_str()).unwrap_or_default()), hint(" optional")],
        FormField::EndAfterOccurrences => vec![Span::raw(draft.map(|d| d.end_after_input.as_str()).unwrap_or_default()), hint(" 1-365, optional")],
    }
}

fn swatch(color: &str) -> Option<ratatui::style::Color> {
    let hex = color.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();
    Some(ratatui::style::Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}
