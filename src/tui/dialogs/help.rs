use ratatui::{
    layout::Alignment,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use calgrid::{app::AppState, ui::theme::Theme};

pub fn render(f: &mut Frame, app: &AppState) {
    let area = f.size();
    let help_width = 60.min(area.width);
    let help_height = 23.min(area.height);
    let x = (area.width.saturating_sub(help_width)) / 2;
    let y = (area.height.saturating_sub(help_height)) / 2;

    let help_area = ratatui::layout::Rect {
        x,
        y,
        width: help_width,
        height: help_height,
    };

    f.render_widget(Clear, help_area);

    let section = |title: &'static str| Line::from(vec![Span::styled(title, Style::default().fg(app.theme.help_section))]);

    let help_text = vec![
        Line::from(vec![Span::styled("calgrid Help", Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD))]),
        Line::from(""),
        section("Navigation:"),
        Line::from("  h/l      - Previous/next day"),
        Line::from("  j/k      - Navigate events (or week if no events)"),
        Line::from("  J/K      - Next/previous week"),
        Line::from("  t        - Jump to today"),
        Line::from("  g/G      - First/last day of month"),
        Line::from("  { / }    - Previous/next month"),
        Line::from(""),
        section("Event Management:"),
        Line::from("  a        - Add new event (insert mode)"),
        Line::from("  :new     - Create event (:new [Meeting title])"),
        Line::from("  E/Enter  - Edit selected event"),
        Line::from("  x        - Delete selected event"),
        Line::from("  v        - Visual mode (select date range)"),
        Line::from(""),
        section("Event Form:"),
        Line::from("  Tab      - Next field (Shift-Tab: previous)"),
        Line::from("  Space    - Toggle recurring / weekday, cycle type"),
        Line::from("  ←/→      - Move weekday cursor, cycle type"),
        Line::from("  Enter    - Save"),
        Line::from("  Esc      - Cancel"),
        Line::from(""),
        section("Recurrence:"),
        Line::from("  Every    - Interval in days, weeks or months (1-52)"),
        Line::from("  On       - Weekdays for weekly rules"),
        Line::from("  Ends On  - Last date an occurrence may fall on"),
        Line::from("  Ends After - Total number of occurrences (1-365)"),
        Line::from(""),
        section("Commands:"),
        Line::from("  :q       - Quit"),
        Line::from("  :goto    - Jump to date (:goto 2025-12-25)"),
        Line::from(format!("  :theme   - Change theme ({})", Theme::available_themes().join(", "))),
        Line::from("  :help    - Show this help"),
        Line::from(""),
    ];

    let visible_lines = help_height.saturating_sub(3) as usize;
    let total_lines = help_text.len();
    let max_scroll = total_lines.saturating_sub(visible_lines);
    let scroll = app.help_scroll.min(max_scroll);

    let scrolled_text: Vec<Line> = help_text
        .into_iter()
        .skip(scroll)
        .take(visible_lines)
        .collect();

    let help_paragraph = Paragraph::new(scrolled_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!(" Help (j/k to scroll, q to close) [{}/{}] ", scroll + 1, total_lines)))
        .alignment(Alignment::Left);

    f.render_widget(help_paragraph, help_area);
}
