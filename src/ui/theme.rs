use ratatui::style::Color;

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub title: Color,
    pub selected_bg: Color,
    pub selected_fg: Color,
    pub today: Color,
    pub event_marker: Color,
    pub recurring_marker: Color,
    pub weekday_header: Color,
    pub outside_month: Color,
    pub status_bar: Color,
    pub help_section: Color,
    pub field_active: Color,
    pub field_inactive: Color,
    pub error: Color,
}

/// `(name, [title, selected_bg, selected_fg, today, event, recurring, header, outside, status, error])`
const PALETTES: [(&str, [(u8, u8, u8); 10]); 5] = [
    ("gruvbox", [
        (251, 184, 108), (60, 56, 54), (235, 219, 178), (184, 187, 38), (142, 192, 124),
        (211, 134, 155), (254, 128, 25), (146, 131, 116), (235, 219, 178), (251, 73, 52),
    ]),
    ("nord", [
        (136, 192, 208), (59, 66, 82), (236, 239, 244), (163, 190, 140), (129, 161, 193),
        (180, 142, 173), (235, 203, 139), (76, 86, 106), (216, 222, 233), (191, 97, 106),
    ]),
    ("dracula", [
        (139, 233, 253), (68, 71, 90), (248, 248, 242), (80, 250, 123), (255, 121, 198),
        (189, 147, 249), (241, 250, 140), (98, 114, 164), (248, 248, 242), (255, 85, 85),
    ]),
    ("solarized-dark", [
        (38, 139, 210), (7, 54, 66), (147, 161, 161), (133, 153, 0), (42, 161, 152),
        (108, 113, 196), (181, 137, 0), (88, 110, 117), (147, 161, 161), (220, 50, 47),
    ]),
    ("monokai", [
        (102, 217, 239), (73, 72, 62), (248, 248, 240), (166, 226, 46), (249, 38, 114),
        (174, 129, 255), (230, 219, 116), (117, 113, 94), (248, 248, 240), (249, 38, 114),
    ]),
];

impl Theme {
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            title: Color::Cyan,
            selected_bg: Color::Blue,
            selected_fg: Color::White,
            today: Color::Green,
            event_marker: Color::Cyan,
            recurring_marker: Color::Magenta,
            weekday_header: Color::Yellow,
            outside_month: Color::DarkGray,
            status_bar: Color::White,
            help_section: Color::Yellow,
            field_active: Color::Blue,
            field_inactive: Color::DarkGray,
            error: Color::Red,
        }
    }

    fn from_palette(name: &str, colors: [(u8, u8, u8); 10]) -> Self {
        let [title, selected_bg, selected_fg, today, event, recurring, header, outside, status, error] =
            colors.map(|(r, g, b)| Color::Rgb(r, g, b));
        Self {
            name: name.to_string(),
            title,
            selected_bg,
            selected_fg,
            today,
            event_marker: event,
            recurring_marker: recurring,
            weekday_header: header,
            outside_month: outside,
            status_bar: status,
            help_section: header,
            field_active: title,
            field_inactive: outside,
            error,
        }
    }

    pub fn get_by_name(name: &str) -> Self {
        let wanted = match name.to_lowercase().as_str() {
            "solarized" => "solarized-dark".to_string(),
            other => other.to_string(),
        };

        PALETTES
            .iter()
            .find(|(palette_name, _)| *palette_name == wanted)
            .map(|(palette_name, colors)| Self::from_palette(palette_name, *colors))
            .unwrap_or_else(Self::default_theme)
    }

    pub fn available_themes() -> Vec<&'static str> {
        std::iter::once("default")
            .chain(PALETTES.iter().map(|(name, _)| *name))
            .collect()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}
