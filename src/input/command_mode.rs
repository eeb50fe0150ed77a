use chrono::NaiveDate;

use crate::calendar::event::DATE_FORMAT;

#[derive(Debug, PartialEq)]
pub enum Command {
    Quit,
    Goto(NaiveDate),
    NewEvent(Option<String>),
    Theme(String),
    Help,
    Error(String),
}

pub fn parse_command(input: &str) -> Command {
    let trimmed = input.trim();

    let Some(command_text) = trimmed.strip_prefix(':') else {
        return Command::Error("Commands must start with ':'".to_string());
    };

    let parts: Vec<&str> = command_text.split_whitespace().collect();

    if parts.is_empty() {
        return Command::Error("Empty command".to_string());
    }

    match parts[0] {
        "q" | "quit" => Command::Quit,
        "help" | "h" => Command::Help,
        "goto" | "g" => {
            if parts.len() < 2 {
                Command::Error("goto requires a date argument".to_string())
            } else if let Ok(date) = NaiveDate::parse_from_str(parts[1], DATE_FORMAT) {
                Command::Goto(date)
            } else {
                Command::Error(format!("Invalid date format: {}", parts[1]))
            }
        }
        "new" => {
            if parts.len() < 2 {
                Command::NewEvent(None)
            } else {
                let title = parts[1..].join(" ");
                Command::NewEvent(Some(title))
            }
        }
        "theme" => {
            if parts.len() < 2 {
                Command::Error("theme requires a theme name".to_string())
            } else {
                Command::Theme(parts[1].to_string())
            }
        }
        _ => Command::Error(format!("Unknown command: {}", parts[0])),
    }
}
