use ratatui::style::{Color, Modifier, Style};

pub fn brand() -> Style {
    Style::default()
        .fg(Color::LightRed)
        .add_modifier(Modifier::BOLD)
}

pub fn tagline() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn link() -> Style {
    Style::default().fg(Color::Cyan)
}

pub fn title() -> Style {
    Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::BOLD)
}

pub fn label() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

pub fn value() -> Style {
    Style::default().fg(Color::White)
}

pub fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn button() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightBlue)
        .add_modifier(Modifier::BOLD)
}

pub fn button_disabled() -> Style {
    Style::default().fg(Color::DarkGray).bg(Color::Black)
}

pub fn category() -> Style {
    Style::default()
        .fg(Color::LightGreen)
        .add_modifier(Modifier::BOLD)
}

pub fn backdrop() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn ok() -> Style {
    Style::default().fg(Color::Green)
}

pub fn error() -> Style {
    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
}
