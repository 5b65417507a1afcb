//! Dark palette shared by every screen.

use ratatui::style::{Color, Modifier, Style};

pub const BACKGROUND: Color = Color::Rgb(0x12, 0x12, 0x12);
pub const SURFACE: Color = Color::Rgb(0x1E, 0x1E, 0x1E);
pub const TEXT: Color = Color::Rgb(0xFF, 0xFF, 0xFF);
pub const TEXT_MUTED: Color = Color::Rgb(0xB0, 0xB0, 0xB0);
pub const ACCENT: Color = Color::Rgb(0x4A, 0x90, 0xE2);
pub const ACCENT_ALT: Color = Color::Rgb(0xFF, 0x40, 0x81);
pub const ASSISTANT: Color = Color::Rgb(0x7C, 0x3A, 0xED);
pub const SUCCESS: Color = Color::Rgb(0x32, 0xCD, 0x32);
pub const WARNING: Color = Color::Rgb(0xFF, 0xA5, 0x00);
pub const ERROR: Color = Color::Rgb(0xFF, 0x4C, 0x4C);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BACKGROUND)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn highlight() -> Style {
    Style::default().bg(ACCENT).fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn key_hint() -> Style {
    Style::default().bg(Color::DarkGray).fg(TEXT)
}

pub fn key_label() -> Style {
    Style::default().bg(SURFACE).fg(TEXT)
}
