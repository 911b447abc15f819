use ratatui::style::{Color, Modifier, Style};

use profilecache_core::ProfileTheme;

// Color palette
pub const PRIMARY: Color = Color::Rgb(102, 126, 234);
pub const SECONDARY: Color = Color::Rgb(96, 160, 96);
pub const ACCENT: Color = Color::Rgb(192, 160, 64);
pub const ERROR: Color = Color::Rgb(192, 64, 64);
pub const MUTED: Color = Color::Rgb(128, 128, 128);
pub const HIGHLIGHT: Color = Color::Rgb(48, 48, 64);

/// Accent color for a profile's card border and name.
pub fn theme_color(theme: ProfileTheme) -> Color {
    match theme {
        ProfileTheme::Elder => Color::Rgb(160, 160, 160),
        ProfileTheme::Young => Color::Rgb(0, 210, 211),
        ProfileTheme::Male => Color::Rgb(102, 126, 234),
        ProfileTheme::Female => Color::Rgb(240, 147, 251),
        ProfileTheme::Neutral => Color::Rgb(118, 75, 162),
    }
}

pub fn theme_style(theme: ProfileTheme) -> Style {
    Style::default()
        .fg(theme_color(theme))
        .add_modifier(Modifier::BOLD)
}

pub fn title_style() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn selected_style() -> Style {
    Style::default().bg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

pub fn list_item_style() -> Style {
    Style::default().fg(Color::White)
}

pub fn muted_style() -> Style {
    Style::default().fg(MUTED)
}

pub fn highlight_style() -> Style {
    Style::default().fg(ACCENT)
}

pub fn favorite_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn success_style() -> Style {
    Style::default().fg(SECONDARY)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR)
}

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(PRIMARY)
    } else {
        Style::default().fg(MUTED)
    }
}

pub fn status_bar_style() -> Style {
    Style::default().bg(Color::Rgb(32, 32, 40)).fg(Color::White)
}

pub fn help_key_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn help_desc_style() -> Style {
    Style::default().fg(Color::White)
}
