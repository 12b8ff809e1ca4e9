//! Neon palette and semantic styling for the TUI.
//!
//! Screens ask for a style by meaning (a severity, a triage status, a
//! container state) rather than picking palette colors themselves.

use ratatui::style::{Color, Modifier, Style};

use logwatch_api::{ContainerStatus, ErrorStatus, Severity};

use crate::action::NotificationLevel;

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29
pub const LIGHT_BLUE: Color = Color::Rgb(139, 233, 253); // #8be9fd

/// Bar colors for the error-type breakdown.
pub const CHART_SERIES: &[Color] = &[
    NEON_CYAN,
    CORAL,
    ELECTRIC_PURPLE,
    SUCCESS_GREEN,
    ELECTRIC_YELLOW,
    LIGHT_BLUE,
];

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Border for a focused panel.
pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

/// Border for an unfocused panel.
pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Table header row.
pub fn table_header() -> Style {
    Style::default()
        .fg(NEON_CYAN)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
}

/// Normal table row text.
pub fn table_row() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Selected / highlighted table row.
pub fn table_selected() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .bg(BG_HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Active tab in the tab bar.
pub fn tab_active() -> Style {
    Style::default()
        .fg(ELECTRIC_PURPLE)
        .add_modifier(Modifier::BOLD)
}

/// Inactive tab in the tab bar.
pub fn tab_inactive() -> Style {
    Style::default().fg(DIM_WHITE)
}

/// Placeholder text for empty panels.
pub fn empty_state() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint text (e.g., "q quit  ? help").
pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Key hint key character.
pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

/// Text cursor block shown in edit fields.
pub fn cursor() -> Style {
    Style::default().fg(NEON_CYAN)
}

// ── Monitor Data ──────────────────────────────────────────────────────

/// Severity cell. Unknown or missing severities stay muted.
pub fn severity(severity: Option<&Severity>) -> Style {
    let color = match severity {
        Some(Severity::Critical) => ERROR_RED,
        Some(Severity::Error) => ELECTRIC_YELLOW,
        Some(Severity::Warning) => NEON_CYAN,
        Some(Severity::Other(_)) | None => BORDER_GRAY,
    };
    Style::default().fg(color)
}

/// Triage status cell.
pub fn error_status(status: &ErrorStatus) -> Style {
    let color = match status {
        ErrorStatus::New => CORAL,
        ErrorStatus::Investigating => ELECTRIC_YELLOW,
        ErrorStatus::Resolved => SUCCESS_GREEN,
        ErrorStatus::Other(_) => BORDER_GRAY,
    };
    Style::default().fg(color)
}

/// Container state dot and label.
pub fn container_state(status: ContainerStatus) -> Style {
    let color = match status {
        ContainerStatus::Running => SUCCESS_GREEN,
        ContainerStatus::Exited | ContainerStatus::Dead => ERROR_RED,
        ContainerStatus::Paused | ContainerStatus::Restarting => ELECTRIC_YELLOW,
        ContainerStatus::Created => NEON_CYAN,
        ContainerStatus::Removing | ContainerStatus::Other => BORDER_GRAY,
    };
    Style::default().fg(color)
}

/// Container-name column, shared by every table that lists errors.
pub fn container_name() -> Style {
    Style::default().fg(CORAL)
}

/// Toast border color and icon.
pub fn notification(level: NotificationLevel) -> (Style, &'static str) {
    match level {
        NotificationLevel::Success => (Style::default().fg(SUCCESS_GREEN), "✓"),
        NotificationLevel::Error => (Style::default().fg(ERROR_RED), "✗"),
    }
}
