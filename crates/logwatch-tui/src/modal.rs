//! Centered overlay shown above the active screen: an error's full detail
//! with its status selector, or a container's log tail.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};

use logwatch_api::{ErrorRecord, ErrorStatus};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::{centered_rect, fmt, sub_tabs::render_sub_tabs};

#[derive(Debug, Clone)]
enum Content {
    ErrorDetail {
        record: Box<ErrorRecord>,
        /// Selector value; changes only on user input.
        selected: ErrorStatus,
    },
    ContainerLogs {
        name: String,
        logs: String,
    },
}

#[derive(Debug, Clone)]
pub struct Modal {
    content: Content,
    scroll: u16,
}

impl Modal {
    pub fn error_detail(record: ErrorRecord) -> Self {
        let selected = record.status.clone();
        Self {
            content: Content::ErrorDetail {
                record: Box::new(record),
                selected,
            },
            scroll: 0,
        }
    }

    pub fn container_logs(name: String, logs: String) -> Self {
        Self {
            content: Content::ContainerLogs { name, logs },
            scroll: 0,
        }
    }

    /// Current value of the status selector, for error detail modals.
    pub fn selected_status(&self) -> Option<ErrorStatus> {
        match &self.content {
            Content::ErrorDetail { selected, .. } => Some(selected.clone()),
            Content::ContainerLogs { .. } => None,
        }
    }

    /// Step the status selector; returns the update to send, if any.
    fn cycle_status(&mut self, forward: bool) -> Option<Action> {
        let Content::ErrorDetail { record, selected } = &mut self.content else {
            return None;
        };
        let all = &ErrorStatus::ALL;
        // An unrecognized stored status starts the selector from the top.
        let next = match all.iter().position(|s| *s == *selected) {
            Some(i) if forward => all.get(i + 1).cloned()?,
            Some(i) => all.get(i.checked_sub(1)?).cloned()?,
            None => ErrorStatus::New,
        };
        selected.clone_from(&next);
        Some(Action::UpdateErrorStatus {
            id: record.id,
            status: next,
        })
    }

    fn title(&self) -> String {
        match &self.content {
            Content::ErrorDetail { record, .. } => format!(" Error Detail #{} ", record.id),
            Content::ContainerLogs { .. } => " Container Logs ".to_owned(),
        }
    }

    fn body(&self) -> Vec<Line<'_>> {
        match &self.content {
            Content::ErrorDetail { record, .. } => detail_lines(record),
            Content::ContainerLogs { name, logs } => {
                let mut lines = vec![
                    Line::from(Span::styled(format!(" {name}"), theme::title_style())),
                    Line::from(""),
                ];
                if logs.is_empty() {
                    lines.push(Line::from(Span::styled(" (no output)", theme::empty_state())));
                } else {
                    lines.extend(logs.lines().map(|l| {
                        Line::from(Span::styled(l, Style::default().fg(theme::DIM_WHITE)))
                    }));
                }
                lines
            }
        }
    }
}

fn field<'a>(label: &'a str, value: String, style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!(" {label:<12}"), Style::default().fg(theme::BORDER_GRAY)),
        Span::styled(value, style),
    ])
}

fn section(title: &str) -> [Line<'_>; 2] {
    [
        Line::from(""),
        Line::from(Span::styled(
            format!(" {title}"),
            Style::default()
                .fg(theme::NEON_CYAN)
                .add_modifier(Modifier::BOLD),
        )),
    ]
}

fn detail_lines(record: &ErrorRecord) -> Vec<Line<'_>> {
    let plain = Style::default().fg(theme::DIM_WHITE);
    let mut lines = vec![
        field(
            "Container",
            record.container_name.clone(),
            theme::container_name(),
        ),
        field("Time", fmt::format_timestamp(&record.timestamp), plain),
        field(
            "Type",
            record.error_type.clone().unwrap_or_else(|| "Unknown".into()),
            plain,
        ),
        field(
            "Severity",
            fmt::severity_label(record.severity.as_ref()),
            theme::severity(record.severity.as_ref()),
        ),
    ];

    lines.extend(section("Message"));
    lines.extend(
        record
            .error_message
            .lines()
            .map(|l| Line::from(Span::styled(format!(" {l}"), plain))),
    );

    let optional = [
        ("Full log", record.log_content.as_deref()),
        ("AI analysis", record.ai_analysis.as_deref()),
        ("AI solution", record.ai_solution.as_deref()),
    ];
    for (title, text) in optional {
        let Some(text) = text.filter(|t| !t.is_empty()) else {
            continue;
        };
        lines.extend(section(title));
        lines.extend(
            text.lines()
                .map(|l| Line::from(Span::styled(format!(" {l}"), plain))),
        );
    }
    lines
}

impl Component for Modal {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(Action::CloseModal),
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll = self.scroll.saturating_add(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(10);
                None
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(10);
                None
            }
            KeyCode::Char('g') => {
                self.scroll = 0;
                None
            }
            KeyCode::Right | KeyCode::Char('l') => self.cycle_status(true),
            KeyCode::Left | KeyCode::Char('h') => self.cycle_status(false),
            _ => None,
        };
        Ok(action)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let modal_area = centered_rect(area, 100, area.height.saturating_sub(4).max(10));
        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .title(self.title())
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let selector_height = u16::from(self.selected_status().is_some());
        let layout = Layout::vertical([
            Constraint::Length(selector_height),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

        if let Some(selected) = self.selected_status() {
            let all = ErrorStatus::ALL;
            let labels: Vec<&str> = all.iter().map(ErrorStatus::label).collect();
            let idx = all.iter().position(|s| *s == selected);
            let mut line = render_sub_tabs(" Status      ", &labels, idx);
            if idx.is_none() {
                line.push_span(Span::styled(
                    format!("  (stored: {})", selected.label()),
                    theme::error_status(&selected),
                ));
            }
            frame.render_widget(Paragraph::new(line), layout[0]);
        }

        frame.render_widget(
            Paragraph::new(self.body())
                .wrap(Wrap { trim: false })
                .scroll((self.scroll, 0)),
            layout[1],
        );

        let mut hints = vec![
            Span::styled(" j/k ", theme::key_hint_key()),
            Span::styled("scroll  ", theme::key_hint()),
        ];
        if self.selected_status().is_some() {
            hints.push(Span::styled("←/→ ", theme::key_hint_key()));
            hints.push(Span::styled("change status  ", theme::key_hint()));
        }
        hints.push(Span::styled("Esc ", theme::key_hint_key()));
        hints.push(Span::styled("close", theme::key_hint()));
        frame.render_widget(Paragraph::new(Line::from(hints)), layout[2]);
    }

}
