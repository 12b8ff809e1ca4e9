//! Dashboard screen: overview of the monitor's error counts.
//!
//! ┌─ Monitor status ─────────────────────────────────────────────────┐
//! │ [Total] [Today] [Unresolved] [Critical]                          │
//! │ Daily trend (Braille line)      │ Top error types (bars)         │
//! │ Recent errors                                                    │
//! └──────────────────────────────────────────────────────────────────┘

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, BorderType, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table,
    TableState,
};

use logwatch_api::{ErrorRecord, MonitorStatus, Stats, TypeCount};

use crate::action::{Action, Loaded};
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt::{self, truncate};

/// Number of error types shown in the breakdown.
const TOP_TYPES: usize = 5;

pub struct DashboardScreen {
    focused: bool,
    stats: Option<Stats>,
    /// Chart data: `(day_index, count)`, rebuilt on every stats load.
    trend: Vec<(f64, f64)>,
    trend_dates: Vec<String>,
    top_types: Vec<TypeCount>,
    recent: Vec<ErrorRecord>,
    recent_loaded: bool,
    monitor: Option<MonitorStatus>,
    table_state: TableState,
}

impl DashboardScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            stats: None,
            trend: Vec::new(),
            trend_dates: Vec::new(),
            top_types: Vec::new(),
            recent: Vec::new(),
            recent_loaded: false,
            monitor: None,
            table_state: TableState::default(),
        }
    }

    /// Replace both charts wholesale from a fresh stats payload.
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn apply_stats(&mut self, stats: &Stats) {
        self.trend = stats
            .daily_trend
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.count as f64))
            .collect();
        self.trend_dates = stats.daily_trend.iter().map(|p| p.date.clone()).collect();
        self.top_types = stats.error_types.iter().take(TOP_TYPES).cloned().collect();
        self.stats = Some(stats.clone());
    }

    fn move_selection(&mut self, delta: isize) {
        if self.recent.is_empty() {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current.saturating_add_signed(delta).min(self.recent.len() - 1);
        self.table_state.select(Some(next));
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let status = match &self.monitor {
            Some(m) if m.running => {
                let mut spans = vec![Span::styled(
                    " ● monitor running",
                    Style::default().fg(theme::SUCCESS_GREEN),
                )];
                if let Some(uptime) = &m.uptime {
                    spans.push(Span::styled(format!("  ·  up {uptime}"), theme::key_hint()));
                }
                if let Some(last) = &m.last_check {
                    spans.push(Span::styled(
                        format!("  ·  last check {}", fmt::format_timestamp(last)),
                        theme::key_hint(),
                    ));
                }
                spans
            }
            Some(_) => vec![Span::styled(
                " ○ monitor stopped",
                Style::default().fg(theme::ERROR_RED),
            )],
            None => vec![Span::styled(" ◌ monitor status unknown", theme::key_hint())],
        };
        frame.render_widget(Paragraph::new(Line::from(status)), area);
    }

    fn render_cards(&self, frame: &mut Frame, area: Rect) {
        let cards = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
        let values = self.stats.as_ref().map_or([None; 4], |s| {
            [
                Some(s.total_errors),
                Some(s.today_errors),
                Some(s.unresolved),
                Some(s.critical_errors),
            ]
        });
        let specs: [(&str, Color); 4] = [
            ("Total errors", theme::NEON_CYAN),
            ("Today", theme::LIGHT_BLUE),
            ("Unresolved", theme::ELECTRIC_YELLOW),
            ("Critical", theme::ERROR_RED),
        ];

        for ((rect, (label, color)), value) in cards.iter().zip(specs).zip(values) {
            let block = Block::default()
                .title(format!(" {label} "))
                .title_style(Style::default().fg(theme::DIM_WHITE))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color));
            let text = value.map_or_else(|| "─".to_owned(), |v| v.to_string());
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!(" {text}"),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ))
                .block(block),
                *rect,
            );
        }
    }

    fn render_trend(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Daily trend ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        if self.trend.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  No trend data yet").style(theme::empty_state()),
                inner,
            );
            return;
        }

        let x_max = self.trend.last().map_or(1.0, |(x, _)| *x).max(1.0);
        let y_max = self.trend.iter().map(|(_, y)| *y).fold(0.0f64, f64::max) * 1.1;
        let first = self.trend_dates.first().cloned().unwrap_or_default();
        let last = self.trend_dates.last().cloned().unwrap_or_default();

        let dataset = Dataset::default()
            .name("errors")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme::NEON_CYAN))
            .data(&self.trend);

        let chart = Chart::new(vec![dataset])
            .block(block)
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(theme::BORDER_GRAY))
                    .bounds([0.0, x_max])
                    .labels([first, last]),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(theme::BORDER_GRAY))
                    .bounds([0.0, y_max.max(1.0)])
                    .labels(["0".to_owned(), format!("{:.0}", y_max.max(1.0))]),
            );

        frame.render_widget(chart, area);
    }

    /// Error types as horizontal bars scaled to the largest count.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    fn render_types(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Top error types ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.top_types.is_empty() {
            frame.render_widget(
                Paragraph::new("  No error types recorded").style(theme::empty_state()),
                inner,
            );
            return;
        }

        let bar_budget = inner.width.saturating_sub(26) as usize;
        let colors = theme::CHART_SERIES;
        let max_count = self.top_types.iter().map(|t| t.count).max().unwrap_or(1).max(1);

        let lines: Vec<Line> = self
            .top_types
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let fraction = t.count as f64 / max_count as f64;
                let bar_width = (fraction * bar_budget as f64).round().max(1.0) as usize;
                let color = colors[i % colors.len()];
                Line::from(vec![
                    Span::styled(
                        format!("  {:<16} ", truncate(&t.error_type, 13)),
                        Style::default().fg(theme::DIM_WHITE),
                    ),
                    Span::styled("█".repeat(bar_width.min(bar_budget)), Style::default().fg(color)),
                    Span::styled(format!(" {:>5}", t.count), Style::default().fg(theme::DIM_WHITE)),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_recent(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Recent errors ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        if self.recent_loaded && self.recent.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(
                Paragraph::new("  No error records").style(theme::empty_state()),
                inner,
            );
            return;
        }

        let header = Row::new(["Time", "Container", "Message", "Severity", "Status"])
            .style(theme::table_header());
        let rows: Vec<Row> = self
            .recent
            .iter()
            .map(|e| {
                Row::new(vec![
                    Cell::from(fmt::format_timestamp(&e.timestamp)),
                    Cell::from(e.container_name.clone()).style(theme::container_name()),
                    Cell::from(truncate(&e.error_message, 80)),
                    Cell::from(fmt::severity_label(e.severity.as_ref()))
                        .style(theme::severity(e.severity.as_ref())),
                    Cell::from(e.status.label()).style(theme::error_status(&e.status)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(19),
                Constraint::Length(18),
                Constraint::Min(20),
                Constraint::Length(9),
                Constraint::Length(13),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(theme::table_selected());

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }
}

impl Default for DashboardScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for DashboardScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Enter => self
                .recent
                .get(self.table_state.selected().unwrap_or(0))
                .map(|e| Action::ShowErrorDetail(e.id)),
            KeyCode::Char('r') => Some(Action::LoadDashboard),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Loaded(_, Loaded::Stats(stats)) => self.apply_stats(stats),
            Action::Loaded(_, Loaded::RecentErrors(errors)) => {
                self.recent.clone_from(errors);
                self.recent_loaded = true;
                self.table_state
                    .select((!self.recent.is_empty()).then_some(0));
            }
            Action::Loaded(_, Loaded::MonitorStatus(status)) => {
                self.monitor = Some(status.clone());
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(" Dashboard ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([
            Constraint::Length(1), // monitor status
            Constraint::Length(3), // stat cards
            Constraint::Min(8),    // charts
            Constraint::Length(8), // recent errors
            Constraint::Length(1), // hints
        ])
        .split(inner);

        self.render_header(frame, layout[0]);
        self.render_cards(frame, layout[1]);

        let charts =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(layout[2]);
        self.render_trend(frame, charts[0]);
        self.render_types(frame, charts[1]);

        self.render_recent(frame, layout[3]);

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("select  ", theme::key_hint()),
            Span::styled("Enter ", theme::key_hint_key()),
            Span::styled("detail  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("refresh", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[4]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use logwatch_api::TrendPoint;
    use pretty_assertions::assert_eq;

    use crate::action::{RequestId, Resource};
    use crate::test_util::buffer_text;

    fn stats_action(types: usize) -> Action {
        let stats = Stats {
            total_errors: 120,
            today_errors: 8,
            unresolved: 30,
            critical_errors: 4,
            daily_trend: vec![
                TrendPoint { date: "2024-06-14".into(), count: 5 },
                TrendPoint { date: "2024-06-15".into(), count: 8 },
            ],
            error_types: (0..types)
                .map(|i| TypeCount {
                    error_type: format!("Type{i}"),
                    count: 10 - i as u64,
                })
                .collect(),
            containers: Vec::new(),
        };
        Action::Loaded(
            RequestId { resource: Resource::Stats, generation: 1 },
            Loaded::Stats(Box::new(stats)),
        )
    }

    #[test]
    fn stats_replace_charts_and_keep_top_five_types() {
        let mut screen = DashboardScreen::new();
        screen.update(&stats_action(8)).unwrap();
        screen.update(&stats_action(2)).unwrap();

        assert_eq!(screen.top_types.len(), 2);
        assert_eq!(screen.trend, vec![(0.0, 5.0), (1.0, 8.0)]);

        screen.update(&stats_action(8)).unwrap();
        assert_eq!(screen.top_types.len(), TOP_TYPES);
        assert_eq!(screen.top_types[0].error_type, "Type0");
    }

    #[test]
    fn cards_show_counts() {
        let mut screen = DashboardScreen::new();
        screen.update(&stats_action(1)).unwrap();

        let text = buffer_text(120, 32, |f| screen.render(f, f.area()));
        assert!(text.contains("120"), "{text}");
        assert!(text.contains("Unresolved"));
        assert!(text.contains("monitor status unknown"));
    }
}
