//! Errors screen: the filterable, paginated error list.
//!
//! The screen owns the editable copy of the filters and pushes every change
//! to the app as `SetFilters`; fetches always read the app's copy.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use logwatch_api::{ErrorRecord, ErrorStatus, Severity};

use crate::action::{Action, Loaded};
use crate::component::Component;
use crate::state::FilterState;
use crate::theme;
use crate::widgets::fmt::{self, truncate};
use crate::widgets::pagination::{Pagination, render_pagination};
use crate::widgets::sub_tabs::render_sub_tabs;

/// Keyboard mode of the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Browse,
    /// Editing the search box; `original` is restored on Esc.
    Search { original: String },
    /// Moving across the pagination links.
    Pages { cursor: usize },
}

pub struct ErrorsScreen {
    focused: bool,
    errors: Vec<ErrorRecord>,
    pagination: Pagination,
    filters: FilterState,
    container_options: Vec<String>,
    table_state: TableState,
    mode: Mode,
    loaded: bool,
}

impl ErrorsScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            errors: Vec::new(),
            pagination: Pagination::default(),
            filters: FilterState::default(),
            container_options: Vec::new(),
            table_state: TableState::default(),
            mode: Mode::Browse,
            loaded: false,
        }
    }

    /// Rows currently listed.
    #[cfg(test)]
    pub fn row_count(&self) -> usize {
        self.errors.len()
    }

    fn selected_index(&self) -> usize {
        self.table_state.selected().unwrap_or(0)
    }

    fn select(&mut self, idx: usize) {
        if self.errors.is_empty() {
            self.table_state.select(None);
        } else {
            self.table_state.select(Some(idx.min(self.errors.len() - 1)));
        }
    }

    fn move_selection(&mut self, delta: isize) {
        if self.errors.is_empty() {
            return;
        }
        let next = self.selected_index().saturating_add_signed(delta);
        self.select(next);
    }

    fn filters_changed(&self) -> Option<Action> {
        Some(Action::SetFilters(self.filters.clone()))
    }

    fn handle_search_key(&mut self, key: KeyEvent, original: String) -> Option<Action> {
        match key.code {
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                Some(Action::LoadErrors(1))
            }
            KeyCode::Esc => {
                self.mode = Mode::Browse;
                self.filters.search = original;
                self.filters_changed()
            }
            KeyCode::Backspace => {
                self.filters.search.pop();
                self.filters_changed()
            }
            KeyCode::Char(c) => {
                self.filters.search.push(c);
                self.filters_changed()
            }
            _ => None,
        }
    }

    fn handle_pages_key(&mut self, key: KeyEvent, cursor: usize) -> Option<Action> {
        let links = self.pagination.links();
        if links.is_empty() {
            self.mode = Mode::Browse;
            return None;
        }
        let cursor = cursor.min(links.len() - 1);
        match key.code {
            KeyCode::Left | KeyCode::Char('h') => {
                self.mode = Mode::Pages {
                    cursor: cursor.saturating_sub(1),
                };
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.mode = Mode::Pages {
                    cursor: (cursor + 1).min(links.len() - 1),
                };
                None
            }
            KeyCode::Enter => links
                .get(cursor)
                .and_then(|link| link.activate())
                .map(Action::LoadErrors),
            KeyCode::Esc | KeyCode::Char('p') => {
                self.mode = Mode::Browse;
                None
            }
            _ => None,
        }
    }

    fn status_index(&self) -> usize {
        self.filters
            .status
            .as_ref()
            .and_then(|s| ErrorStatus::ALL.iter().position(|x| x == s))
            .map_or(0, |i| i + 1)
    }

    fn severity_index(&self) -> usize {
        self.filters
            .severity
            .as_ref()
            .and_then(|s| Severity::ALL.iter().position(|x| x == s))
            .map_or(0, |i| i + 1)
    }

    fn render_filters(&self, frame: &mut Frame, area: Rect) {
        let editing = matches!(self.mode, Mode::Search { .. });
        let mut search = vec![
            Span::styled("Search ", theme::key_hint()),
            Span::styled(
                if self.filters.search.is_empty() && !editing {
                    "(none)".to_owned()
                } else {
                    self.filters.search.clone()
                },
                Style::default().fg(theme::NEON_CYAN),
            ),
        ];
        if editing {
            search.push(Span::styled("█", theme::cursor()));
        }
        search.push(Span::styled("    Container ", theme::key_hint()));
        search.push(Span::styled(
            self.filters.container.as_deref().unwrap_or("Any").to_owned(),
            Style::default().fg(theme::CORAL),
        ));

        let status = render_sub_tabs(
            "Status   ",
            &["Any", "New", "Investigating", "Resolved"],
            Some(self.status_index()),
        );
        let severity = render_sub_tabs(
            "Severity ",
            &["Any", "critical", "error", "warning"],
            Some(self.severity_index()),
        );

        frame.render_widget(
            Paragraph::new(vec![Line::from(search), status, severity]),
            area,
        );
    }

    fn render_table(&self, frame: &mut Frame, area: Rect) {
        if !self.loaded {
            frame.render_widget(
                Paragraph::new("  Loading errors…").style(theme::empty_state()),
                area,
            );
            return;
        }
        if self.errors.is_empty() {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled("  No error records", theme::title_style())),
                    Line::from(Span::styled(
                        if self.filters.is_empty() {
                            "  The monitor has not recorded any errors yet"
                        } else {
                            "  No errors found matching the current filters"
                        },
                        theme::empty_state(),
                    )),
                ]),
                area,
            );
            return;
        }

        let header = Row::new(["Time", "Container", "Type", "Severity", "Status", "Message"])
            .style(theme::table_header());

        let rows: Vec<Row> = self
            .errors
            .iter()
            .map(|e| {
                Row::new(vec![
                    Cell::from(fmt::format_timestamp(&e.timestamp)),
                    Cell::from(e.container_name.clone()).style(theme::container_name()),
                    Cell::from(e.error_type.clone().unwrap_or_else(|| "Unknown".into())),
                    Cell::from(fmt::severity_label(e.severity.as_ref()))
                        .style(theme::severity(e.severity.as_ref())),
                    Cell::from(e.status.label()).style(theme::error_status(&e.status)),
                    Cell::from(truncate(&e.error_message, 200)),
                ])
                .style(theme::table_row())
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(19),
                Constraint::Length(18),
                Constraint::Length(20),
                Constraint::Length(9),
                Constraint::Length(13),
                Constraint::Min(20),
            ],
        )
        .header(header)
        .row_highlight_style(theme::table_selected());

        let mut state = self.table_state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }
}

impl Default for ErrorsScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ErrorsScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        match self.mode.clone() {
            Mode::Search { original } => return Ok(self.handle_search_key(key, original)),
            Mode::Pages { cursor } => return Ok(self.handle_pages_key(key, cursor)),
            Mode::Browse => {}
        }

        let action = match key.code {
            KeyCode::Char('/') => {
                self.mode = Mode::Search {
                    original: self.filters.search.clone(),
                };
                None
            }
            KeyCode::Char('s') => {
                self.filters.cycle_status();
                self.filters_changed()
            }
            KeyCode::Char('v') => {
                self.filters.cycle_severity();
                self.filters_changed()
            }
            KeyCode::Char('c') => {
                self.filters.cycle_container(&self.container_options);
                self.filters_changed()
            }
            KeyCode::Char('x') => {
                self.filters = FilterState::default();
                self.filters_changed()
            }
            KeyCode::Char('a') => Some(Action::LoadErrors(1)),
            KeyCode::Char('j') | KeyCode::Down => {
                self.move_selection(1);
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.move_selection(-1);
                None
            }
            KeyCode::Char('g') => {
                self.select(0);
                None
            }
            KeyCode::Char('G') => {
                self.select(usize::MAX);
                None
            }
            KeyCode::Enter => self
                .errors
                .get(self.selected_index())
                .map(|e| Action::ShowErrorDetail(e.id)),
            KeyCode::Char('[') => self.pagination.prev().map(Action::LoadErrors),
            KeyCode::Char(']') => self.pagination.next().map(Action::LoadErrors),
            KeyCode::Char('p') => {
                let links = self.pagination.links();
                if !links.is_empty() {
                    let cursor = links.iter().position(|l| l.active).unwrap_or(0);
                    self.mode = Mode::Pages { cursor };
                }
                None
            }
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Loaded(_, Loaded::Errors { page, data }) => {
                self.errors.clone_from(&data.errors);
                self.pagination = Pagination {
                    current_page: *page,
                    total_pages: data.pages,
                    total: data.total,
                };
                self.loaded = true;
                let selected = self.selected_index();
                self.select(selected);
            }
            Action::Loaded(_, Loaded::FilterOptions(containers)) => {
                self.container_options = containers.iter().map(|c| c.name.clone()).collect();
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = if self.loaded {
            format!(
                " Errors ({} total · page {}/{}) ",
                self.pagination.total,
                self.pagination.current_page,
                self.pagination.total_pages.max(1)
            )
        } else {
            " Errors ".to_owned()
        };
        let block = Block::default()
            .title(title)
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
            Constraint::Length(3), // filters
            Constraint::Length(1), // spacer
            Constraint::Min(1),    // table
            Constraint::Length(1), // pagination
            Constraint::Length(1), // hints
        ])
        .split(inner);

        self.render_filters(frame, layout[0]);
        self.render_table(frame, layout[2]);

        let cursor = match self.mode {
            Mode::Pages { cursor } => Some(cursor),
            _ => None,
        };
        frame.render_widget(
            Paragraph::new(render_pagination(&self.pagination.links(), cursor))
                .alignment(ratatui::layout::Alignment::Center),
            layout[3],
        );

        let hints = match self.mode {
            Mode::Search { .. } => vec![
                Span::styled("  Enter ", theme::key_hint_key()),
                Span::styled("search  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ],
            Mode::Pages { .. } => vec![
                Span::styled("  ←/→ ", theme::key_hint_key()),
                Span::styled("choose page  ", theme::key_hint()),
                Span::styled("Enter ", theme::key_hint_key()),
                Span::styled("go  ", theme::key_hint()),
                Span::styled("Esc ", theme::key_hint_key()),
                Span::styled("done", theme::key_hint()),
            ],
            Mode::Browse => vec![
                Span::styled("  / ", theme::key_hint_key()),
                Span::styled("search  ", theme::key_hint()),
                Span::styled("s/v/c ", theme::key_hint_key()),
                Span::styled("status/severity/container  ", theme::key_hint()),
                Span::styled("a ", theme::key_hint_key()),
                Span::styled("apply  ", theme::key_hint()),
                Span::styled("x ", theme::key_hint_key()),
                Span::styled("clear  ", theme::key_hint()),
                Span::styled("[ ] ", theme::key_hint_key()),
                Span::styled("prev/next  ", theme::key_hint()),
                Span::styled("p ", theme::key_hint_key()),
                Span::styled("pages  ", theme::key_hint()),
                Span::styled("Enter ", theme::key_hint_key()),
                Span::styled("detail", theme::key_hint()),
            ],
        };
        frame.render_widget(Paragraph::new(Line::from(hints)), layout[4]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn captures_input(&self) -> bool {
        self.mode != Mode::Browse
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use logwatch_api::ErrorPage;
    use pretty_assertions::assert_eq;

    use crate::action::{RequestId, Resource};
    use crate::test_util::{buffer_text, record};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded(page: u32, pages: u32, errors: Vec<ErrorRecord>) -> Action {
        let total = errors.len() as u64;
        Action::Loaded(
            RequestId {
                resource: Resource::ErrorList,
                generation: 1,
            },
            Loaded::Errors {
                page,
                data: ErrorPage {
                    errors,
                    pages,
                    total,
                    current_page: Some(page),
                },
            },
        )
    }

    #[test]
    fn empty_result_renders_empty_state() {
        let mut screen = ErrorsScreen::new();
        screen.update(&loaded(1, 0, Vec::new())).unwrap();

        assert_eq!(screen.row_count(), 0);
        let text = buffer_text(120, 20, |f| screen.render(f, f.area()));
        assert!(text.contains("No error records"), "{text}");
        assert!(text.contains("not recorded any errors"), "{text}");
        assert!(!text.contains("Prev"));

        screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE))
            .unwrap();
        let text = buffer_text(120, 20, |f| screen.render(f, f.area()));
        assert!(text.contains("No errors found matching"), "{text}");
    }

    #[test]
    fn loaded_page_lists_rows_and_pagination() {
        let mut screen = ErrorsScreen::new();
        screen
            .update(&loaded(2, 3, vec![record(1, "new"), record(2, "resolved")]))
            .unwrap();

        assert_eq!(screen.row_count(), 2);
        let text = buffer_text(140, 20, |f| screen.render(f, f.area()));
        assert!(text.contains("upstream connect error #2"), "{text}");
        assert!(text.contains("Next"));
    }

    #[test]
    fn search_edits_push_filters_and_enter_applies() {
        let mut screen = ErrorsScreen::new();
        assert!(screen.handle_key_event(key(KeyCode::Char('/'))).unwrap().is_none());
        assert!(screen.captures_input());

        let action = screen.handle_key_event(key(KeyCode::Char('o'))).unwrap();
        match action {
            Some(Action::SetFilters(f)) => assert_eq!(f.search, "o"),
            other => panic!("expected SetFilters, got {other:?}"),
        }

        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(action, Some(Action::LoadErrors(1))));
        assert!(!screen.captures_input());
    }

    #[test]
    fn escape_restores_previous_search() {
        let mut screen = ErrorsScreen::new();
        screen.filters.search = "db".into();
        screen.handle_key_event(key(KeyCode::Char('/'))).unwrap();
        screen.handle_key_event(key(KeyCode::Char('x'))).unwrap();

        let action = screen.handle_key_event(key(KeyCode::Esc)).unwrap();
        match action {
            Some(Action::SetFilters(f)) => assert_eq!(f.search, "db"),
            other => panic!("expected SetFilters, got {other:?}"),
        }
    }

    #[test]
    fn prev_is_inert_on_first_page() {
        let mut screen = ErrorsScreen::new();
        screen.update(&loaded(1, 3, vec![record(1, "new")])).unwrap();

        assert!(screen.handle_key_event(key(KeyCode::Char('['))).unwrap().is_none());
        assert!(matches!(
            screen.handle_key_event(key(KeyCode::Char(']'))).unwrap(),
            Some(Action::LoadErrors(2))
        ));
    }

    #[test]
    fn page_links_are_navigable() {
        let mut screen = ErrorsScreen::new();
        screen.update(&loaded(1, 3, vec![record(1, "new")])).unwrap();

        screen.handle_key_event(key(KeyCode::Char('p'))).unwrap();
        screen.handle_key_event(key(KeyCode::Right)).unwrap();
        screen.handle_key_event(key(KeyCode::Right)).unwrap();
        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(action, Some(Action::LoadErrors(3))));

        // Cursor back onto the disabled Prev link.
        for _ in 0..5 {
            screen.handle_key_event(key(KeyCode::Left)).unwrap();
        }
        assert!(screen.handle_key_event(key(KeyCode::Enter)).unwrap().is_none());
    }

    #[test]
    fn enter_opens_detail_of_selected_row() {
        let mut screen = ErrorsScreen::new();
        screen
            .update(&loaded(1, 1, vec![record(4, "new"), record(9, "new")]))
            .unwrap();
        screen.handle_key_event(key(KeyCode::Char('j'))).unwrap();

        let action = screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(action, Some(Action::ShowErrorDetail(9))));
    }
}
