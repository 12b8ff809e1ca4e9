//! Containers screen: Docker containers on the monitored host.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState};

use logwatch_api::ContainerRecord;

use crate::action::{Action, Loaded};
use crate::component::Component;
use crate::theme;
use crate::widgets::fmt;

pub struct ContainersScreen {
    focused: bool,
    containers: Vec<ContainerRecord>,
    loaded: bool,
    table_state: TableState,
}

impl ContainersScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            containers: Vec::new(),
            loaded: false,
            table_state: TableState::default(),
        }
    }

    fn selected(&self) -> Option<&ContainerRecord> {
        self.containers.get(self.table_state.selected().unwrap_or(0))
    }

    fn move_selection(&mut self, delta: isize) {
        if self.containers.is_empty() {
            return;
        }
        let current = self.table_state.selected().unwrap_or(0);
        let next = current
            .saturating_add_signed(delta)
            .min(self.containers.len() - 1);
        self.table_state.select(Some(next));
    }
}

impl Default for ContainersScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ContainersScreen {
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
            KeyCode::Enter | KeyCode::Char('l') => {
                self.selected().map(|c| Action::ShowContainerLogs {
                    id: c.id.clone(),
                    name: c.name.clone(),
                })
            }
            KeyCode::Char('r') => Some(Action::LoadContainers),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::Loaded(_, Loaded::Containers(containers)) = action {
            self.containers.clone_from(containers);
            self.loaded = true;
            let selected = self.table_state.selected().unwrap_or(0);
            self.table_state.select(if self.containers.is_empty() {
                None
            } else {
                Some(selected.min(self.containers.len() - 1))
            });
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = if self.loaded {
            format!(" Containers ({}) ", self.containers.len())
        } else {
            " Containers ".to_owned()
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

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);

        if !self.loaded {
            frame.render_widget(
                Paragraph::new("  Loading containers…").style(theme::empty_state()),
                layout[0],
            );
        } else if self.containers.is_empty() {
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from(""),
                    Line::from(Span::styled("  No containers", theme::title_style())),
                    Line::from(Span::styled(
                        "  No Docker containers were found on the monitored host",
                        theme::empty_state(),
                    )),
                ]),
                layout[0],
            );
        } else {
            let header =
                Row::new(["", "Name", "ID", "Image", "Status", "Created"]).style(theme::table_header());
            let rows: Vec<Row> = self
                .containers
                .iter()
                .map(|c| {
                    let state = theme::container_state(c.status);
                    Row::new(vec![
                        Cell::from("●").style(state),
                        Cell::from(c.name.clone()).style(Style::default().fg(theme::NEON_CYAN)),
                        Cell::from(c.id.clone()),
                        Cell::from(c.image.clone()),
                        Cell::from(c.status.to_string()).style(state),
                        Cell::from(
                            c.created
                                .as_deref()
                                .map_or_else(|| "─".to_owned(), fmt::format_timestamp),
                        ),
                    ])
                    .style(theme::table_row())
                })
                .collect();

            let table = Table::new(
                rows,
                [
                    Constraint::Length(1),
                    Constraint::Length(24),
                    Constraint::Length(13),
                    Constraint::Min(20),
                    Constraint::Length(11),
                    Constraint::Length(19),
                ],
            )
            .header(header)
            .row_highlight_style(theme::table_selected());

            let mut state = self.table_state.clone();
            frame.render_stateful_widget(table, layout[0], &mut state);
        }

        let hints = Line::from(vec![
            Span::styled("  j/k ", theme::key_hint_key()),
            Span::styled("select  ", theme::key_hint()),
            Span::styled("Enter/l ", theme::key_hint_key()),
            Span::styled("logs  ", theme::key_hint()),
            Span::styled("r ", theme::key_hint_key()),
            Span::styled("refresh", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(hints), layout[1]);
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
    use crossterm::event::KeyModifiers;
    use serde_json::json;

    use crate::action::{RequestId, Resource};
    use crate::test_util::buffer_text;

    fn loaded(containers: serde_json::Value) -> Action {
        Action::Loaded(
            RequestId {
                resource: Resource::Containers,
                generation: 1,
            },
            Loaded::Containers(serde_json::from_value(containers).unwrap()),
        )
    }

    #[test]
    fn empty_list_renders_empty_state() {
        let mut screen = ContainersScreen::new();
        screen.update(&loaded(json!([]))).unwrap();

        let text = buffer_text(100, 12, |f| screen.render(f, f.area()));
        assert!(text.contains("No containers"), "{text}");
    }

    #[test]
    fn logs_key_targets_selected_container() {
        let mut screen = ContainersScreen::new();
        screen
            .update(&loaded(json!([
                {"id": "0123456789ab", "name": "web", "image": "nginx", "status": "running"},
                {"id": "ba9876543210", "name": "batch", "image": "job", "status": "exited"}
            ])))
            .unwrap();

        screen
            .handle_key_event(KeyEvent::new(KeyCode::Down, KeyModifiers::NONE))
            .unwrap();
        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE))
            .unwrap();
        match action {
            Some(Action::ShowContainerLogs { id, name }) => {
                assert_eq!(id, "ba9876543210");
                assert_eq!(name, "batch");
            }
            other => panic!("expected ShowContainerLogs, got {other:?}"),
        }

        let text = buffer_text(120, 12, |f| screen.render(f, f.area()));
        assert!(text.contains("exited"));
    }
}
