//! Config screen: the monitor's JSON configuration in an editable buffer.
//!
//! The buffer is only ever replaced by a load. Saving sends the text as-is
//! and never rewrites it, so a rejected edit stays on screen for fixing.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::action::{Action, Loaded};
use crate::component::Component;
use crate::theme;

/// Multi-line text buffer with a character-indexed cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBuffer {
    lines: Vec<String>,
    row: usize,
    col: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
        }
    }
}

impl TextBuffer {
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(str::to_owned).collect();
        if lines.is_empty() {
            lines.push(String::new());
        }
        Self {
            lines,
            row: 0,
            col: 0,
        }
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |l| l.chars().count())
    }

    fn byte_index(&self, row: usize, col: usize) -> usize {
        self.lines.get(row).map_or(0, |l| {
            l.char_indices().nth(col).map_or(l.len(), |(i, _)| i)
        })
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index(self.row, self.col);
        if let Some(line) = self.lines.get_mut(self.row) {
            line.insert(idx, c);
            self.col += 1;
        }
    }

    pub fn newline(&mut self) {
        let idx = self.byte_index(self.row, self.col);
        let Some(line) = self.lines.get_mut(self.row) else {
            return;
        };
        let rest = line.split_off(idx);
        self.lines.insert(self.row + 1, rest);
        self.row += 1;
        self.col = 0;
    }

    pub fn backspace(&mut self) {
        if self.col > 0 {
            let start = self.byte_index(self.row, self.col - 1);
            let end = self.byte_index(self.row, self.col);
            if let Some(line) = self.lines.get_mut(self.row) {
                line.replace_range(start..end, "");
                self.col -= 1;
            }
        } else if self.row > 0 {
            let current = self.lines.remove(self.row);
            self.row -= 1;
            self.col = self.line_len(self.row);
            if let Some(prev) = self.lines.get_mut(self.row) {
                prev.push_str(&current);
            }
        }
    }

    pub fn delete(&mut self) {
        if self.col < self.line_len(self.row) {
            let start = self.byte_index(self.row, self.col);
            let end = self.byte_index(self.row, self.col + 1);
            if let Some(line) = self.lines.get_mut(self.row) {
                line.replace_range(start..end, "");
            }
        } else if self.row + 1 < self.lines.len() {
            let next = self.lines.remove(self.row + 1);
            if let Some(line) = self.lines.get_mut(self.row) {
                line.push_str(&next);
            }
        }
    }

    pub fn move_left(&mut self) {
        if self.col > 0 {
            self.col -= 1;
        } else if self.row > 0 {
            self.row -= 1;
            self.col = self.line_len(self.row);
        }
    }

    pub fn move_right(&mut self) {
        if self.col < self.line_len(self.row) {
            self.col += 1;
        } else if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.row > 0 {
            self.row -= 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn move_down(&mut self) {
        if self.row + 1 < self.lines.len() {
            self.row += 1;
            self.col = self.col.min(self.line_len(self.row));
        }
    }

    pub fn home(&mut self) {
        self.col = 0;
    }

    pub fn end(&mut self) {
        self.col = self.line_len(self.row);
    }
}

pub struct ConfigScreen {
    focused: bool,
    buffer: TextBuffer,
    editing: bool,
    loaded: bool,
    /// First visible line while browsing.
    scroll: usize,
}

impl ConfigScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            buffer: TextBuffer::default(),
            editing: false,
            loaded: false,
            scroll: 0,
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.editing = false,
            KeyCode::Enter => self.buffer.newline(),
            KeyCode::Backspace => self.buffer.backspace(),
            KeyCode::Delete => self.buffer.delete(),
            KeyCode::Left => self.buffer.move_left(),
            KeyCode::Right => self.buffer.move_right(),
            KeyCode::Up => self.buffer.move_up(),
            KeyCode::Down => self.buffer.move_down(),
            KeyCode::Home => self.buffer.home(),
            KeyCode::End => self.buffer.end(),
            KeyCode::Tab => {
                self.buffer.insert_char(' ');
                self.buffer.insert_char(' ');
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.buffer.insert_char(c);
            }
            _ => {}
        }
    }
}

impl Default for ConfigScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ConfigScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('s') => return Ok(Some(Action::SaveConfig(self.buffer.text()))),
                KeyCode::Char('r') => return Ok(Some(Action::LoadConfig)),
                _ => {}
            }
        }

        if self.editing {
            self.handle_edit_key(key);
            return Ok(None);
        }

        let action = match key.code {
            KeyCode::Char('e' | 'i') | KeyCode::Enter => {
                if self.loaded {
                    self.editing = true;
                }
                None
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.scroll = (self.scroll + 1).min(self.buffer.lines.len().saturating_sub(1));
                None
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll = self.scroll.saturating_sub(1);
                None
            }
            KeyCode::Char('r') => Some(Action::LoadConfig),
            _ => None,
        };
        Ok(action)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        if let Action::Loaded(_, Loaded::Config(value)) = action {
            let text = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
            self.buffer = TextBuffer::from_text(&text);
            self.loaded = true;
            self.editing = false;
            self.scroll = 0;
        }
        Ok(None)
    }

    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    fn render(&self, frame: &mut Frame, area: Rect) {
        let title = if self.editing {
            " Config [editing] "
        } else {
            " Config "
        };
        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.editing {
                Style::default().fg(theme::ELECTRIC_YELLOW)
            } else if self.focused {
                theme::border_focused()
            } else {
                theme::border_default()
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(inner);
        let text_area = layout[0];

        if self.loaded {
            let height = usize::from(text_area.height.max(1));
            let (row, col) = self.buffer.cursor();
            let scroll = if self.editing {
                row.saturating_sub(height - 1)
            } else {
                self.scroll
            };

            let lines: Vec<Line> = self
                .buffer
                .lines
                .iter()
                .skip(scroll)
                .take(height)
                .map(|l| Line::from(Span::styled(l.as_str(), Style::default().fg(theme::DIM_WHITE))))
                .collect();
            frame.render_widget(Paragraph::new(lines), text_area);

            if self.editing && self.focused {
                frame.set_cursor_position(Position::new(
                    text_area.x + (col as u16).min(text_area.width.saturating_sub(1)),
                    text_area.y + (row - scroll) as u16,
                ));
            }
        } else {
            frame.render_widget(
                Paragraph::new("  Loading config…").style(theme::empty_state()),
                text_area,
            );
        }

        let hints = if self.editing {
            vec![
                Span::styled("  Esc ", theme::key_hint_key()),
                Span::styled("stop editing  ", theme::key_hint()),
                Span::styled("Ctrl+S ", theme::key_hint_key()),
                Span::styled("save  ", theme::key_hint()),
                Span::styled("Ctrl+R ", theme::key_hint_key()),
                Span::styled("reload", theme::key_hint()),
            ]
        } else {
            vec![
                Span::styled("  e ", theme::key_hint_key()),
                Span::styled("edit  ", theme::key_hint()),
                Span::styled("j/k ", theme::key_hint_key()),
                Span::styled("scroll  ", theme::key_hint()),
                Span::styled("Ctrl+S ", theme::key_hint_key()),
                Span::styled("save  ", theme::key_hint()),
                Span::styled("r ", theme::key_hint_key()),
                Span::styled("reload", theme::key_hint()),
            ]
        };
        frame.render_widget(Paragraph::new(Line::from(hints)), layout[1]);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
        if !focused {
            self.editing = false;
        }
    }

    fn captures_input(&self) -> bool {
        self.editing
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::action::{RequestId, Resource};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_screen() -> ConfigScreen {
        let mut screen = ConfigScreen::new();
        screen
            .update(&Action::Loaded(
                RequestId {
                    resource: Resource::Config,
                    generation: 1,
                },
                Loaded::Config(json!({ "ai": { "enabled": true } })),
            ))
            .unwrap();
        screen
    }

    #[test]
    fn config_is_pretty_printed_with_two_spaces() {
        let screen = loaded_screen();
        assert_eq!(
            screen.buffer.text(),
            "{\n  \"ai\": {\n    \"enabled\": true\n  }\n}"
        );
    }

    #[test]
    fn save_sends_buffer_verbatim() {
        let mut screen = loaded_screen();
        screen.handle_key_event(key(KeyCode::Char('e'))).unwrap();
        screen.handle_key_event(key(KeyCode::Char('x'))).unwrap();

        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL))
            .unwrap();
        match action {
            Some(Action::SaveConfig(text)) => assert!(text.starts_with("x{")),
            other => panic!("expected SaveConfig, got {other:?}"),
        }
        // Still editing, buffer untouched by the save.
        assert!(screen.captures_input());
        assert!(screen.buffer.text().starts_with("x{"));
    }

    #[test]
    fn editing_keys_modify_buffer() {
        let mut buffer = TextBuffer::from_text("ab\ncd");
        buffer.move_right();
        buffer.newline();
        assert_eq!(buffer.text(), "a\nb\ncd");
        assert_eq!(buffer.cursor(), (1, 0));

        buffer.backspace();
        assert_eq!(buffer.text(), "ab\ncd");
        assert_eq!(buffer.cursor(), (0, 1));

        buffer.end();
        buffer.delete();
        assert_eq!(buffer.text(), "abcd");

        buffer.insert_char('é');
        buffer.move_left();
        buffer.delete();
        assert_eq!(buffer.text(), "abcd");
    }

    #[test]
    fn escape_leaves_edit_mode() {
        let mut screen = loaded_screen();
        screen.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(screen.captures_input());
        screen.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(!screen.captures_input());
    }
}
