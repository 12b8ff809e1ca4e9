//! Inline choice bar, used for the status selector and filter rows.

use ratatui::style::Modifier;
use ratatui::text::{Line, Span};

use crate::theme;

/// Renders `labels` on one line with the chosen entry bracketed.
///
/// `selected` of `None` renders every entry inactive. `prefix` is drawn
/// first in the key-hint style, e.g. `"Status "`.
pub fn render_sub_tabs<'a>(prefix: &'a str, labels: &[&'a str], selected: Option<usize>) -> Line<'a> {
    let mut spans = Vec::with_capacity(labels.len() * 2 + 1);
    if !prefix.is_empty() {
        spans.push(Span::styled(prefix, theme::key_hint()));
    }

    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", theme::key_hint()));
        }

        if Some(i) == selected {
            spans.push(Span::styled(
                format!("[{label}]"),
                theme::tab_active().add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(*label, theme::tab_inactive()));
        }
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_entry_is_bracketed() {
        let line = render_sub_tabs("Status ", &["New", "Resolved"], Some(1));
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "Status New  [Resolved]");
    }
}
