//! Page navigation for the error list: `‹ Prev  1 2 3 … 10  Next ›`.
//!
//! At most ten numbered links are shown regardless of the page count;
//! later pages stay reachable through Next.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::theme;

/// Highest page number that gets its own link.
pub const MAX_PAGE_LINKS: u32 = 10;

/// Position in the result set, as reported by the last applied fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total: u64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            total: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Prev,
    Page(u32),
    Next,
}

/// One clickable entry of the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLink {
    pub kind: LinkKind,
    /// Page requested when the link is activated.
    pub target: u32,
    pub disabled: bool,
    pub active: bool,
}

impl PageLink {
    /// Page to load, or `None` for a disabled link.
    pub fn activate(self) -> Option<u32> {
        (!self.disabled).then_some(self.target)
    }
}

impl Pagination {
    /// Navigation links; empty when everything fits on one page.
    pub fn links(&self) -> Vec<PageLink> {
        let (current, total) = (self.current_page, self.total_pages);
        if total <= 1 {
            return Vec::new();
        }

        let mut links = Vec::with_capacity(total.min(MAX_PAGE_LINKS) as usize + 2);
        links.push(PageLink {
            kind: LinkKind::Prev,
            target: current.saturating_sub(1),
            disabled: current == 1,
            active: false,
        });
        links.extend((1..=total.min(MAX_PAGE_LINKS)).map(|n| PageLink {
            kind: LinkKind::Page(n),
            target: n,
            disabled: false,
            active: n == current,
        }));
        links.push(PageLink {
            kind: LinkKind::Next,
            target: current + 1,
            disabled: current == total,
            active: false,
        });
        links
    }

    /// Target of the Prev link, if it is enabled.
    pub fn prev(&self) -> Option<u32> {
        self.links()
            .into_iter()
            .find(|l| l.kind == LinkKind::Prev)
            .and_then(PageLink::activate)
    }

    /// Target of the Next link, if it is enabled.
    pub fn next(&self) -> Option<u32> {
        self.links()
            .into_iter()
            .find(|l| l.kind == LinkKind::Next)
            .and_then(PageLink::activate)
    }
}

/// Render links as a single line; `cursor` marks the keyboard-focused link.
pub fn render_pagination(links: &[PageLink], cursor: Option<usize>) -> Line<'static> {
    let mut spans = Vec::with_capacity(links.len() * 2);
    for (i, link) in links.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let label = match link.kind {
            LinkKind::Prev => "‹ Prev".to_owned(),
            LinkKind::Page(n) => format!(" {n} "),
            LinkKind::Next => "Next ›".to_owned(),
        };
        let mut style = if link.disabled {
            Style::default().fg(theme::BORDER_GRAY).add_modifier(Modifier::DIM)
        } else if link.active {
            theme::tab_active().add_modifier(Modifier::REVERSED)
        } else {
            theme::tab_inactive()
        };
        if cursor == Some(i) {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        spans.push(Span::styled(label, style));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(current_page: u32, total_pages: u32) -> Pagination {
        Pagination {
            current_page,
            total_pages,
            total: 0,
        }
    }

    #[test]
    fn single_page_has_no_controls() {
        assert!(at(1, 1).links().is_empty());
        assert!(at(1, 0).links().is_empty());
    }

    #[test]
    fn numbered_links_are_capped_at_ten() {
        let links = at(1, 25).links();
        assert_eq!(links.len(), 12);
        assert_eq!(links[1].kind, LinkKind::Page(1));
        assert_eq!(links[10].kind, LinkKind::Page(10));
        assert_eq!(links[11].kind, LinkKind::Next);
    }

    #[test]
    fn first_page_disables_prev_only() {
        let p = at(1, 3);
        let links = p.links();
        assert!(links[0].disabled);
        assert!(links[1].active);
        assert!(!links[4].disabled);
        assert_eq!(p.prev(), None);
        assert_eq!(p.next(), Some(2));
    }

    #[test]
    fn last_page_disables_next_only() {
        let p = at(3, 3);
        assert_eq!(p.prev(), Some(2));
        assert_eq!(p.next(), None);
        assert!(p.links()[3].active);
    }

    #[test]
    fn page_beyond_the_tenth_keeps_next_enabled() {
        let p = at(12, 25);
        assert_eq!(p.next(), Some(13));
        assert!(p.links().iter().all(|l| !l.active));
    }

    #[test]
    fn rendered_line_contains_every_link() {
        let line = render_pagination(&at(2, 3).links(), None);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "‹ Prev  1   2   3  Next ›");
    }
}
