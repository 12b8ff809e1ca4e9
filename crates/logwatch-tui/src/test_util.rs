//! Shared fixtures for unit tests.

#![allow(clippy::unwrap_used)]

use ratatui::{Frame, Terminal, backend::TestBackend};
use serde_json::{Value, json};

use logwatch_api::ErrorRecord;

/// Draw once into an in-memory terminal and return the screen as text,
/// one line per row.
pub fn buffer_text(width: u16, height: u16, draw: impl FnOnce(&mut Frame)) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(draw).unwrap();

    let buffer = terminal.backend().buffer();
    let mut out = String::new();
    for y in 0..buffer.area.height {
        for x in 0..buffer.area.width {
            out.push_str(buffer[(x, y)].symbol());
        }
        out.push('\n');
    }
    out
}

/// Wire JSON of an error record as the backend sends it.
pub fn record_json(id: i64, status: &str) -> Value {
    json!({
        "id": id,
        "timestamp": "2024-06-15T10:30:00.123456",
        "container_name": "web",
        "error_type": "ConnectionError",
        "error_message": format!("upstream connect error #{id}"),
        "log_content": "line 1\nline 2",
        "severity": "critical",
        "ai_analysis": "The upstream refused connections.",
        "ai_solution": null,
        "status": status
    })
}

pub fn record(id: i64, status: &str) -> ErrorRecord {
    serde_json::from_value(record_json(id, status)).unwrap()
}
