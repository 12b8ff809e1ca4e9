//! Text helpers shared by every screen.

use chrono::{DateTime, Local, NaiveDateTime};

use logwatch_api::Severity;

/// Cut `text` to `max` characters, appending `...` when anything was cut.
pub fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Render a backend timestamp as local `YYYY-MM-DD HH:MM:SS`.
///
/// Timestamps without an offset are already local to the monitor host and
/// are shown as-is. Anything unparseable is returned verbatim.
pub fn format_timestamp(raw: &str) -> String {
    const OUT: &str = "%Y-%m-%d %H:%M:%S";

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Local).format(OUT).to_string();
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return dt.format(OUT).to_string();
        }
    }
    raw.to_owned()
}

/// Severity text: the backend's own value when it is one this client
/// doesn't know, `N/A` when the analyzer assigned none.
pub fn severity_label(severity: Option<&Severity>) -> String {
    severity.map_or_else(|| "N/A".to_owned(), ToString::to_string)
}
