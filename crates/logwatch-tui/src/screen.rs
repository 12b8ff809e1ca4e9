//! Screen identifiers: the dashboard's closed set of pages.

use std::fmt;

/// Identifies each primary TUI screen, navigable by number keys.
///
/// The dashboard opens on the error list, not the overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    Dashboard, // 1
    #[default]
    Errors, // 2
    Containers, // 3
    Config,     // 4
}

impl ScreenId {
    /// All screens in tab-bar order.
    pub const ALL: [ScreenId; 4] = [
        Self::Dashboard,
        Self::Errors,
        Self::Containers,
        Self::Config,
    ];

    /// Numeric key (1-4) for this screen.
    pub fn number(self) -> u8 {
        match self {
            Self::Dashboard => 1,
            Self::Errors => 2,
            Self::Containers => 3,
            Self::Config => 4,
        }
    }

    /// Screen from a numeric key (1-4). Returns None for out-of-range.
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Dashboard),
            2 => Some(Self::Errors),
            3 => Some(Self::Containers),
            4 => Some(Self::Config),
            _ => None,
        }
    }

    /// Next screen in tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous screen in tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&s| s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Short label for the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Errors => "Errors",
            Self::Containers => "Containers",
            Self::Config => "Config",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_keys_round_trip() {
        for id in ScreenId::ALL {
            assert_eq!(ScreenId::from_number(id.number()), Some(id));
        }
        assert_eq!(ScreenId::from_number(0), None);
        assert_eq!(ScreenId::from_number(5), None);
    }

    #[test]
    fn tab_order_wraps() {
        assert_eq!(ScreenId::Config.next(), ScreenId::Dashboard);
        assert_eq!(ScreenId::Dashboard.prev(), ScreenId::Config);
        assert_eq!(ScreenId::default(), ScreenId::Errors);
    }
}
