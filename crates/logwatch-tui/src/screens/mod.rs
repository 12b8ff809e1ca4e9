//! Screen implementations. Each screen is a top-level Component.

pub mod config;
pub mod containers;
pub mod dashboard;
pub mod errors;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create one component per tab-bar screen.
pub fn create_screens() -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Dashboard,
            Box::new(dashboard::DashboardScreen::new()),
        ),
        (ScreenId::Errors, Box::new(errors::ErrorsScreen::new())),
        (
            ScreenId::Containers,
            Box::new(containers::ContainersScreen::new()),
        ),
        (ScreenId::Config, Box::new(config::ConfigScreen::new())),
    ]
}
