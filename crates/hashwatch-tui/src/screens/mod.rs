//! Screen implementations. Each screen is a top-level Component.

pub mod hashrate;
pub mod log;
pub mod overview;
pub mod settings;
pub mod workers;

use hashwatch_core::ProxyConfig;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create screen components for the tab bar.
pub fn create_screens(config: &ProxyConfig) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (
            ScreenId::Overview,
            Box::new(overview::OverviewScreen::new()),
        ),
        (ScreenId::Workers, Box::new(workers::WorkersScreen::new())),
        (
            ScreenId::Hashrate,
            Box::new(hashrate::HashrateScreen::new()),
        ),
        (ScreenId::Log, Box::new(log::LogScreen::new())),
        (
            ScreenId::Settings,
            Box::new(settings::SettingsScreen::new(config)),
        ),
    ]
}
