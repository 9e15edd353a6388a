//! UI rendering module for Hello Weather
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod chart;
pub mod dashboard;
pub mod forecast_table;
pub mod help_overlay;
pub mod map;
pub mod theme;
pub mod widgets;

use ratatui::{widgets::Block, Frame};

use crate::app::App;
use theme::Theme;

/// Draws one frame: the dashboard, then the help overlay if it is open
pub fn render(frame: &mut Frame, app: &mut App) {
    let theme = Theme::new(app.preferences.dark_mode);
    frame.render_widget(Block::default().style(theme.base()), frame.area());

    dashboard::render(frame, app, &theme);

    if app.show_help {
        help_overlay::render(frame, &theme);
    }
}
