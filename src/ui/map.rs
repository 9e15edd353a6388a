//! World map panel
//!
//! Draws the world on a canvas spanning the full longitude and latitude
//! range, with a marker at the current location. The same projection turns
//! mouse clicks back into coordinates.

use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::{
        canvas::{Canvas, Map, MapResolution},
        Block, Borders,
    },
    Frame,
};

use super::theme::Theme;
use crate::data::Location;

const LON_BOUNDS: [f64; 2] = [-180.0, 180.0];
const LAT_BOUNDS: [f64; 2] = [-90.0, 90.0];

/// Converts a terminal cell inside the map's inner area to coordinates
///
/// Uses the centre of the cell. Returns `None` for cells outside `area`.
pub fn location_at(area: Rect, column: u16, row: u16) -> Option<Location> {
    if area.width == 0 || area.height == 0 {
        return None;
    }
    let inside_x = column >= area.x && column < area.x + area.width;
    let inside_y = row >= area.y && row < area.y + area.height;
    if !inside_x || !inside_y {
        return None;
    }

    let x = (f64::from(column - area.x) + 0.5) / f64::from(area.width);
    let y = (f64::from(row - area.y) + 0.5) / f64::from(area.height);

    let longitude = LON_BOUNDS[0] + x * (LON_BOUNDS[1] - LON_BOUNDS[0]);
    let latitude = LAT_BOUNDS[1] - y * (LAT_BOUNDS[1] - LAT_BOUNDS[0]);
    Location::new(latitude, longitude)
}

/// Renders the map panel and returns its inner area
pub fn render(frame: &mut Frame, area: Rect, location: Option<Location>, theme: &Theme) -> Rect {
    let title = match location {
        Some(location) => format!(" Map · {} ", location.label()),
        None => " Map · click to pick a place ".to_string(),
    };
    let block = Block::default()
        .title(Span::styled(title, theme.title()))
        .borders(Borders::ALL)
        .border_style(theme.border());
    let inner = block.inner(area);

    let land = theme.land;
    let marker = theme.marker;
    let canvas = Canvas::default()
        .block(block)
        .background_color(theme.background)
        .marker(Marker::Braille)
        .x_bounds(LON_BOUNDS)
        .y_bounds(LAT_BOUNDS)
        .paint(move |ctx| {
            ctx.draw(&Map {
                resolution: MapResolution::Low,
                color: land,
            });
            if let Some(location) = location {
                ctx.layer();
                ctx.print(
                    location.longitude,
                    location.latitude,
                    Span::styled("●", Style::default().fg(marker)),
                );
            }
        });

    frame.render_widget(canvas, area);
    inner
}
