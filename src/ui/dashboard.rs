//! Main dashboard screen
//!
//! Header, search bar, chart and map, hour detail, forecast table and key
//! hints. Without a forecast the chart area shows a welcome, loading or
//! error message instead, and the map stays clickable.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::theme::{temperature_color, Theme};
use super::widgets::HourSparkline;
use super::{chart, forecast_table, map};
use crate::app::{App, AppState, InputMode};
use crate::data::HourlyField;
use crate::series::HourSnapshot;
use crate::settings::Units;

/// Share of the middle row given to the map
const MAP_PERCENT: u16 = 35;

/// Renders the dashboard and records where the map landed
pub fn render(frame: &mut Frame, app: &mut App, theme: &Theme) {
    let area = frame.area();
    let ready = app.state == AppState::Ready && app.loaded.is_some();

    let constraints: Vec<Constraint> = if ready {
        vec![
            Constraint::Length(4),  // Header
            Constraint::Length(3),  // Search
            Constraint::Min(10),    // Chart + map
            Constraint::Length(2),  // Hour detail
            Constraint::Length(10), // Forecast table
            Constraint::Length(1),  // Key hints
        ]
    } else {
        vec![
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_header(frame, chunks[0], app, theme);
    render_search(frame, chunks[1], app, theme);

    let main_area = if app.preferences.map_visible {
        let row = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(100 - MAP_PERCENT),
                Constraint::Percentage(MAP_PERCENT),
            ])
            .split(chunks[2]);
        app.map_area = Some(map::render(frame, row[1], app.location, theme));
        row[0]
    } else {
        app.map_area = None;
        chunks[2]
    };

    if ready {
        chart::render(frame, main_area, &app.chart_model(), app.hour_cursor, theme);
        render_hour_detail(frame, chunks[3], app, theme);
        forecast_table::render(
            frame,
            chunks[4],
            &app.day_summaries(),
            app.selected_day,
            app.preferences.units,
            theme,
        );
        render_help_text(frame, chunks[5], app, theme);
    } else {
        render_message(frame, main_area, &app.state, theme);
        render_help_text(frame, chunks[3], app, theme);
    }
}

/// Header lines: place and local time, then current conditions
fn build_header_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let Some(loaded) = &app.loaded else {
        return vec![
            Line::from(Span::styled("Hello Weather", theme.title())),
            Line::from(Span::styled(
                "Hourly charts, a 7-day forecast and a map",
                theme.label(),
            )),
        ];
    };

    let mut first = vec![Span::styled(
        loaded.place_name.clone(),
        Style::default()
            .fg(theme.text)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(now) = app.local_now() {
        first.push(Span::raw("  "));
        first.push(Span::styled(
            now.format("%a %d %b %H:%M").to_string(),
            Style::default().fg(theme.text),
        ));
    }
    first.push(Span::styled(
        format!("  {}", loaded.timezone.name()),
        theme.label(),
    ));
    if app.is_fetching {
        first.push(Span::styled("  updating…", theme.key()));
    }

    let mut second = Vec::new();
    if let Some(hour) = app.current_hour() {
        let icon = hour.icon();
        second.push(Span::raw(format!("{} {}  ", icon.symbol(), icon.label())));
        second.push(Span::styled(
            temperature_text(hour.temperature, app.preferences.units),
            Style::default()
                .fg(temperature_color(hour.temperature))
                .add_modifier(Modifier::BOLD),
        ));
    }
    if let Some(scene) = app.sky_scene() {
        second.push(Span::styled(format!("  {}", scene.summary()), theme.label()));
    }

    vec![Line::from(first), Line::from(second)]
}

fn temperature_text(celsius: f64, units: Units) -> String {
    format!("{:.1}{}", units.convert(celsius), units.symbol())
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border());
    let paragraph = Paragraph::new(build_header_lines(app, theme)).block(block);
    frame.render_widget(paragraph, area);
}

fn render_search(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let editing = app.input_mode == InputMode::Editing;
    let line = if editing {
        Line::from(vec![
            Span::styled(app.search_input.clone(), Style::default().fg(theme.text)),
            Span::styled("█", theme.key()),
        ])
    } else {
        Line::from(Span::styled(
            "Press / to search for a city or address",
            theme.label(),
        ))
    };

    let border = if editing {
        Style::default().fg(theme.accent)
    } else {
        theme.border()
    };
    let block = Block::default()
        .title(Span::styled(" Search ", theme.title()))
        .borders(Borders::ALL)
        .border_style(border);

    frame.render_widget(Paragraph::new(line).block(block), area);
}

/// Detail text for the hour under the cursor
fn hour_detail_line(hour: &HourSnapshot, units: Units, theme: &Theme) -> Line<'static> {
    let compass = hour.wind_compass();
    let icon = hour.icon();
    Line::from(vec![
        Span::styled(hour.time.format("%a %H:%M").to_string(), theme.selected()),
        Span::raw(format!("  {} {}  ", icon.symbol(), icon.label())),
        Span::styled(
            temperature_text(hour.temperature, units),
            Style::default().fg(temperature_color(hour.temperature)),
        ),
        Span::styled("  Wind ", theme.label()),
        Span::raw(format!(
            "{:.1} m/s from the {} ({})",
            hour.wind_speed,
            compass.name(),
            compass.abbreviation()
        )),
        Span::styled("  Humidity ", theme.label()),
        Span::raw(format!("{:.0} %", hour.humidity)),
        Span::styled("  Rain ", theme.label()),
        Span::raw(format!(
            "{:.0} % / {:.1} mm",
            hour.precipitation_probability, hour.precipitation
        )),
    ])
}

fn render_hour_detail(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    if let Some(hour) = app.cursor_hour() {
        let line = hour_detail_line(&hour, app.preferences.units, theme);
        frame.render_widget(Paragraph::new(line), rows[0]);
    }

    const LABEL: &str = "Cloud cover ";
    let window = app.selected_window();
    let clouds = window.values(HourlyField::CloudCover);
    let label_width = LABEL.len() as u16;
    frame.render_widget(
        Paragraph::new(Span::styled(LABEL, theme.label())),
        Rect { width: label_width.min(rows[1].width), ..rows[1] },
    );
    let spark_area = Rect {
        x: rows[1].x + label_width.min(rows[1].width),
        width: rows[1].width.saturating_sub(label_width),
        ..rows[1]
    };
    frame.render_widget(
        HourSparkline::new(&clouds, 100.0)
            .cursor(app.hour_cursor)
            .style(Style::default().fg(theme.muted))
            .marker_style(Style::default().fg(theme.highlight)),
        spark_area,
    );
}

/// Placeholder text for every state without a forecast
fn build_message_lines(state: &AppState, theme: &Theme) -> Vec<Line<'static>> {
    match state {
        AppState::Welcome | AppState::Ready => vec![
            Line::from(Span::styled("Welcome to Hello Weather", theme.title())),
            Line::from(""),
            Line::from(Span::styled(
                "Press / to search for a place, or click on the map.",
                theme.label(),
            )),
        ],
        AppState::Loading => vec![Line::from(Span::styled(
            "Loading forecast...",
            Style::default().fg(theme.accent),
        ))],
        AppState::Error(message) => vec![
            Line::from(Span::styled(
                message.clone(),
                Style::default()
                    .fg(theme.error)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press / to search again or Esc to dismiss.",
                theme.label(),
            )),
        ],
    }
}

fn render_message(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Center the message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    let paragraph = Paragraph::new(build_message_lines(state, theme))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, chunks[1]);
}

/// Renders the key hint footer
fn render_help_text(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let hints: &[(&str, &str)] = if app.input_mode == InputMode::Editing {
        &[("Enter", " Search"), ("Esc", " Cancel")]
    } else if app.loaded.is_some() {
        &[
            ("/", " Search"),
            ("←→", " Hour"),
            ("↑↓", " Day"),
            ("1-6", " Series"),
            ("d", " Theme"),
            ("m", " Map"),
            ("u", " °C/°F"),
            ("r", " Refresh"),
            ("?", " Help"),
            ("q", " Quit"),
        ]
    } else {
        &[("/", " Search"), ("m", " Map"), ("?", " Help"), ("q", " Quit")]
    };

    let mut spans = Vec::with_capacity(hints.len() * 3);
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(key.to_string(), theme.key()));
        spans.push(Span::styled(action.to_string(), theme.label()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
