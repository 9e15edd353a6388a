//! 7-day forecast table
//!
//! One column per day; the selected day's column is highlighted.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::theme::{temperature_color, Theme};
use crate::series::DaySummary;
use crate::settings::Units;

/// Width of the row-label column
const LABEL_WIDTH: u16 = 12;

/// Condition text for a day: the WMO condition when known, else the icon
fn sky_text(day: &DaySummary) -> String {
    let description = match day.condition {
        Some(condition) => condition.description(),
        None => day.icon.label(),
    };
    format!("{} {}", day.icon.symbol(), description)
}

fn temperature_text(day: &DaySummary, units: Units) -> String {
    format!("{:.0}{}", units.convert(day.temperature_mean), units.symbol())
}

fn range_text(day: &DaySummary, units: Units) -> String {
    format!(
        "{:.0} / {:.0}",
        units.convert(day.temperature_max),
        units.convert(day.temperature_min)
    )
}

fn wind_text(day: &DaySummary) -> String {
    format!(
        "{:.1} m/s {}",
        day.wind_speed_max,
        day.wind_direction.abbreviation()
    )
}

/// One table row: a label followed by a value per day
fn value_row<'a, F>(
    label: &'static str,
    days: &[DaySummary],
    selected: usize,
    theme: &Theme,
    value: F,
) -> Row<'a>
where
    F: Fn(&DaySummary) -> (String, Style),
{
    let mut cells = vec![Cell::from(Span::styled(label, theme.label()))];
    cells.extend(days.iter().enumerate().map(|(i, day)| {
        let (text, style) = value(day);
        let style = if i == selected {
            style.patch(theme.selected())
        } else {
            style
        };
        Cell::from(Span::styled(text, style))
    }));
    Row::new(cells)
}

/// Renders the table for `days`
pub fn render(
    frame: &mut Frame,
    area: Rect,
    days: &[DaySummary],
    selected: usize,
    units: Units,
    theme: &Theme,
) {
    let block = Block::default()
        .title(Span::styled(" 7-Day Forecast ", theme.title()))
        .borders(Borders::ALL)
        .border_style(theme.border());

    if days.is_empty() {
        let paragraph = Paragraph::new("No daily data")
            .style(theme.label())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let text = Style::default().fg(theme.text);

    let mut header_cells = vec![Cell::from("")];
    header_cells.extend(days.iter().enumerate().map(|(i, day)| {
        let style = if i == selected {
            theme.selected()
        } else {
            theme.title()
        };
        Cell::from(Span::styled(day.label.clone(), style))
    }));

    let mut rows = vec![
        value_row("Sky", days, selected, theme, |d| (sky_text(d), text)),
        value_row("Temp", days, selected, theme, |d| {
            (
                temperature_text(d, units),
                Style::default().fg(temperature_color(d.temperature_mean)),
            )
        }),
        value_row("High / Low", days, selected, theme, |d| {
            (range_text(d, units), text)
        }),
        value_row("Rain chance", days, selected, theme, |d| {
            (format!("{:.0} %", d.precipitation_probability), text)
        }),
        value_row("Rain", days, selected, theme, |d| {
            (format!("{:.1} mm", d.precipitation_sum), text)
        }),
        value_row("Wind", days, selected, theme, |d| (wind_text(d), text)),
    ];
    if days.iter().any(|d| d.snowfall > 0.0) {
        rows.push(value_row("Snow", days, selected, theme, |d| {
            (format!("{:.1} cm", d.snowfall), text)
        }));
    }

    let mut widths = vec![Constraint::Length(LABEL_WIDTH)];
    widths.extend(days.iter().map(|_| Constraint::Fill(1)));

    let table = Table::new(rows, widths)
        .header(Row::new(header_cells))
        .block(block)
        .style(theme.base())
        .column_spacing(1);

    frame.render_widget(table, area);
}
