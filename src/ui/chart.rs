//! Hourly forecast chart
//!
//! Every visible series is plotted on a shared `[0, 1]` y-axis after
//! normalizing against its own scale. The left axis carries the temperature
//! scale; the legend names each series' range.

use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, LegendPosition, Paragraph},
    Frame,
};

use super::theme::Theme;
use crate::chart::{ChartModel, SeriesStyle};

/// How a series style maps onto ratatui's graph types
fn graph_type(style: SeriesStyle) -> GraphType {
    match style {
        SeriesStyle::Line => GraphType::Line,
        SeriesStyle::Bar | SeriesStyle::Area => GraphType::Bar,
    }
}

/// First, middle and last hour labels for the x axis
fn x_labels(labels: &[String], theme: &Theme) -> Vec<Span<'static>> {
    let picks = match labels.len() {
        0 => vec![],
        1 => vec![0],
        2 => vec![0, 1],
        n => vec![0, n / 2, n - 1],
    };
    picks
        .into_iter()
        .map(|i| Span::styled(labels[i].clone(), theme.label()))
        .collect()
}

/// Temperature scale at bottom, middle and top of the y axis
fn y_labels(model: &ChartModel, theme: &Theme) -> Vec<Span<'static>> {
    let scale = model.temperature_scale();
    let symbol = model.units.symbol();
    let mid = (scale.min + scale.max) / 2.0;
    [scale.min, mid, scale.max]
        .into_iter()
        .map(|v| Span::styled(format!("{:.0}{}", v, symbol), theme.label()))
        .collect()
}

/// Renders the chart for `model`, marking the hour at `cursor`
pub fn render(frame: &mut Frame, area: Rect, model: &ChartModel, cursor: usize, theme: &Theme) {
    let block = Block::default()
        .title(Span::styled(format!(" {} ", model.title), theme.title()))
        .borders(Borders::ALL)
        .border_style(theme.border());

    if model.is_empty() {
        let paragraph = Paragraph::new("No hourly data")
            .style(theme.label())
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let plotted: Vec<_> = model
        .visible_series()
        .map(|series| {
            (
                series.legend(model.units),
                series.points(),
                graph_type(series.kind.style()),
                theme.series_color(series.kind),
            )
        })
        .collect();

    let cursor_x = cursor.min(model.labels.len().saturating_sub(1)) as f64;
    let cursor_points = [(cursor_x, 0.0), (cursor_x, 1.0)];

    let mut datasets: Vec<Dataset> = plotted
        .iter()
        .map(|(name, points, graph, color)| {
            Dataset::default()
                .name(name.clone())
                .marker(Marker::Braille)
                .graph_type(*graph)
                .style(Style::default().fg(*color))
                .data(points)
        })
        .collect();
    datasets.push(
        Dataset::default()
            .marker(Marker::Dot)
            .graph_type(GraphType::Line)
            .style(
                Style::default()
                    .fg(theme.highlight)
                    .add_modifier(Modifier::DIM),
            )
            .data(&cursor_points),
    );

    let x_max = (model.labels.len().saturating_sub(1)).max(1) as f64;
    let chart = Chart::new(datasets)
        .block(block)
        .style(theme.base())
        .x_axis(
            Axis::default()
                .style(theme.border())
                .bounds([0.0, x_max])
                .labels(x_labels(&model.labels, theme)),
        )
        .y_axis(
            Axis::default()
                .style(theme.border())
                .bounds([0.0, 1.0])
                .labels(y_labels(model, theme)),
        )
        .legend_position(Some(LegendPosition::TopRight))
        .hidden_legend_constraints((Constraint::Ratio(1, 1), Constraint::Ratio(1, 1)));

    frame.render_widget(chart, area);
}
