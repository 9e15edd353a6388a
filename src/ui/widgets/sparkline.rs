//! One-row sparkline over the hours of a window

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

/// Block characters for the eight value levels
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// A sparkline with one cell per hour and an optional cursor
pub struct HourSparkline<'a> {
    values: &'a [f64],
    /// Value drawn as a full block
    max_value: f64,
    /// Hour index drawn with the marker style
    cursor: Option<usize>,
    style: Style,
    marker_style: Style,
}

impl<'a> HourSparkline<'a> {
    pub fn new(values: &'a [f64], max_value: f64) -> Self {
        Self {
            values,
            max_value,
            cursor: None,
            style: Style::default().fg(Color::Cyan),
            marker_style: Style::default().fg(Color::Yellow),
        }
    }

    pub fn cursor(mut self, index: usize) -> Self {
        self.cursor = Some(index);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn marker_style(mut self, style: Style) -> Self {
        self.marker_style = style;
        self
    }

    fn value_to_block(&self, value: f64) -> char {
        if self.max_value <= 0.0 || !value.is_finite() {
            return BLOCKS[0];
        }
        let normalized = (value / self.max_value).clamp(0.0, 1.0);
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }
}

impl<'a> Widget for HourSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;

        for (i, value) in self.values.iter().take(width).enumerate() {
            let block = self.value_to_block(*value);
            let x = area.x + i as u16;

            let style = if self.cursor == Some(i) {
                self.marker_style
            } else {
                self.style
            };

            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(block).set_style(style);
            }
        }
    }
}
