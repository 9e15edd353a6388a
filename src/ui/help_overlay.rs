//! Help overlay showing all keybindings
//!
//! Renders a centered modal overlay with keyboard shortcuts.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::theme::Theme;
use crate::chart::SeriesKind;

/// Renders the help overlay on top of the current view
pub fn render(frame: &mut Frame, theme: &Theme) {
    let area = frame.area();

    // Calculate centered overlay area
    let overlay_width = 52;
    let overlay_height = 26;
    let overlay_area = centered_rect(overlay_width, overlay_height, area);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let section = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled("Keyboard Shortcuts", theme.title())),
        Line::from(""),
        Line::from(Span::styled("Location", section)),
        help_line("/ or s", "Search for a place", theme),
        help_line("Enter", "Look up the typed place", theme),
        help_line("Click map", "Forecast for that spot", theme),
        help_line("r", "Refresh now", theme),
        Line::from(Span::styled("Forecast", section)),
        help_line("←/h, →/l", "Move the hour cursor", theme),
        help_line("↑/k/[ ↓/j/]", "Previous / next day", theme),
        Line::from(Span::styled("Chart series", section)),
    ];
    lines.extend(
        SeriesKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| help_line(&(i + 1).to_string(), kind.label(), theme)),
    );
    lines.extend([
        Line::from(Span::styled("Display", section)),
        help_line("d", "Toggle dark mode", theme),
        help_line("m", "Show / hide the map", theme),
        help_line("u", "Switch °C / °F", theme),
        help_line("?", "Toggle this help", theme),
        help_line("Esc", "Close / dismiss error", theme),
        help_line("q", "Quit application", theme),
    ]);

    let block = Block::default()
        .title(Span::styled(" Help ", theme.title()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(theme.base())
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, overlay_area);
}

/// Creates a help line with key and description
fn help_line(key: &str, description: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), Style::default().fg(theme.highlight)),
        Span::raw(description.to_string()),
    ])
}

/// Helper function to create a centered rect
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_help_overlay_renders() {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();

        terminal
            .draw(|frame| {
                render(frame, &Theme::DARK);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let content: String = buffer.content().iter().map(|cell| cell.symbol()).collect();

        assert!(content.contains("Help"), "Should render help title");
        assert!(content.contains("Location"), "Should show location section");
        assert!(
            content.contains("Solar radiation"),
            "Should list the chart series"
        );
        assert!(content.contains("Toggle dark mode"));
    }
}
