//! Dark and light color palettes

use ratatui::style::{Color, Modifier, Style};

use crate::chart::SeriesKind;

/// Colors used across the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    /// Primary text
    pub text: Color,
    /// Labels and secondary text
    pub muted: Color,
    /// Panel titles and key hints
    pub accent: Color,
    pub border: Color,
    /// Selected table column and the hour cursor
    pub highlight: Color,
    pub error: Color,
    pub land: Color,
    pub marker: Color,
}

impl Theme {
    pub const DARK: Theme = Theme {
        background: Color::Rgb(24, 26, 33),
        text: Color::White,
        muted: Color::Gray,
        accent: Color::Cyan,
        border: Color::DarkGray,
        highlight: Color::Yellow,
        error: Color::LightRed,
        land: Color::Green,
        marker: Color::LightRed,
    };

    pub const LIGHT: Theme = Theme {
        background: Color::Rgb(245, 245, 240),
        text: Color::Black,
        muted: Color::DarkGray,
        accent: Color::Blue,
        border: Color::Gray,
        highlight: Color::Magenta,
        error: Color::Red,
        land: Color::Rgb(60, 120, 60),
        marker: Color::Red,
    };

    pub fn new(dark_mode: bool) -> Self {
        if dark_mode {
            Self::DARK
        } else {
            Self::LIGHT
        }
    }

    /// Style for the whole screen
    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn label(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn key(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.highlight)
            .add_modifier(Modifier::BOLD)
    }

    /// Line color of a chart series
    pub fn series_color(&self, kind: SeriesKind) -> Color {
        match kind {
            SeriesKind::Temperature => Color::Rgb(255, 99, 132),
            SeriesKind::Humidity => Color::Rgb(75, 192, 192),
            SeriesKind::PrecipProbability => Color::Rgb(53, 162, 235),
            SeriesKind::SolarRadiation => Color::Rgb(255, 206, 86),
            SeriesKind::Precipitation => Color::Rgb(54, 120, 255),
            SeriesKind::CloudCover => {
                if *self == Self::DARK {
                    Color::Rgb(170, 170, 170)
                } else {
                    Color::Rgb(110, 110, 110)
                }
            }
        }
    }
}

/// Color for a temperature in °C
pub fn temperature_color(temp: f64) -> Color {
    if temp >= 30.0 {
        Color::Red
    } else if temp >= 25.0 {
        Color::LightRed
    } else if temp >= 20.0 {
        Color::Yellow
    } else if temp >= 15.0 {
        Color::Green
    } else if temp >= 10.0 {
        Color::Cyan
    } else {
        Color::Blue
    }
}
