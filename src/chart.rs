//! Chart model: series kinds, per-axis scaling and visibility
//!
//! Each series lives on its own axis with its own range. The UI draws every
//! visible series on a shared `[0, 1]` canvas after normalizing it against its
//! axis, and labels the axes from the scales computed here.

use serde::{Deserialize, Serialize};

use crate::data::HourlyField;
use crate::series::HourlyWindow;
use crate::settings::Units;

/// The six series the chart can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    Temperature,
    Humidity,
    PrecipProbability,
    SolarRadiation,
    Precipitation,
    CloudCover,
}

/// Axis a series is plotted against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartAxis {
    Temperature,
    Percent,
    Solar,
    Precipitation,
}

/// How a series is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesStyle {
    Line,
    Bar,
    Area,
}

impl SeriesKind {
    /// Every kind, in legend order (also the order of the 1-6 toggle keys)
    pub const ALL: [SeriesKind; 6] = [
        SeriesKind::Temperature,
        SeriesKind::Humidity,
        SeriesKind::PrecipProbability,
        SeriesKind::SolarRadiation,
        SeriesKind::Precipitation,
        SeriesKind::CloudCover,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SeriesKind::Temperature => "Temperature",
            SeriesKind::Humidity => "Humidity",
            SeriesKind::PrecipProbability => "Precip. probability",
            SeriesKind::SolarRadiation => "Solar radiation",
            SeriesKind::Precipitation => "Precipitation",
            SeriesKind::CloudCover => "Cloud cover",
        }
    }

    pub fn axis(&self) -> ChartAxis {
        match self {
            SeriesKind::Temperature => ChartAxis::Temperature,
            SeriesKind::Humidity | SeriesKind::PrecipProbability | SeriesKind::CloudCover => {
                ChartAxis::Percent
            }
            SeriesKind::SolarRadiation => ChartAxis::Solar,
            SeriesKind::Precipitation => ChartAxis::Precipitation,
        }
    }

    pub fn style(&self) -> SeriesStyle {
        match self {
            SeriesKind::Temperature | SeriesKind::Humidity | SeriesKind::PrecipProbability => {
                SeriesStyle::Line
            }
            SeriesKind::Precipitation => SeriesStyle::Bar,
            SeriesKind::SolarRadiation | SeriesKind::CloudCover => SeriesStyle::Area,
        }
    }

    /// Hourly column feeding this series
    pub fn field(&self) -> HourlyField {
        match self {
            SeriesKind::Temperature => HourlyField::Temperature,
            SeriesKind::Humidity => HourlyField::Humidity,
            SeriesKind::PrecipProbability => HourlyField::PrecipitationProbability,
            SeriesKind::SolarRadiation => HourlyField::SolarRadiation,
            SeriesKind::Precipitation => HourlyField::Precipitation,
            SeriesKind::CloudCover => HourlyField::CloudCover,
        }
    }

    /// Kind toggled by the number keys 1-6
    pub fn from_digit(digit: char) -> Option<Self> {
        let index = digit.to_digit(10)?.checked_sub(1)? as usize;
        Self::ALL.get(index).copied()
    }
}

impl ChartAxis {
    pub fn unit(&self, units: Units) -> &'static str {
        match self {
            ChartAxis::Temperature => units.symbol(),
            ChartAxis::Percent => "%",
            ChartAxis::Solar => "W/m²",
            ChartAxis::Precipitation => "mm",
        }
    }
}

/// Closed value range of an axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    pub min: f64,
    pub max: f64,
}

impl AxisScale {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Position of `value` on this axis, clamped to `[0, 1]`
    pub fn normalize(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 || !value.is_finite() {
            return 0.0;
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

/// Default top of the solar axis, W/m²
const SOLAR_AXIS_MAX: f64 = 800.0;

/// Default top of the precipitation axis, mm
const PRECIPITATION_AXIS_MAX: f64 = 10.0;

/// Temperature axis: whole degrees with 10 % headroom above the data
pub fn temperature_scale(values: &[f64]) -> AxisScale {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (Some(min), Some(max)) = (finite.clone().reduce(f64::min), finite.reduce(f64::max)) else {
        return AxisScale::new(0.0, 1.0);
    };

    let lower = min.floor();
    let mut upper = (max + (max - min) * 0.1).ceil();
    if upper <= lower {
        upper = lower + 1.0;
    }
    AxisScale::new(lower, upper)
}

/// Fixed 0-100 % axis
pub fn percent_scale() -> AxisScale {
    AxisScale::new(0.0, 100.0)
}

/// 0-800 W/m², stretched to 110 % of the peak on very sunny days
pub fn solar_scale(values: &[f64]) -> AxisScale {
    let peak = values.iter().copied().fold(0.0, f64::max);
    if peak > SOLAR_AXIS_MAX {
        AxisScale::new(0.0, (peak * 1.1).ceil())
    } else {
        AxisScale::new(0.0, SOLAR_AXIS_MAX)
    }
}

/// 0-10 mm, stretched to the peak when it exceeds 10 mm
pub fn precipitation_scale(values: &[f64]) -> AxisScale {
    let peak = values.iter().copied().fold(0.0, f64::max);
    if peak > PRECIPITATION_AXIS_MAX {
        AxisScale::new(0.0, peak.ceil())
    } else {
        AxisScale::new(0.0, PRECIPITATION_AXIS_MAX)
    }
}

/// Scale for `axis` given the values plotted on it
pub fn scale_for(axis: ChartAxis, values: &[f64]) -> AxisScale {
    match axis {
        ChartAxis::Temperature => temperature_scale(values),
        ChartAxis::Percent => percent_scale(),
        ChartAxis::Solar => solar_scale(values),
        ChartAxis::Precipitation => precipitation_scale(values),
    }
}

/// Which series the user wants to see; persisted with the preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeriesVisibility {
    pub temperature: bool,
    pub humidity: bool,
    pub precip_probability: bool,
    pub solar_radiation: bool,
    pub precipitation: bool,
    pub cloud_cover: bool,
}

impl Default for SeriesVisibility {
    fn default() -> Self {
        Self {
            temperature: true,
            humidity: true,
            precip_probability: true,
            solar_radiation: true,
            precipitation: true,
            cloud_cover: true,
        }
    }
}

impl SeriesVisibility {
    fn slot(&mut self, kind: SeriesKind) -> &mut bool {
        match kind {
            SeriesKind::Temperature => &mut self.temperature,
            SeriesKind::Humidity => &mut self.humidity,
            SeriesKind::PrecipProbability => &mut self.precip_probability,
            SeriesKind::SolarRadiation => &mut self.solar_radiation,
            SeriesKind::Precipitation => &mut self.precipitation,
            SeriesKind::CloudCover => &mut self.cloud_cover,
        }
    }

    pub fn is_visible(&self, kind: SeriesKind) -> bool {
        match kind {
            SeriesKind::Temperature => self.temperature,
            SeriesKind::Humidity => self.humidity,
            SeriesKind::PrecipProbability => self.precip_probability,
            SeriesKind::SolarRadiation => self.solar_radiation,
            SeriesKind::Precipitation => self.precipitation,
            SeriesKind::CloudCover => self.cloud_cover,
        }
    }

    /// Flip one series, returning its new visibility
    pub fn toggle(&mut self, kind: SeriesKind) -> bool {
        let slot = self.slot(kind);
        *slot = !*slot;
        *slot
    }
}

/// One plotted series with its own axis scale
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub kind: SeriesKind,
    /// Values in display units
    pub values: Vec<f64>,
    pub scale: AxisScale,
    pub visible: bool,
}

impl ChartSeries {
    /// Values mapped into `[0, 1]` on this series' axis
    pub fn normalized(&self) -> Vec<f64> {
        self.values.iter().map(|v| self.scale.normalize(*v)).collect()
    }

    /// `(hour index, normalized value)` pairs for plotting
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.normalized()
            .into_iter()
            .enumerate()
            .map(|(i, y)| (i as f64, y))
            .collect()
    }

    /// Legend text naming the series and its axis range, e.g. "Temperature (12–24 °C)"
    pub fn legend(&self, units: Units) -> String {
        format!(
            "{} ({}–{} {})",
            self.kind.label(),
            self.scale.min,
            self.scale.max,
            self.kind.axis().unit(units)
        )
    }
}

/// Everything the chart widget needs for one window
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub title: String,
    /// Hour labels for the x axis
    pub labels: Vec<String>,
    /// One entry per kind, in legend order
    pub series: Vec<ChartSeries>,
    pub units: Units,
}

impl ChartModel {
    pub fn build(window: &HourlyWindow, visibility: &SeriesVisibility, units: Units) -> Self {
        let series = SeriesKind::ALL
            .iter()
            .map(|&kind| {
                let mut values = window.values(kind.field());
                if kind == SeriesKind::Temperature {
                    values.iter_mut().for_each(|v| *v = units.convert(*v));
                }
                let scale = scale_for(kind.axis(), &values);
                ChartSeries {
                    kind,
                    values,
                    scale,
                    visible: visibility.is_visible(kind),
                }
            })
            .collect();

        let labels = window.labels();
        let title = match window.hour(0) {
            Some(first) => format!(
                "Forecast for the next 24 hours from {}",
                first.time.format("%a %d %b %H:%M")
            ),
            None => "No hourly data".to_string(),
        };

        Self {
            title,
            labels,
            series,
            units,
        }
    }

    pub fn get(&self, kind: SeriesKind) -> Option<&ChartSeries> {
        self.series.iter().find(|s| s.kind == kind)
    }

    pub fn visible_series(&self) -> impl Iterator<Item = &ChartSeries> {
        self.series.iter().filter(|s| s.visible)
    }

    /// Temperature axis, used for the left-hand labels
    pub fn temperature_scale(&self) -> AxisScale {
        self.get(SeriesKind::Temperature)
            .map(|s| s.scale)
            .unwrap_or(AxisScale::new(0.0, 1.0))
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
