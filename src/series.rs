//! Window selection over the hourly series and per-day summaries
//!
//! The chart and the hour detail line both read from an `HourlyWindow`: at
//! most 24 consecutive hours starting either at the current local hour or at
//! local midnight of a later day.

use std::ops::Range;

use chrono::{Days, NaiveDate, NaiveDateTime, Timelike};

use crate::classify::{cloud_icon, weather_icon, CompassPoint, WeatherIcon};
use crate::data::{
    value_or_zero, weather_code_to_condition, DailySeries, HourlyField, HourlySeries,
    WeatherCondition,
};

/// Number of hours shown in one chart window
pub const WINDOW_HOURS: usize = 24;

/// Number of selectable forecast days
pub const FORECAST_DAYS: usize = 7;

/// Where a window starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowAnchor {
    /// The hour containing "now"
    CurrentHour,
    /// Local midnight, this many days after today
    DayStart(u32),
}

/// Anchor for a selected day: today rolls from the current hour, later days start at midnight
pub fn anchor_for_day(day: usize) -> WindowAnchor {
    if day == 0 {
        WindowAnchor::CurrentHour
    } else {
        WindowAnchor::DayStart(day as u32)
    }
}

/// Index of the first timestamp belonging to the window, if any
pub fn window_start(
    times: &[NaiveDateTime],
    anchor: WindowAnchor,
    now: NaiveDateTime,
) -> Option<usize> {
    match anchor {
        WindowAnchor::CurrentHour => {
            let exact = times
                .iter()
                .position(|t| t.date() == now.date() && t.hour() == now.hour());
            exact.or_else(|| {
                let hour_start = now.date().and_hms_opt(now.hour(), 0, 0)?;
                times.iter().position(|t| *t >= hour_start)
            })
        }
        WindowAnchor::DayStart(days) => {
            let midnight = now
                .date()
                .checked_add_days(Days::new(u64::from(days)))?
                .and_hms_opt(0, 0, 0)?;
            times.iter().position(|t| *t >= midnight)
        }
    }
}

/// Clamp `start..start + size` into `0..len`; empty when `start >= len`
pub fn window_range(len: usize, start: usize, size: usize) -> Range<usize> {
    if start >= len {
        return len..len;
    }
    start..start.saturating_add(size).min(len)
}

/// Every measurement for one hour, with missing values read as zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourSnapshot {
    pub time: NaiveDateTime,
    pub temperature: f64,
    pub precipitation: f64,
    pub precipitation_probability: f64,
    pub cloud_cover: f64,
    pub wind_speed: f64,
    pub wind_direction: f64,
    pub humidity: f64,
    pub solar_radiation: f64,
    pub snowfall: f64,
    pub weather_code: Option<u8>,
}

impl HourSnapshot {
    /// Icon for this hour
    pub fn icon(&self) -> WeatherIcon {
        weather_icon(
            self.cloud_cover,
            self.precipitation_probability,
            self.temperature,
            self.precipitation,
        )
    }

    /// Compass point the wind comes from
    pub fn wind_compass(&self) -> CompassPoint {
        CompassPoint::from_degrees(self.wind_direction)
    }

    /// WMO condition, when the API reported a code
    pub fn condition(&self) -> Option<WeatherCondition> {
        self.weather_code.map(weather_code_to_condition)
    }
}

/// A contiguous slice of the hourly series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlyWindow {
    offset: usize,
    hours: HourlySeries,
}

impl HourlyWindow {
    /// Select the window for `anchor` relative to `now` (location-local time)
    ///
    /// Yields 24 hours when enough data follows the start, fewer near the end
    /// of the forecast, and an empty window when no timestamp qualifies.
    pub fn select(series: &HourlySeries, anchor: WindowAnchor, now: NaiveDateTime) -> Self {
        let start = window_start(&series.time, anchor, now).unwrap_or(series.len());
        let range = window_range(series.len(), start, WINDOW_HOURS);

        let hours = HourlySeries {
            time: slice(&series.time, &range),
            temperature: slice(&series.temperature, &range),
            precipitation: slice(&series.precipitation, &range),
            precipitation_probability: slice(&series.precipitation_probability, &range),
            cloud_cover: slice(&series.cloud_cover, &range),
            wind_speed: slice(&series.wind_speed, &range),
            wind_direction: slice(&series.wind_direction, &range),
            humidity: slice(&series.humidity, &range),
            solar_radiation: slice(&series.solar_radiation, &range),
            snowfall: slice(&series.snowfall, &range),
            weather_code: slice(&series.weather_code, &range),
        };

        Self {
            offset: range.start,
            hours,
        }
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    /// Index of the first entry in the full series
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Hour labels, e.g. "07:00"
    pub fn labels(&self) -> Vec<String> {
        self.hours
            .time
            .iter()
            .map(|t| t.format("%H:%M").to_string())
            .collect()
    }

    /// Date of the first hour in the window
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.hours.time.first().map(|t| t.date())
    }

    /// Values of `field`, zero where missing
    pub fn values(&self, field: HourlyField) -> Vec<f64> {
        (0..self.len())
            .map(|i| self.hours.value_at(field, i))
            .collect()
    }

    pub fn max(&self, field: HourlyField) -> Option<f64> {
        self.values(field).into_iter().reduce(f64::max)
    }

    pub fn min(&self, field: HourlyField) -> Option<f64> {
        self.values(field).into_iter().reduce(f64::min)
    }

    /// Snapshot of the `index`-th hour of the window
    pub fn hour(&self, index: usize) -> Option<HourSnapshot> {
        let time = *self.hours.time.get(index)?;
        let value = |field| self.hours.value_at(field, index);
        Some(HourSnapshot {
            time,
            temperature: value(HourlyField::Temperature),
            precipitation: value(HourlyField::Precipitation),
            precipitation_probability: value(HourlyField::PrecipitationProbability),
            cloud_cover: value(HourlyField::CloudCover),
            wind_speed: value(HourlyField::WindSpeed),
            wind_direction: value(HourlyField::WindDirection),
            humidity: value(HourlyField::Humidity),
            solar_radiation: value(HourlyField::SolarRadiation),
            snowfall: value(HourlyField::Snowfall),
            weather_code: self.hours.weather_code.get(index).copied().flatten(),
        })
    }
}

fn slice<T: Clone>(column: &[T], range: &Range<usize>) -> Vec<T> {
    column
        .get(range.clone())
        .map(<[T]>::to_vec)
        .unwrap_or_default()
}

/// One column of the 7-day forecast table
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// "Today" for the first day, the weekday name otherwise
    pub label: String,
    /// Icon from mean cloud cover
    pub icon: WeatherIcon,
    pub temperature_mean: f64,
    pub temperature_max: f64,
    pub temperature_min: f64,
    pub precipitation_probability: f64,
    pub precipitation_sum: f64,
    pub wind_speed_max: f64,
    pub wind_direction: CompassPoint,
    pub condition: Option<WeatherCondition>,
    pub snowfall: f64,
}

/// Summaries for every day in the daily series
pub fn day_summaries(daily: &DailySeries) -> Vec<DaySummary> {
    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, date)| {
            let label = if i == 0 {
                "Today".to_string()
            } else {
                date.format("%A").to_string()
            };
            DaySummary {
                date: *date,
                label,
                icon: cloud_icon(value_or_zero(&daily.cloud_cover_mean, i)),
                temperature_mean: value_or_zero(&daily.temperature_mean, i),
                temperature_max: value_or_zero(&daily.temperature_max, i),
                temperature_min: value_or_zero(&daily.temperature_min, i),
                precipitation_probability: value_or_zero(&daily.precipitation_probability_mean, i),
                precipitation_sum: value_or_zero(&daily.precipitation_sum, i),
                wind_speed_max: value_or_zero(&daily.wind_speed_max, i),
                wind_direction: CompassPoint::from_degrees(value_or_zero(
                    &daily.wind_direction_dominant,
                    i,
                )),
                condition: daily
                    .weather_code
                    .get(i)
                    .copied()
                    .flatten()
                    .map(weather_code_to_condition),
                snowfall: value_or_zero(&daily.snowfall_sum, i),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    /// Hourly series starting 2024-07-15 00:00 with `hours` entries
    fn series(hours: usize) -> HourlySeries {
        let start = at(15, 0, 0);
        let mut series = HourlySeries {
            time: (0..hours)
                .map(|h| start + chrono::Duration::hours(h as i64))
                .collect(),
            temperature: (0..hours).map(|h| Some(h as f64)).collect(),
            cloud_cover: (0..hours).map(|_| Some(30.0)).collect(),
            ..Default::default()
        };
        series.normalize();
        series
    }

    #[test]
    fn test_anchor_for_day() {
        assert_eq!(anchor_for_day(0), WindowAnchor::CurrentHour);
        assert_eq!(anchor_for_day(3), WindowAnchor::DayStart(3));
    }

    #[test]
    fn test_window_start_current_hour() {
        let s = series(48);
        assert_eq!(
            window_start(&s.time, WindowAnchor::CurrentHour, at(15, 7, 42)),
            Some(7)
        );
    }

    #[test]
    fn test_window_start_current_hour_before_data() {
        let mut s = series(48);
        s.time.drain(..3);
        // Data starts at 03:00; "now" is 01:10, so the first later hour wins
        assert_eq!(
            window_start(&s.time, WindowAnchor::CurrentHour, at(15, 1, 10)),
            Some(0)
        );
    }

    #[test]
    fn test_window_start_day_start() {
        let s = series(72);
        assert_eq!(
            window_start(&s.time, WindowAnchor::DayStart(1), at(15, 13, 0)),
            Some(24)
        );
        assert_eq!(
            window_start(&s.time, WindowAnchor::DayStart(2), at(15, 13, 0)),
            Some(48)
        );
    }

    #[test]
    fn test_window_start_none_when_data_is_in_the_past() {
        let s = series(24);
        assert_eq!(
            window_start(&s.time, WindowAnchor::CurrentHour, at(20, 0, 0)),
            None
        );
        assert_eq!(
            window_start(&s.time, WindowAnchor::DayStart(1), at(15, 0, 0)),
            None
        );
    }

    #[test]
    fn test_window_range_clamps() {
        assert_eq!(window_range(168, 10, 24), 10..34);
        assert_eq!(window_range(30, 10, 24), 10..30);
        assert_eq!(window_range(30, 30, 24), 30..30);
        assert_eq!(window_range(30, 45, 24), 30..30);
        assert_eq!(window_range(0, 0, 24), 0..0);
        assert_eq!(window_range(10, 2, usize::MAX), 2..10);
    }

    #[test]
    fn test_select_full_window() {
        let s = series(168);
        let window = HourlyWindow::select(&s, WindowAnchor::CurrentHour, at(15, 7, 5));

        assert_eq!(window.len(), WINDOW_HOURS);
        assert_eq!(window.offset(), 7);
        assert_eq!(window.labels()[0], "07:00");
        assert_eq!(window.labels()[23], "06:00");
        assert_eq!(window.values(HourlyField::Temperature)[0], 7.0);
    }

    #[test]
    fn test_select_short_tail() {
        let s = series(30);
        let window = HourlyWindow::select(&s, WindowAnchor::CurrentHour, at(15, 20, 0));
        assert_eq!(window.len(), 10);
    }

    #[test]
    fn test_select_no_match_is_empty() {
        let s = series(24);
        let window = HourlyWindow::select(&s, WindowAnchor::DayStart(3), at(15, 0, 0));
        assert!(window.is_empty());
        assert!(window.labels().is_empty());
        assert_eq!(window.max(HourlyField::Temperature), None);
        assert_eq!(window.hour(0), None);
    }

    #[test]
    fn test_window_min_max_and_zero_fill() {
        let mut s = series(48);
        s.temperature[26] = None;
        let window = HourlyWindow::select(&s, WindowAnchor::DayStart(1), at(15, 9, 0));

        assert_eq!(window.first_date(), NaiveDate::from_ymd_opt(2024, 7, 16));
        assert_eq!(window.max(HourlyField::Temperature), Some(47.0));
        // The missing value reads as zero
        assert_eq!(window.min(HourlyField::Temperature), Some(0.0));
        assert_eq!(window.values(HourlyField::Snowfall), vec![0.0; 24]);
    }

    #[test]
    fn test_hour_snapshot() {
        let mut s = series(24);
        s.precipitation_probability[5] = Some(70.0);
        s.cloud_cover[5] = Some(90.0);
        s.wind_direction[5] = Some(225.0);
        s.weather_code[5] = Some(63);
        let window = HourlyWindow::select(&s, WindowAnchor::CurrentHour, at(15, 0, 0));

        let hour = window.hour(5).expect("hour 5 should exist");
        assert_eq!(hour.time, at(15, 5, 0));
        assert_eq!(hour.temperature, 5.0);
        assert_eq!(hour.icon(), WeatherIcon::HeavyRain);
        assert_eq!(hour.wind_compass(), CompassPoint::SW);
        assert_eq!(hour.condition(), Some(WeatherCondition::Rain));
        assert_eq!(hour.humidity, 0.0);
    }

    #[test]
    fn test_day_summaries() {
        let mut daily = DailySeries {
            time: vec![
                NaiveDate::from_ymd_opt(2024, 7, 15).unwrap(),
                NaiveDate::from_ymd_opt(2024, 7, 16).unwrap(),
            ],
            temperature_max: vec![Some(25.0), Some(19.5)],
            cloud_cover_mean: vec![Some(10.0), Some(80.0)],
            wind_direction_dominant: vec![Some(90.0), None],
            weather_code: vec![Some(0), None],
            ..Default::default()
        };
        daily.normalize();

        let days = day_summaries(&daily);

        assert_eq!(days.len(), 2);
        assert_eq!(days[0].label, "Today");
        assert_eq!(days[1].label, "Tuesday");
        assert_eq!(days[0].icon, WeatherIcon::Sunny);
        assert_eq!(days[1].icon, WeatherIcon::Cloudy);
        assert_eq!(days[1].temperature_max, 19.5);
        assert_eq!(days[1].temperature_min, 0.0);
        assert_eq!(days[0].wind_direction, CompassPoint::E);
        assert_eq!(days[1].wind_direction, CompassPoint::N);
        assert_eq!(days[0].condition, Some(WeatherCondition::Clear));
        assert_eq!(days[1].condition, None);
    }
}
