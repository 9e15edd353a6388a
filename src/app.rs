//! Application state management for Hello Weather
//!
//! This module contains the main application state, handling keyboard and
//! mouse input, applying fetch results, and writing preference changes.
//! Network work happens in the background worker; the app only queues
//! requests for the event loop to forward.

use chrono::NaiveDateTime;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::chart::{ChartModel, SeriesKind};
use crate::classify::{SceneInputs, SkyScene};
use crate::cli::StartupConfig;
use crate::data::{LoadedForecast, Location, LookupError, LookupTarget};
use crate::series::{
    anchor_for_day, day_summaries, DaySummary, HourSnapshot, HourlyWindow, WindowAnchor,
    FORECAST_DAYS,
};
use crate::settings::{SettingsStore, UserPreferences};
use crate::ui::map::location_at;
use crate::worker::{FetchMessage, FetchRequest, RequestError};

/// Application state enum representing what the main area shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppState {
    /// No location yet; prompt for a search
    Welcome,
    /// First fetch in progress, nothing to show yet
    Loading,
    /// Forecast available
    Ready,
    /// Last lookup failed; no data is shown
    Error(String),
}

/// Whether keystrokes go to the search box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Main application struct managing state and data
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Whether the search box has focus
    pub input_mode: InputMode,
    /// Text typed into the search box
    pub search_input: String,
    /// Forecast on screen, if any
    pub loaded: Option<LoadedForecast>,
    /// Location shown on the map; cleared when a lookup fails
    pub location: Option<Location>,
    /// Current preferences (including CLI overrides)
    pub preferences: UserPreferences,
    /// Index into the daily forecast, shared by chart and table
    pub selected_day: usize,
    /// Hour highlighted within the chart window
    pub hour_cursor: usize,
    /// A fetch is running in the background
    pub is_fetching: bool,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    /// Inner area of the map panel from the last render, for mouse hit-testing
    pub map_area: Option<Rect>,
    /// Request waiting to be handed to the worker
    pending_request: Option<FetchRequest>,
    /// Fixed location-local time, used instead of the clock when set
    frozen_now: Option<NaiveDateTime>,
    /// Preference persistence; `None` keeps changes in memory only
    store: Option<SettingsStore>,
}

impl App {
    /// Creates a new App using the saved preferences and no startup overrides
    pub fn new() -> Self {
        Self::with_startup_config(StartupConfig::default(), SettingsStore::new())
    }

    /// Creates a new App instance with the given startup configuration.
    ///
    /// The initial location is the CLI query or coordinates, else the saved
    /// location. Theme and unit overrides apply to this session only.
    pub fn with_startup_config(config: StartupConfig, store: Option<SettingsStore>) -> Self {
        let mut preferences = store.as_ref().map(|s| s.load()).unwrap_or_default();
        if let Some(dark_mode) = config.dark_mode {
            preferences.dark_mode = dark_mode;
        }
        if let Some(units) = config.units {
            preferences.units = units;
        }

        let initial_target = config.initial_target.or_else(|| {
            preferences.coordinates.map(|location| LookupTarget::Coordinates {
                location,
                label: Some(preferences.city_name.clone()),
            })
        });

        let state = if initial_target.is_some() {
            AppState::Loading
        } else {
            AppState::Welcome
        };

        Self {
            state,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            loaded: None,
            location: None,
            preferences,
            selected_day: config.initial_day.min(FORECAST_DAYS - 1),
            hour_cursor: 0,
            is_fetching: false,
            show_help: false,
            should_quit: false,
            map_area: None,
            pending_request: initial_target.map(FetchRequest::Load),
            frozen_now: None,
            store,
        }
    }

    /// Takes the request queued by the last input, if any
    pub fn take_request(&mut self) -> Option<FetchRequest> {
        self.pending_request.take()
    }

    /// Handles a request the worker would not take
    ///
    /// A full queue keeps the request for the next frame. A stopped worker
    /// can never answer, so the app reports the failure.
    pub fn request_rejected(&mut self, error: RequestError) {
        match error {
            RequestError::QueueFull(request) => {
                if self.pending_request.is_none() {
                    self.pending_request = Some(request);
                }
            }
            RequestError::Stopped => {
                tracing::error!("Fetch task is gone");
                self.apply(FetchMessage::Failed(LookupError::USER_MESSAGE.to_string()));
            }
        }
    }

    /// Pins "now" to a fixed location-local time
    pub fn freeze_clock(&mut self, now: NaiveDateTime) {
        self.frozen_now = Some(now);
    }

    /// Handles keyboard input
    ///
    /// Key bindings (normal mode):
    /// - `q`: Quit the application
    /// - `/` or `s`: Edit the search box
    /// - `Left`/`h`, `Right`/`l`: Move the hour cursor
    /// - `Up`/`k`/`[`, `Down`/`j`/`]`: Previous / next forecast day
    /// - `1`-`6`: Toggle a chart series
    /// - `d`: Toggle dark mode
    /// - `m`: Toggle the map panel
    /// - `u`: Toggle °C / °F
    /// - `r`: Refresh the current location
    /// - `?`: Show help
    /// - `Esc`: Dismiss an error
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            self.should_quit = true;
            return;
        }

        // Handle help overlay - intercepts all keys when shown
        if self.show_help {
            match key_event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => {
                    self.show_help = false;
                }
                _ => {} // Ignore other keys when help is shown
            }
            return;
        }

        match self.input_mode {
            InputMode::Editing => match key_event.code {
                KeyCode::Enter => self.submit_search(),
                KeyCode::Esc => {
                    self.input_mode = InputMode::Normal;
                }
                KeyCode::Backspace => {
                    self.search_input.pop();
                }
                KeyCode::Char(c) => {
                    self.search_input.push(c);
                }
                _ => {}
            },
            InputMode::Normal => match key_event.code {
                KeyCode::Char('q') => {
                    self.should_quit = true;
                }
                KeyCode::Char('/') | KeyCode::Char('s') => {
                    self.input_mode = InputMode::Editing;
                    self.search_input.clear();
                }
                KeyCode::Esc => {
                    if matches!(self.state, AppState::Error(_)) {
                        self.state = AppState::Welcome;
                    }
                }
                KeyCode::Left | KeyCode::Char('h') => {
                    self.move_hour_cursor_left();
                }
                KeyCode::Right | KeyCode::Char('l') => {
                    self.move_hour_cursor_right();
                }
                KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('[') => {
                    self.select_previous_day();
                }
                KeyCode::Down | KeyCode::Char('j') | KeyCode::Char(']') => {
                    self.select_next_day();
                }
                KeyCode::Char(c @ '1'..='6') => {
                    if let Some(kind) = SeriesKind::from_digit(c) {
                        self.toggle_series(kind);
                    }
                }
                KeyCode::Char('d') => {
                    let dark_mode = !self.preferences.dark_mode;
                    self.save_preference(move |p| p.dark_mode = dark_mode);
                }
                KeyCode::Char('m') => {
                    let map_visible = !self.preferences.map_visible;
                    self.save_preference(move |p| p.map_visible = map_visible);
                }
                KeyCode::Char('u') => {
                    let units = self.preferences.units.toggled();
                    self.save_preference(move |p| p.units = units);
                }
                KeyCode::Char('r') => {
                    if self.loaded.is_some() {
                        self.pending_request = Some(FetchRequest::Refresh);
                    }
                }
                KeyCode::Char('?') => {
                    self.show_help = true;
                }
                _ => {}
            },
        }
    }

    /// Handles mouse input: a left click on the map loads that spot
    pub fn handle_mouse(&mut self, mouse_event: MouseEvent) {
        if self.show_help || !self.preferences.map_visible {
            return;
        }
        if mouse_event.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let Some(area) = self.map_area else {
            return;
        };
        if let Some(location) = location_at(area, mouse_event.column, mouse_event.row) {
            tracing::debug!("Map click at {}", location.label());
            self.request_location(LookupTarget::at(location));
        }
    }

    /// Applies a message from the background worker
    pub fn apply(&mut self, message: FetchMessage) {
        match message {
            FetchMessage::Started => {
                self.is_fetching = true;
                if self.loaded.is_none() {
                    self.state = AppState::Loading;
                }
            }
            FetchMessage::Loaded(loaded) => {
                let loaded = *loaded;
                self.is_fetching = false;
                self.location = Some(loaded.location);
                self.hour_cursor = 0;
                self.selected_day = self
                    .selected_day
                    .min(loaded.forecast.daily.len().clamp(1, FORECAST_DAYS) - 1);

                let location = loaded.location;
                let city_name = loaded.place_name.clone();
                self.save_preference(move |p| {
                    p.coordinates = Some(location);
                    p.city_name = city_name.clone();
                });

                self.loaded = Some(loaded);
                self.state = AppState::Ready;
            }
            FetchMessage::Failed(message) => {
                self.is_fetching = false;
                self.loaded = None;
                self.location = None;
                self.hour_cursor = 0;
                self.state = AppState::Error(message);
            }
        }
    }

    /// Location-local "now", if a forecast is loaded
    pub fn local_now(&self) -> Option<NaiveDateTime> {
        match self.frozen_now {
            Some(now) => Some(now),
            None => self.loaded.as_ref().map(LoadedForecast::local_now),
        }
    }

    /// Number of selectable days
    pub fn day_count(&self) -> usize {
        self.loaded
            .as_ref()
            .map(|l| l.forecast.daily.len().min(FORECAST_DAYS))
            .unwrap_or(FORECAST_DAYS)
            .max(1)
    }

    /// Window for an anchor, empty when nothing is loaded
    fn window_for(&self, anchor: WindowAnchor) -> HourlyWindow {
        match (&self.loaded, self.local_now()) {
            (Some(loaded), Some(now)) => HourlyWindow::select(&loaded.forecast.hourly, anchor, now),
            _ => HourlyWindow::default(),
        }
    }

    /// The 24-hour window for the selected day
    pub fn selected_window(&self) -> HourlyWindow {
        self.window_for(anchor_for_day(self.selected_day))
    }

    /// Chart model for the selected day
    pub fn chart_model(&self) -> ChartModel {
        ChartModel::build(
            &self.selected_window(),
            &self.preferences.chart_visibility,
            self.preferences.units,
        )
    }

    /// Summaries for the forecast table, at most seven days
    pub fn day_summaries(&self) -> Vec<DaySummary> {
        let mut days = self
            .loaded
            .as_ref()
            .map(|l| day_summaries(&l.forecast.daily))
            .unwrap_or_default();
        days.truncate(FORECAST_DAYS);
        days
    }

    /// The hour under the cursor
    pub fn cursor_hour(&self) -> Option<HourSnapshot> {
        self.selected_window().hour(self.hour_cursor)
    }

    /// The hour containing "now"
    pub fn current_hour(&self) -> Option<HourSnapshot> {
        self.window_for(WindowAnchor::CurrentHour).hour(0)
    }

    /// Sky description for the current hour
    pub fn sky_scene(&self) -> Option<SkyScene> {
        let now = self.local_now()?;
        let hour = self.current_hour()?;
        Some(SkyScene::classify(&SceneInputs {
            local_hour: chrono::Timelike::hour(&now),
            icon: hour.icon(),
            cloud_cover: hour.cloud_cover,
            precipitation: hour.precipitation,
            snowfall: hour.snowfall,
            solar_radiation: hour.solar_radiation,
            wind_speed: hour.wind_speed,
            wind_direction: hour.wind_direction,
        }))
    }

    fn submit_search(&mut self) {
        let query = self.search_input.trim().to_string();
        self.input_mode = InputMode::Normal;
        if query.is_empty() {
            return;
        }
        self.request_location(LookupTarget::Query(query));
    }

    fn request_location(&mut self, target: LookupTarget) {
        self.pending_request = Some(FetchRequest::Load(target));
        if self.loaded.is_none() {
            self.state = AppState::Loading;
        }
    }

    fn toggle_series(&mut self, kind: SeriesKind) {
        let mut visibility = self.preferences.chart_visibility;
        visibility.toggle(kind);
        self.save_preference(move |p| p.chart_visibility = visibility);
    }

    /// Applies a change to the in-memory preferences and writes it through
    fn save_preference<F>(&mut self, change: F)
    where
        F: Fn(&mut UserPreferences),
    {
        change(&mut self.preferences);
        if let Some(store) = &self.store {
            if let Err(e) = store.update(|p| change(p)) {
                tracing::warn!("Failed to save settings: {}", e);
            }
        }
    }

    /// Moves the hour cursor left, stopping at the first hour
    fn move_hour_cursor_left(&mut self) {
        self.hour_cursor = self.hour_cursor.saturating_sub(1);
    }

    /// Moves the hour cursor right, stopping at the last hour of the window
    fn move_hour_cursor_right(&mut self) {
        let len = self.selected_window().len();
        if self.hour_cursor + 1 < len {
            self.hour_cursor += 1;
        }
    }

    fn select_previous_day(&mut self) {
        if self.selected_day > 0 {
            self.selected_day -= 1;
            self.hour_cursor = 0;
        }
    }

    fn select_next_day(&mut self) {
        if self.selected_day + 1 < self.day_count() {
            self.selected_day += 1;
            self.hour_cursor = 0;
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DailySeries, Forecast, HourlySeries};
    use crate::settings::Units;
    use chrono::{NaiveDate, Utc};
    use chrono_tz::Tz;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    /// Helper to create a KeyEvent for testing
    fn key_event(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 7, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    /// Seven days of hourly data from 2024-07-15 00:00; temperature equals the hour index
    fn sample_forecast(days: usize) -> LoadedForecast {
        let hours = days * 24;
        let mut hourly = HourlySeries {
            time: (0..hours)
                .map(|h| at(15, 0) + chrono::Duration::hours(h as i64))
                .collect(),
            temperature: (0..hours).map(|h| Some(h as f64)).collect(),
            cloud_cover: (0..hours).map(|_| Some(10.0)).collect(),
            ..Default::default()
        };
        hourly.normalize();
        let mut daily = DailySeries {
            time: (0..days)
                .map(|d| NaiveDate::from_ymd_opt(2024, 7, 15 + d as u32).unwrap())
                .collect(),
            ..Default::default()
        };
        daily.normalize();

        LoadedForecast {
            location: Location::new(52.52, 13.405).unwrap(),
            place_name: "Berlin".to_string(),
            forecast: Forecast {
                timezone: "Europe/Berlin".to_string(),
                utc_offset_seconds: 7200,
                hourly,
                daily,
            },
            timezone: Tz::Europe__Berlin,
            fetched_at: Utc::now(),
        }
    }

    fn test_app() -> App {
        let mut app = App::with_startup_config(StartupConfig::default(), None);
        app.freeze_clock(at(15, 10));
        app
    }

    fn loaded_app() -> App {
        let mut app = test_app();
        app.apply(FetchMessage::Loaded(Box::new(sample_forecast(7))));
        app
    }

    fn create_test_store() -> (SettingsStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = SettingsStore::with_dir(temp_dir.path().to_path_buf());
        (store, temp_dir)
    }

    // ========================================================================
    // Startup
    // ========================================================================

    #[test]
    fn test_initial_state_without_location_is_welcome() {
        let mut app = test_app();
        assert_eq!(app.state, AppState::Welcome);
        assert!(app.take_request().is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_startup_query_is_requested() {
        let config = StartupConfig {
            initial_target: Some(LookupTarget::Query("Paris".to_string())),
            ..Default::default()
        };
        let mut app = App::with_startup_config(config, None);

        assert_eq!(app.state, AppState::Loading);
        assert_eq!(
            app.take_request(),
            Some(FetchRequest::Load(LookupTarget::Query("Paris".to_string())))
        );
        assert!(app.take_request().is_none());
    }

    #[test]
    fn test_startup_uses_saved_location() {
        let (store, _temp_dir) = create_test_store();
        let location = Location::new(59.91, 10.75).unwrap();
        store
            .update(|p| {
                p.coordinates = Some(location);
                p.city_name = "Oslo".to_string();
            })
            .unwrap();

        let mut app = App::with_startup_config(StartupConfig::default(), Some(store));

        assert_eq!(
            app.take_request(),
            Some(FetchRequest::Load(LookupTarget::Coordinates {
                location,
                label: Some("Oslo".to_string()),
            }))
        );
    }

    #[test]
    fn test_startup_overrides_are_not_persisted() {
        let (store, _temp_dir) = create_test_store();
        let config = StartupConfig {
            dark_mode: Some(true),
            units: Some(Units::Fahrenheit),
            initial_day: 3,
            ..Default::default()
        };
        let app = App::with_startup_config(config, Some(store.clone()));

        assert!(app.preferences.dark_mode);
        assert_eq!(app.preferences.units, Units::Fahrenheit);
        assert_eq!(app.selected_day, 3);
        assert!(!store.load().dark_mode);
    }

    // ========================================================================
    // Search input
    // ========================================================================

    #[test]
    fn test_slash_enters_editing_and_enter_submits() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        assert_eq!(app.input_mode, InputMode::Editing);

        for c in "Rome".chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
        app.handle_key(key_event(KeyCode::Enter));

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.state, AppState::Loading);
        assert_eq!(
            app.take_request(),
            Some(FetchRequest::Load(LookupTarget::Query("Rome".to_string())))
        );
    }

    #[test]
    fn test_q_while_editing_is_text() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('s')));
        app.handle_key(key_event(KeyCode::Char('q')));

        assert!(!app.should_quit);
        assert_eq!(app.search_input, "q");
    }

    #[test]
    fn test_backspace_and_escape() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Char('a')));
        app.handle_key(key_event(KeyCode::Char('b')));
        app.handle_key(key_event(KeyCode::Backspace));
        assert_eq!(app.search_input, "a");

        app.handle_key(key_event(KeyCode::Esc));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.take_request().is_none());
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(key_event(KeyCode::Char(' ')));
        app.handle_key(key_event(KeyCode::Enter));

        assert!(app.take_request().is_none());
        assert_eq!(app.state, AppState::Welcome);
    }

    // ========================================================================
    // Fetch results
    // ========================================================================

    #[test]
    fn test_loaded_sets_ready_and_persists_location() {
        let (store, _temp_dir) = create_test_store();
        let mut app = App::with_startup_config(StartupConfig::default(), Some(store.clone()));
        app.freeze_clock(at(15, 10));

        app.apply(FetchMessage::Started);
        assert_eq!(app.state, AppState::Loading);
        assert!(app.is_fetching);

        app.apply(FetchMessage::Loaded(Box::new(sample_forecast(7))));

        assert_eq!(app.state, AppState::Ready);
        assert!(!app.is_fetching);
        assert_eq!(app.location, Location::new(52.52, 13.405));
        let saved = store.load();
        assert_eq!(saved.city_name, "Berlin");
        assert_eq!(saved.coordinates, Location::new(52.52, 13.405));
    }

    #[test]
    fn test_refresh_keeps_data_visible() {
        let mut app = loaded_app();
        app.apply(FetchMessage::Started);

        assert_eq!(app.state, AppState::Ready);
        assert!(app.is_fetching);
    }

    #[test]
    fn test_failed_clears_data_and_location() {
        let mut app = loaded_app();
        app.apply(FetchMessage::Failed("Error fetching data.".to_string()));

        assert_eq!(app.state, AppState::Error("Error fetching data.".to_string()));
        assert!(app.loaded.is_none());
        assert!(app.location.is_none());
        assert!(app.chart_model().is_empty());
        assert!(app.day_summaries().is_empty());
    }

    #[test]
    fn test_esc_dismisses_error() {
        let mut app = test_app();
        app.apply(FetchMessage::Failed("boom".to_string()));
        app.handle_key(key_event(KeyCode::Esc));
        assert_eq!(app.state, AppState::Welcome);
    }

    #[test]
    fn test_loaded_clamps_selected_day() {
        let mut app = test_app();
        app.selected_day = 6;
        app.apply(FetchMessage::Loaded(Box::new(sample_forecast(3))));
        assert_eq!(app.selected_day, 2);
    }

    // ========================================================================
    // Day and hour navigation
    // ========================================================================

    #[test]
    fn test_today_window_starts_at_current_hour() {
        let app = loaded_app();
        let window = app.selected_window();

        assert_eq!(window.len(), 24);
        assert_eq!(window.offset(), 10);
        assert_eq!(app.current_hour().unwrap().time, at(15, 10));
    }

    #[test]
    fn test_next_day_starts_at_midnight() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Down));

        assert_eq!(app.selected_day, 1);
        assert_eq!(app.selected_window().offset(), 24);
        assert_eq!(app.cursor_hour().unwrap().time, at(16, 0));
    }

    #[test]
    fn test_day_navigation_is_clamped() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Up));
        assert_eq!(app.selected_day, 0);

        for _ in 0..10 {
            app.handle_key(key_event(KeyCode::Char(']')));
        }
        assert_eq!(app.selected_day, 6);

        app.handle_key(key_event(KeyCode::Char('[')));
        app.handle_key(key_event(KeyCode::Char('k')));
        assert_eq!(app.selected_day, 4);
    }

    #[test]
    fn test_hour_cursor_moves_within_window() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Left));
        assert_eq!(app.hour_cursor, 0);

        app.handle_key(key_event(KeyCode::Right));
        app.handle_key(key_event(KeyCode::Char('l')));
        assert_eq!(app.hour_cursor, 2);
        assert_eq!(app.cursor_hour().unwrap().temperature, 12.0);

        for _ in 0..40 {
            app.handle_key(key_event(KeyCode::Right));
        }
        assert_eq!(app.hour_cursor, 23);

        app.handle_key(key_event(KeyCode::Char('h')));
        assert_eq!(app.hour_cursor, 22);
    }

    #[test]
    fn test_changing_day_resets_hour_cursor() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Right));
        app.handle_key(key_event(KeyCode::Char('j')));
        assert_eq!(app.hour_cursor, 0);
    }

    #[test]
    fn test_day_summaries_and_sky_scene() {
        let app = loaded_app();
        let days = app.day_summaries();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].label, "Today");

        let scene = app.sky_scene().expect("scene should exist");
        assert!(!scene.is_night);
    }

    // ========================================================================
    // Preferences
    // ========================================================================

    #[test]
    fn test_series_toggle_persists() {
        let (store, _temp_dir) = create_test_store();
        let mut app = App::with_startup_config(StartupConfig::default(), Some(store.clone()));

        app.handle_key(key_event(KeyCode::Char('4')));

        assert!(!app
            .preferences
            .chart_visibility
            .is_visible(SeriesKind::SolarRadiation));
        assert!(!store.load().chart_visibility.solar_radiation);

        app.handle_key(key_event(KeyCode::Char('4')));
        assert!(store.load().chart_visibility.solar_radiation);
    }

    #[test]
    fn test_theme_map_and_units_toggles_persist() {
        let (store, _temp_dir) = create_test_store();
        let mut app = App::with_startup_config(StartupConfig::default(), Some(store.clone()));

        app.handle_key(key_event(KeyCode::Char('d')));
        app.handle_key(key_event(KeyCode::Char('m')));
        app.handle_key(key_event(KeyCode::Char('u')));

        let saved = store.load();
        assert!(saved.dark_mode);
        assert!(!saved.map_visible);
        assert_eq!(saved.units, Units::Fahrenheit);
        assert_eq!(saved, app.preferences);
    }

    #[test]
    fn test_units_change_chart_values() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('u')));

        let model = app.chart_model();
        let temps = model.get(SeriesKind::Temperature).unwrap();
        // Hour 10 is 10 °C
        assert_eq!(temps.values[0], 50.0);
    }

    // ========================================================================
    // Refresh, help, quit
    // ========================================================================

    #[test]
    fn test_refresh_only_with_data() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('r')));
        assert!(app.take_request().is_none());

        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('r')));
        assert_eq!(app.take_request(), Some(FetchRequest::Refresh));
    }

    #[test]
    fn test_rejected_request_is_retried() {
        let mut app = test_app();
        let target = LookupTarget::Query("Oslo".to_string());
        app.request_rejected(RequestError::QueueFull(FetchRequest::Load(target.clone())));

        assert_eq!(app.take_request(), Some(FetchRequest::Load(target)));
    }

    #[test]
    fn test_rejected_request_keeps_newer_input() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        for c in "Rome".chars() {
            app.handle_key(key_event(KeyCode::Char(c)));
        }
        app.handle_key(key_event(KeyCode::Enter));

        app.request_rejected(RequestError::QueueFull(FetchRequest::Refresh));
        assert_eq!(
            app.take_request(),
            Some(FetchRequest::Load(LookupTarget::Query("Rome".to_string())))
        );
    }

    #[test]
    fn test_stopped_worker_leaves_loading() {
        let mut app = test_app();
        app.state = AppState::Loading;
        app.request_rejected(RequestError::Stopped);

        assert_eq!(
            app.state,
            AppState::Error(LookupError::USER_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_help_overlay_intercepts_keys() {
        let mut app = loaded_app();
        app.handle_key(key_event(KeyCode::Char('?')));
        assert!(app.show_help);

        app.handle_key(key_event(KeyCode::Char('d')));
        assert!(!app.preferences.dark_mode);

        app.handle_key(key_event(KeyCode::Esc));
        assert!(!app.show_help);
    }

    #[test]
    fn test_q_quits() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_while_editing() {
        let mut app = test_app();
        app.handle_key(key_event(KeyCode::Char('/')));
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    // ========================================================================
    // Mouse
    // ========================================================================

    #[test]
    fn test_map_click_requests_location() {
        let mut app = test_app();
        app.map_area = Some(Rect::new(10, 5, 36, 18));

        // Centre of the map is roughly 0°, 0°
        app.handle_mouse(click(28, 14));

        match app.take_request() {
            Some(FetchRequest::Load(LookupTarget::Coordinates { location, label })) => {
                assert!(location.latitude.abs() < 10.0);
                assert!(location.longitude.abs() < 10.0);
                assert!(label.is_none());
            }
            other => panic!("Expected coordinates request, got {:?}", other),
        }
        assert_eq!(app.state, AppState::Loading);
    }

    #[test]
    fn test_click_outside_map_is_ignored() {
        let mut app = test_app();
        app.map_area = Some(Rect::new(10, 5, 36, 18));
        app.handle_mouse(click(2, 2));
        assert!(app.take_request().is_none());
    }

    #[test]
    fn test_click_ignored_when_map_hidden() {
        let mut app = test_app();
        app.map_area = Some(Rect::new(10, 5, 36, 18));
        app.preferences.map_visible = false;
        app.handle_mouse(click(28, 14));
        assert!(app.take_request().is_none());
    }
}
