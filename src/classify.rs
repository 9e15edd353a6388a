//! Threshold-based classification of weather metrics
//!
//! Every function here is pure: the same inputs always give the same icon,
//! compass point or sky scene.

/// Symbolic weather condition shown next to a forecast value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherIcon {
    Sunny,
    MostlySunny,
    PartlyCloudy,
    Cloudy,
    Showers,
    HeavyRain,
    Snow,
    Thunderstorm,
}

impl WeatherIcon {
    /// Single glyph for compact display
    pub fn symbol(&self) -> &'static str {
        match self {
            WeatherIcon::Sunny => "☀",
            WeatherIcon::MostlySunny => "🌤",
            WeatherIcon::PartlyCloudy => "⛅",
            WeatherIcon::Cloudy => "☁",
            WeatherIcon::Showers => "🌦",
            WeatherIcon::HeavyRain => "🌧",
            WeatherIcon::Snow => "❄",
            WeatherIcon::Thunderstorm => "⛈",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherIcon::Sunny => "Sunny",
            WeatherIcon::MostlySunny => "Mostly sunny",
            WeatherIcon::PartlyCloudy => "Partly cloudy",
            WeatherIcon::Cloudy => "Cloudy",
            WeatherIcon::Showers => "Showers",
            WeatherIcon::HeavyRain => "Heavy rain",
            WeatherIcon::Snow => "Snow",
            WeatherIcon::Thunderstorm => "Thunderstorm",
        }
    }
}

/// Classify an hour of weather into an icon
///
/// Rules are checked in order; the first match wins:
/// 1. probability > 80 % and amount > 10 mm is a thunderstorm
/// 2. temperature <= 2 °C with probability > 50 % is snow
/// 3. probability > 50 % is heavy rain under > 80 % cloud, showers otherwise
/// 4. anything else falls back to [`cloud_icon`]
pub fn weather_icon(
    cloud_cover: f64,
    precip_probability: f64,
    temperature_c: f64,
    precip_mm: f64,
) -> WeatherIcon {
    if precip_probability > 80.0 && precip_mm > 10.0 {
        return WeatherIcon::Thunderstorm;
    }
    if temperature_c <= 2.0 && precip_probability > 50.0 {
        return WeatherIcon::Snow;
    }
    if precip_probability > 50.0 {
        return if cloud_cover > 80.0 {
            WeatherIcon::HeavyRain
        } else {
            WeatherIcon::Showers
        };
    }
    cloud_icon(cloud_cover)
}

/// Icon from cloud cover alone
pub fn cloud_icon(cloud_cover: f64) -> WeatherIcon {
    if cloud_cover < 25.0 {
        WeatherIcon::Sunny
    } else if cloud_cover < 50.0 {
        WeatherIcon::MostlySunny
    } else if cloud_cover < 75.0 {
        WeatherIcon::PartlyCloudy
    } else {
        WeatherIcon::Cloudy
    }
}

/// One of the eight principal compass directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompassPoint {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

const COMPASS_POINTS: [CompassPoint; 8] = [
    CompassPoint::N,
    CompassPoint::NE,
    CompassPoint::E,
    CompassPoint::SE,
    CompassPoint::S,
    CompassPoint::SW,
    CompassPoint::W,
    CompassPoint::NW,
];

impl CompassPoint {
    /// Nearest compass point for a bearing in degrees (any real value)
    pub fn from_degrees(degrees: f64) -> Self {
        if !degrees.is_finite() {
            return CompassPoint::N;
        }
        let sector = (degrees / 45.0).round() as i64;
        COMPASS_POINTS[sector.rem_euclid(8) as usize]
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NE => "NE",
            CompassPoint::E => "E",
            CompassPoint::SE => "SE",
            CompassPoint::S => "S",
            CompassPoint::SW => "SW",
            CompassPoint::W => "W",
            CompassPoint::NW => "NW",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CompassPoint::N => "North",
            CompassPoint::NE => "Northeast",
            CompassPoint::E => "East",
            CompassPoint::SE => "Southeast",
            CompassPoint::S => "South",
            CompassPoint::SW => "Southwest",
            CompassPoint::W => "West",
            CompassPoint::NW => "Northwest",
        }
    }
}

/// Strength of direct sunlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolarIntensity {
    None,
    Low,
    Medium,
    High,
}

/// Sky coverage bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloudLevel {
    Clear,
    PartlyCloudy,
    MostlyCloudy,
    Overcast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnowIntensity {
    None,
    Light,
    Moderate,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RainIntensity {
    None,
    Light,
    Moderate,
    Heavy,
    Extreme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindClass {
    Light,
    Moderate,
    Strong,
}

/// Measurements for the current hour used to describe the sky
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneInputs {
    /// Hour of day at the location, 0-23
    pub local_hour: u32,
    pub icon: WeatherIcon,
    /// Cloud cover, %
    pub cloud_cover: f64,
    /// Precipitation amount, mm
    pub precipitation: f64,
    /// Snowfall, cm
    pub snowfall: f64,
    /// Direct solar radiation, W/m²
    pub solar_radiation: f64,
    /// Wind speed, m/s
    pub wind_speed: f64,
    /// Wind direction, degrees
    pub wind_direction: f64,
}

/// Derived description of the current sky
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkyScene {
    pub is_night: bool,
    /// Sun or moon position across its 12-hour arc, 0-100 %
    pub celestial_position: f64,
    pub solar: SolarIntensity,
    pub clouds: CloudLevel,
    pub snow: SnowIntensity,
    pub rain: RainIntensity,
    pub wind: WindClass,
    /// Tilt of falling rain in degrees, negative for wind from the west half
    pub rain_angle: f64,
    pub lightning: bool,
}

/// Rain tilt at 10 m/s and above
const MAX_RAIN_ANGLE: f64 = 30.0;

impl SkyScene {
    pub fn classify(inputs: &SceneInputs) -> Self {
        let hour = inputs.local_hour % 24;
        let is_night = !(6..18).contains(&hour);
        let celestial_position = if is_night {
            let shifted = if hour < 6 { hour + 24 } else { hour };
            f64::from(shifted - 18) / 12.0 * 100.0
        } else {
            f64::from(hour - 6) / 12.0 * 100.0
        };

        let solar = if inputs.solar_radiation > 800.0 {
            SolarIntensity::High
        } else if inputs.solar_radiation > 400.0 {
            SolarIntensity::Medium
        } else if inputs.solar_radiation > 200.0 {
            SolarIntensity::Low
        } else {
            SolarIntensity::None
        };

        let clouds = if inputs.cloud_cover < 25.0 {
            CloudLevel::Clear
        } else if inputs.cloud_cover < 50.0 {
            CloudLevel::PartlyCloudy
        } else if inputs.cloud_cover < 75.0 {
            CloudLevel::MostlyCloudy
        } else {
            CloudLevel::Overcast
        };

        let snow = if inputs.snowfall <= 0.0 {
            SnowIntensity::None
        } else if inputs.snowfall < 0.5 {
            SnowIntensity::Light
        } else if inputs.snowfall < 4.0 {
            SnowIntensity::Moderate
        } else {
            SnowIntensity::Heavy
        };

        // Snow replaces rain
        let rain = if snow != SnowIntensity::None || inputs.precipitation <= 0.0 {
            RainIntensity::None
        } else if inputs.precipitation < 0.1 {
            RainIntensity::Light
        } else if inputs.precipitation < 3.5 {
            RainIntensity::Moderate
        } else if inputs.precipitation < 7.6 {
            RainIntensity::Heavy
        } else {
            RainIntensity::Extreme
        };

        let wind = if inputs.wind_speed < 5.0 {
            WindClass::Light
        } else if inputs.wind_speed < 10.0 {
            WindClass::Moderate
        } else {
            WindClass::Strong
        };

        let angle = inputs.wind_speed / 10.0 * MAX_RAIN_ANGLE;
        let rain_angle = if inputs.wind_direction > 180.0 {
            -angle
        } else {
            angle
        };

        Self {
            is_night,
            celestial_position,
            solar,
            clouds,
            snow,
            rain,
            wind,
            rain_angle,
            lightning: inputs.icon == WeatherIcon::Thunderstorm,
        }
    }

    /// One-line description, e.g. "Day · partly cloudy · moderate rain · light wind"
    pub fn summary(&self) -> String {
        let mut parts = vec![if self.is_night { "Night" } else { "Day" }.to_string()];

        parts.push(
            match self.clouds {
                CloudLevel::Clear => "clear sky",
                CloudLevel::PartlyCloudy => "partly cloudy",
                CloudLevel::MostlyCloudy => "mostly cloudy",
                CloudLevel::Overcast => "overcast",
            }
            .to_string(),
        );

        match self.snow {
            SnowIntensity::None => {}
            SnowIntensity::Light => parts.push("light snow".to_string()),
            SnowIntensity::Moderate => parts.push("snow".to_string()),
            SnowIntensity::Heavy => parts.push("heavy snow".to_string()),
        }

        match self.rain {
            RainIntensity::None => {}
            RainIntensity::Light => parts.push("drizzle".to_string()),
            RainIntensity::Moderate => parts.push("rain".to_string()),
            RainIntensity::Heavy => parts.push("heavy rain".to_string()),
            RainIntensity::Extreme => parts.push("extreme rain".to_string()),
        }

        if self.lightning {
            parts.push("lightning".to_string());
        }

        if !self.is_night && self.solar != SolarIntensity::None {
            parts.push(
                match self.solar {
                    SolarIntensity::High => "strong sun",
                    SolarIntensity::Medium => "bright sun",
                    _ => "weak sun",
                }
                .to_string(),
            );
        }

        parts.push(
            match self.wind {
                WindClass::Light => "light wind",
                WindClass::Moderate => "moderate wind",
                WindClass::Strong => "strong wind",
            }
            .to_string(),
        );

        parts.join(" · ")
    }
}
