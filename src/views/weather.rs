//! Current track weather.

use crate::openf1::WeatherRecord;
use crate::views::format::format_clock;
use crate::views::latest::parse_timestamp;

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherView {
    pub air_temperature: Option<f64>,
    pub track_temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_direction: Option<f64>,
    pub raining: bool,
    /// `HH:MM:SS` UTC of the sample.
    pub sampled_at: String,
}

/// The most recent sample; on equal timestamps the later record wins.
#[must_use]
pub fn latest_weather(samples: &[WeatherRecord]) -> Option<WeatherView> {
    let latest = samples
        .iter()
        .enumerate()
        .max_by_key(|(idx, s)| (parse_timestamp(s.date.as_deref()), *idx))
        .map(|(_, s)| s)?;

    let ts = parse_timestamp(latest.date.as_deref());
    Some(WeatherView {
        air_temperature: latest.air_temperature,
        track_temperature: latest.track_temperature,
        humidity: latest.humidity,
        pressure: latest.pressure,
        wind_speed: latest.wind_speed,
        wind_direction: latest.wind_direction,
        raining: latest.rainfall.is_some_and(|r| r > 0.0),
        sampled_at: format_clock(ts),
    })
}
