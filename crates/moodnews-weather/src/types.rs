use chrono::{NaiveDate, NaiveDateTime};
use moodnews_core::ReqwestErrorExt;
use serde::{Deserialize, Serialize};

/// Number of 3-hour entries per day in the forecast feed
pub const ENTRIES_PER_DAY: usize = 8;

/// Maximum number of daily forecast items
pub const FORECAST_DAYS: usize = 5;

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Geographic location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Current conditions, taken from the first forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    /// Temperature in the units the forecast was requested in
    pub temperature: f64,
    pub description: String,
    pub icon_id: String,
}

/// One forecast entry per calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastItem {
    pub date: NaiveDate,
    pub temperature: f64,
    pub description: String,
    pub icon_id: String,
}

/// Summary plus daily forecast, ordered by date ascending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub summary: WeatherSummary,
    pub daily: Vec<ForecastItem>,
}

impl Forecast {
    /// Reduce the 3-hour feed: the summary comes from entry 0, the daily
    /// list from every 8th entry starting at 0, at most five of them.
    pub fn from_entries(entries: &[ForecastEntry]) -> Result<Self, WeatherError> {
        let first = entries
            .first()
            .ok_or_else(|| WeatherError::Parse("forecast list is empty".to_string()))?;
        let condition = first.condition()?;

        let summary = WeatherSummary {
            temperature: first.main.temp,
            description: condition.description.clone(),
            icon_id: condition.icon.clone(),
        };

        let daily = entries
            .iter()
            .step_by(ENTRIES_PER_DAY)
            .take(FORECAST_DAYS)
            .map(ForecastEntry::to_item)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { summary, daily })
    }
}

/// Forecast endpoint payload
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastEntry>,
}

/// One 3-hour slot of the forecast feed
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    /// "YYYY-MM-DD HH:MM:SS", UTC
    pub dt_txt: String,
    pub main: MainReading,
    #[serde(default)]
    pub weather: Vec<Condition>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MainReading {
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Condition {
    pub description: String,
    pub icon: String,
}

impl ForecastEntry {
    fn condition(&self) -> Result<&Condition, WeatherError> {
        self.weather
            .first()
            .ok_or_else(|| WeatherError::Parse(format!("no conditions for {}", self.dt_txt)))
    }

    fn date(&self) -> Result<NaiveDate, WeatherError> {
        NaiveDateTime::parse_from_str(&self.dt_txt, DT_TXT_FORMAT)
            .map(|dt| dt.date())
            .map_err(|e| WeatherError::Parse(format!("bad timestamp {:?}: {}", self.dt_txt, e)))
    }

    fn to_item(&self) -> Result<ForecastItem, WeatherError> {
        let condition = self.condition()?;
        Ok(ForecastItem {
            date: self.date()?,
            temperature: self.main.temp,
            description: condition.description.clone(),
            icon_id: condition.icon.clone(),
        })
    }
}

/// Location service errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Permission to access location was denied")]
    PermissionDenied,
    #[error("{0}")]
    Unavailable(String),
}

impl LocationError {
    /// Denial ends location use for the session; other failures may be
    /// retried by the user.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Invalid API key")]
    InvalidApiKey,
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
    #[error("Weather API error: {0}")]
    Api(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(e) => e.to_network_error().user_message(),
            Self::InvalidApiKey => "Weather API key is invalid. Check settings.",
            Self::RateLimited(_) => "Too many weather requests. Please wait and try again.",
            Self::Api(_) => "Weather service error. Please try again.",
            Self::Parse(_) => "Weather data could not be read. Please try again.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(index: usize) -> ForecastEntry {
        let day = 1 + index / ENTRIES_PER_DAY;
        let hour = (index % ENTRIES_PER_DAY) * 3;
        ForecastEntry {
            dt_txt: format!("2024-03-{:02} {:02}:00:00", day, hour),
            main: MainReading {
                temp: index as f64,
            },
            weather: vec![Condition {
                description: format!("slot {}", index),
                icon: format!("{:02}d", index % 50),
            }],
        }
    }

    #[test]
    fn daily_items_come_from_every_eighth_entry() {
        let entries: Vec<_> = (0..40).map(entry).collect();
        let forecast = Forecast::from_entries(&entries).unwrap();

        assert_eq!(forecast.daily.len(), 5);
        let temps: Vec<f64> = forecast.daily.iter().map(|d| d.temperature).collect();
        assert_eq!(temps, vec![0.0, 8.0, 16.0, 24.0, 32.0]);
        assert_eq!(
            forecast.daily[1].date,
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
        assert!(forecast.daily.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn summary_comes_from_first_entry() {
        let entries: Vec<_> = (0..40).map(entry).collect();
        let forecast = Forecast::from_entries(&entries).unwrap();
        assert_eq!(forecast.summary.temperature, 0.0);
        assert_eq!(forecast.summary.description, "slot 0");
        assert_eq!(forecast.summary.icon_id, "00d");
    }

    #[test]
    fn short_feed_yields_fewer_days() {
        let entries: Vec<_> = (0..17).map(entry).collect();
        let forecast = Forecast::from_entries(&entries).unwrap();
        assert_eq!(forecast.daily.len(), 3);
    }

    #[test]
    fn longer_feed_is_capped_at_five_days() {
        let entries: Vec<_> = (0..56).map(entry).collect();
        let forecast = Forecast::from_entries(&entries).unwrap();
        assert_eq!(forecast.daily.len(), 5);
    }

    #[test]
    fn empty_feed_is_parse_error() {
        assert!(matches!(
            Forecast::from_entries(&[]),
            Err(WeatherError::Parse(_))
        ));
    }

    #[test]
    fn missing_conditions_is_parse_error() {
        let mut first = entry(0);
        first.weather.clear();
        assert!(matches!(
            Forecast::from_entries(&[first]),
            Err(WeatherError::Parse(_))
        ));
    }

    #[test]
    fn bad_timestamp_is_parse_error() {
        let mut first = entry(0);
        first.dt_txt = "tomorrow".to_string();
        assert!(matches!(
            Forecast::from_entries(&[first]),
            Err(WeatherError::Parse(_))
        ));
    }

    #[test]
    fn permission_denial_is_terminal() {
        assert!(LocationError::PermissionDenied.is_terminal());
        assert!(!LocationError::Unavailable("no fix".into()).is_terminal());
        assert_eq!(
            LocationError::PermissionDenied.to_string(),
            "Permission to access location was denied"
        );
    }

    #[test]
    fn weather_error_user_messages() {
        assert!(WeatherError::InvalidApiKey.user_message().contains("API key"));
        assert!(WeatherError::Parse("x".into()).user_message().contains("could not be read"));
    }
}
