use moodnews_news::NewsError;
use moodnews_weather::WeatherError;
use thiserror::Error;

/// Failure of a screen load. The load is abandoned as a whole.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Weather fetch failed: {0}")]
    Weather(#[from] WeatherError),

    #[error("News fetch failed: {0}")]
    News(#[from] NewsError),
}

impl LoadError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LoadError::Weather(e) => e.user_message(),
            LoadError::News(e) => e.user_message(),
        }
    }
}
