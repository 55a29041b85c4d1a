//! OpenWeather forecast client.

use async_trait::async_trait;
use moodnews_core::{Units, WeatherConfig};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::types::{Forecast, ForecastResponse, Location, WeatherError};

const OPENWEATHER_API_BASE: &str = "https://api.openweathermap.org";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Anything that can produce a forecast for a location.
#[async_trait]
pub trait WeatherSource: Send + Sync {
    async fn forecast(&self, location: &Location, units: Units) -> Result<Forecast, WeatherError>;
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    api_key: String,
    base_url: String,
}

impl WeatherProvider {
    pub fn new(api_key: &str) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, OPENWEATHER_API_BASE)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, WeatherError> {
        Self::build(
            api_key,
            base_url,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn from_config(config: &WeatherConfig) -> Result<Self, WeatherError> {
        Self::build(&config.api_key, &config.base_url, config.timeout())
    }

    fn build(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client: Arc::new(client),
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the 5-day forecast and reduce it to summary + daily items.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(
        &self,
        location: &Location,
        units: Units,
    ) -> Result<Forecast, WeatherError> {
        let url = format!(
            "{}/data/2.5/forecast?lat={}&lon={}&units={}&appid={}",
            self.base_url, location.latitude, location.longitude, units, self.api_key
        );

        let response = self.client.get(&url).send().await?;
        let body: ForecastResponse = Self::handle_response(response).await?;

        tracing::debug!("Forecast feed has {} entries", body.list.len());
        Forecast::from_entries(&body.list)
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, WeatherError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| WeatherError::Parse(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 401 {
            Err(WeatherError::InvalidApiKey)
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(WeatherError::RateLimited(retry_after))
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(WeatherError::Api(format!("{}: {}", status, text)))
        }
    }
}

#[async_trait]
impl WeatherSource for WeatherProvider {
    async fn forecast(&self, location: &Location, units: Units) -> Result<Forecast, WeatherError> {
        self.fetch_forecast(location, units).await
    }
}
