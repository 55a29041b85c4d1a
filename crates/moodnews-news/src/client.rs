//! NewsAPI client.

use async_trait::async_trait;
use moodnews_core::NewsConfig;
use std::time::Duration;
use tracing::instrument;

use crate::aggregate::NewsSource;
use crate::types::{ApiErrorBody, Article, ArticlesResponse, NewsError};

const NEWS_API_BASE: &str = "https://newsapi.org";
const DEFAULT_COUNTRY: &str = "us";
const REQUEST_TIMEOUT_SECS: u64 = 10;

pub struct NewsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    country: String,
}

impl NewsClient {
    pub fn new(api_key: &str) -> Result<Self, NewsError> {
        Self::with_base_url(api_key, NEWS_API_BASE)
    }

    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, NewsError> {
        Self::build(
            api_key,
            base_url,
            DEFAULT_COUNTRY,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    pub fn from_config(config: &NewsConfig) -> Result<Self, NewsError> {
        Self::build(
            &config.api_key,
            &config.base_url,
            &config.country,
            config.timeout(),
        )
    }

    fn build(
        api_key: &str,
        base_url: &str,
        country: &str,
        timeout: Duration,
    ) -> Result<Self, NewsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            country: country.to_string(),
        })
    }

    /// Top headlines for the configured country, optionally by category.
    #[instrument(skip(self), level = "info")]
    pub async fn top_headlines(&self, category: Option<&str>) -> Result<Vec<Article>, NewsError> {
        let mut url = format!(
            "{}/v2/top-headlines?country={}",
            self.base_url,
            urlencoding::encode(&self.country),
        );
        if let Some(category) = category {
            url.push_str(&format!("&category={}", urlencoding::encode(category)));
        }
        url.push_str(&format!("&apiKey={}", urlencoding::encode(&self.api_key)));

        self.fetch_articles(&url).await
    }

    /// Full-text search sorted by publish time, newest first.
    #[instrument(skip(self), level = "info")]
    pub async fn search(&self, query: &str) -> Result<Vec<Article>, NewsError> {
        let url = format!(
            "{}/v2/everything?q={}&sortBy=publishedAt&apiKey={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.api_key),
        );

        self.fetch_articles(&url).await
    }

    async fn fetch_articles(&self, url: &str) -> Result<Vec<Article>, NewsError> {
        let response = self.client.get(url).send().await?;
        let body: ArticlesResponse = self.handle_response(response).await?;

        let total = body.articles.len();
        let articles: Vec<Article> = body
            .articles
            .into_iter()
            .filter_map(|a| a.into_article())
            .collect();
        if articles.len() < total {
            tracing::debug!("Dropped {} articles without title or url", total - articles.len());
        }
        Ok(articles)
    }

    /// Helper to handle API responses and errors.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, NewsError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| NewsError::Parse(format!("JSON parse error: {}", e)))
        } else if status.as_u16() == 401 {
            Err(NewsError::InvalidApiKey)
        } else if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            Err(NewsError::RateLimited(retry_after))
        } else {
            let text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&text)
                .ok()
                .and_then(|body| match (body.code, body.message) {
                    (Some(code), Some(message)) => Some(format!("{} ({})", message, code)),
                    (None, Some(message)) => Some(message),
                    _ => None,
                })
                .unwrap_or(text);
            Err(NewsError::Api(format!("{}: {}", status, detail)))
        }
    }
}

#[async_trait]
impl NewsSource for NewsClient {
    async fn top_headlines(&self, category: Option<&str>) -> Result<Vec<Article>, NewsError> {
        NewsClient::top_headlines(self, category).await
    }

    async fn search(&self, query: &str) -> Result<Vec<Article>, NewsError> {
        NewsClient::search(self, query).await
    }
}
