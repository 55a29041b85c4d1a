use moodnews_core::ReqwestErrorExt;
use serde::{Deserialize, Serialize};

/// A news article as surfaced to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// De-duplication key
    pub title: String,
    pub description: String,
    pub url: String,
    pub source_name: Option<String>,
    /// ISO-8601 timestamp as sent by the service
    pub published_at: Option<String>,
}

/// Payload shared by the headlines and search endpoints
#[derive(Debug, Deserialize)]
pub(crate) struct ArticlesResponse {
    #[serde(default)]
    pub articles: Vec<ApiArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub source: Option<ApiSource>,
    pub published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiSource {
    pub name: Option<String>,
}

impl ApiArticle {
    /// Entries without a title or url are unusable and dropped.
    pub(crate) fn into_article(self) -> Option<Article> {
        let title = self.title.filter(|t| !t.is_empty())?;
        let url = self.url.filter(|u| !u.is_empty())?;
        Some(Article {
            title,
            description: self.description.unwrap_or_default(),
            url,
            source_name: self.source.and_then(|s| s.name),
            published_at: self.published_at,
        })
    }
}

/// Error body NewsAPI sends with non-2xx responses
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("News API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl NewsError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Network(e) => e.to_network_error().user_message(),
            Self::InvalidApiKey => "News API key is invalid. Check settings.",
            Self::RateLimited(_) => "Too many news requests. Please wait and try again.",
            Self::Api(_) => "News service error. Please try again.",
            Self::Parse(_) => "News data could not be read. Please try again.",
        }
    }
}
