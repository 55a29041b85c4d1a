//! News service for MoodNews.
//!
//! NewsAPI client, temperature mood classification, and the aggregation
//! pipeline that turns mood keywords (or categories) into one
//! de-duplicated, capped article list.

pub mod aggregate;
pub mod client;
pub mod mood;
pub mod types;

pub use aggregate::{
    aggregate_category_news, aggregate_mood_news, collect_category_headlines,
    collect_keyword_results, dedup_by_title, NewsSource, HOME_LIMIT, PREVIEW_LIMIT,
};
pub use client::NewsClient;
pub use mood::{keywords_for_mood, mood_from_temp, Mood};
pub use types::{Article, NewsError};
