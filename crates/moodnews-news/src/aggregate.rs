//! Mood-driven news aggregation.
//!
//! Keyword searches run one after another in keyword order. Only when all
//! of them together return nothing are category headlines fetched, and
//! those are fetched concurrently. Whatever was collected is then
//! de-duplicated by title and capped. Any failed request fails the whole
//! aggregation.

use std::collections::HashSet;

use async_trait::async_trait;
use futures::future::try_join_all;

use crate::types::{Article, NewsError};

/// Cap for the home screen and news screen lists
pub const HOME_LIMIT: usize = 30;
/// Cap for the settings preview list
pub const PREVIEW_LIMIT: usize = 5;

/// The two news queries the aggregator needs.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Top headlines, optionally restricted to one category.
    async fn top_headlines(&self, category: Option<&str>) -> Result<Vec<Article>, NewsError>;

    /// Full-text search, newest first.
    async fn search(&self, query: &str) -> Result<Vec<Article>, NewsError>;
}

/// Run one search per keyword, each awaited before the next is issued,
/// and concatenate the results in keyword order.
///
/// # Errors
/// Returns the first search error; nothing collected so far is returned.
pub async fn collect_keyword_results<S, K>(
    source: &S,
    keywords: &[K],
) -> Result<Vec<Article>, NewsError>
where
    S: NewsSource + ?Sized,
    K: AsRef<str> + Sync,
{
    let mut collected = Vec::new();
    for keyword in keywords {
        let keyword: &str = keyword.as_ref();
        let results = source.search(keyword).await?;
        tracing::debug!("Search {:?} returned {} articles", keyword, results.len());
        collected.extend(results);
    }
    Ok(collected)
}

/// Fetch headlines for every category concurrently and concatenate them in
/// category order, whatever order the requests complete in.
///
/// # Errors
/// Returns the first error; the remaining requests are dropped.
pub async fn collect_category_headlines<S, C>(
    source: &S,
    categories: &[C],
) -> Result<Vec<Article>, NewsError>
where
    S: NewsSource + ?Sized,
    C: AsRef<str> + Sync,
{
    let per_category = try_join_all(
        categories
            .iter()
            .map(|category| source.top_headlines(Some(category.as_ref()))),
    )
    .await?;

    Ok(per_category.into_iter().flatten().collect())
}

/// Keep the first article for each title, in order. Untitled articles are
/// dropped.
pub fn dedup_by_title(articles: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|a| !a.title.is_empty() && seen.insert(a.title.clone()))
        .collect()
}

/// Keyword results, falling back to category headlines when the keyword
/// searches found nothing at all; then de-duplicated and capped at `limit`.
///
/// # Errors
/// Returns the first error from any request.
pub async fn aggregate_mood_news<S, K, C>(
    source: &S,
    keywords: &[K],
    categories: &[C],
    limit: usize,
) -> Result<Vec<Article>, NewsError>
where
    S: NewsSource + ?Sized,
    K: AsRef<str> + Sync,
    C: AsRef<str> + Sync,
{
    let mut collected = collect_keyword_results(source, keywords).await?;

    if collected.is_empty() {
        tracing::info!(
            "Keyword searches found nothing, falling back to {} categories",
            categories.len()
        );
        collected = collect_category_headlines(source, categories).await?;
    }

    let mut articles = dedup_by_title(collected);
    articles.truncate(limit);
    Ok(articles)
}

/// Category headlines only, de-duplicated and capped at `limit`.
///
/// # Errors
/// Returns the first error from any request.
pub async fn aggregate_category_news<S, C>(
    source: &S,
    categories: &[C],
    limit: usize,
) -> Result<Vec<Article>, NewsError>
where
    S: NewsSource + ?Sized,
    C: AsRef<str> + Sync,
{
    let collected = collect_category_headlines(source, categories).await?;
    let mut articles = dedup_by_title(collected);
    articles.truncate(limit);
    Ok(articles)
}
