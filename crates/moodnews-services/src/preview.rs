//! Category headline lists: the news screen and the settings preview.

use moodnews_news::{aggregate_category_news, Article, NewsSource, HOME_LIMIT, PREVIEW_LIMIT};

use crate::error::LoadError;

/// Headlines for the selected categories, as shown on the news screen.
///
/// # Errors
/// Returns the first failed category request.
pub async fn load_category_news<N, C>(news: &N, categories: &[C]) -> Result<Vec<Article>, LoadError>
where
    N: NewsSource + ?Sized,
    C: AsRef<str> + Sync,
{
    Ok(aggregate_category_news(news, categories, HOME_LIMIT).await?)
}

/// The short list shown under the category picker in settings.
///
/// # Errors
/// Returns the first failed category request.
pub async fn load_category_preview<N, C>(
    news: &N,
    categories: &[C],
) -> Result<Vec<Article>, LoadError>
where
    N: NewsSource + ?Sized,
    C: AsRef<str> + Sync,
{
    Ok(aggregate_category_news(news, categories, PREVIEW_LIMIT).await?)
}
