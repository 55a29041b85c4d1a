//! Home screen: forecast, mood line and mood-filtered news.
//!
//! Reloads are not cancelled when a newer one starts. Each reload takes a
//! ticket from a monotonically increasing generation counter instead, and
//! only the holder of the latest ticket may write the display state.

use std::sync::atomic::{AtomicU64, Ordering};

use moodnews_core::Units;
use moodnews_news::{
    aggregate_mood_news, keywords_for_mood, mood_from_temp, Article, Mood, NewsSource, HOME_LIMIT,
};
use moodnews_weather::{Forecast, Location, WeatherSource};
use parking_lot::RwLock;

use crate::app_state::AppState;
use crate::error::LoadError;

/// Everything the home screen shows after a successful load.
#[derive(Debug, Clone, PartialEq)]
pub struct HomeFeed {
    pub forecast: Forecast,
    pub units: Units,
    pub mood: Mood,
    pub keywords: [&'static str; 3],
    pub articles: Vec<Article>,
}

impl HomeFeed {
    pub fn temperature_celsius(&self) -> f64 {
        self.units.to_celsius(self.forecast.summary.temperature)
    }

    /// e.g. `Mood: cold → keywords: recession OR crisis | ...`
    pub fn news_info(&self) -> String {
        format!("Mood: {} → keywords: {}", self.mood, self.keywords.join(" | "))
    }
}

/// Run the whole home pipeline once.
///
/// # Errors
/// Returns the first weather or news failure; nothing partial is kept.
pub async fn load_home<W, N>(
    weather: &W,
    news: &N,
    location: &Location,
    units: Units,
    categories: &[String],
) -> Result<HomeFeed, LoadError>
where
    W: WeatherSource + ?Sized,
    N: NewsSource + ?Sized,
{
    let forecast = weather.forecast(location, units).await?;

    let celsius = units.to_celsius(forecast.summary.temperature);
    let mood = mood_from_temp(celsius);
    let keywords = keywords_for_mood(mood);
    tracing::info!("Current temperature {:.1}°C, mood {}", celsius, mood);

    let articles = aggregate_mood_news(news, &keywords, categories, HOME_LIMIT).await?;
    tracing::info!("Home feed has {} articles", articles.len());

    Ok(HomeFeed {
        forecast,
        units,
        mood,
        keywords,
        articles,
    })
}

/// Identifies one reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What happened to a reload.
#[derive(Debug)]
pub enum LoadOutcome {
    /// The result is now on display
    Applied,
    /// A newer reload started meanwhile; the result was dropped
    Superseded,
    /// The load failed; the previous display state is kept
    Failed(LoadError),
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied)
    }
}

/// Display state of the home screen.
#[derive(Debug, Default)]
pub struct HomeScreen {
    generation: AtomicU64,
    display: RwLock<Option<HomeFeed>>,
}

impl HomeScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// What is on display, if any load has succeeded
    pub fn feed(&self) -> Option<HomeFeed> {
        self.display.read().clone()
    }

    /// Start a reload. Any earlier ticket becomes stale.
    pub fn begin(&self) -> LoadTicket {
        LoadTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Put `feed` on display if `ticket` is still the latest.
    pub fn commit(&self, ticket: LoadTicket, feed: HomeFeed) -> bool {
        let mut display = self.display.write();
        if !self.is_current(ticket) {
            tracing::debug!("Dropping result of superseded reload {}", ticket.0);
            return false;
        }
        *display = Some(feed);
        true
    }

    /// Run [`load_home`] and apply its result unless superseded.
    pub async fn reload<W, N>(
        &self,
        weather: &W,
        news: &N,
        location: &Location,
        units: Units,
        categories: &[String],
    ) -> LoadOutcome
    where
        W: WeatherSource + ?Sized,
        N: NewsSource + ?Sized,
    {
        let ticket = self.begin();

        match load_home(weather, news, location, units, categories).await {
            Ok(feed) => {
                if self.commit(ticket, feed) {
                    LoadOutcome::Applied
                } else {
                    LoadOutcome::Superseded
                }
            }
            Err(e) => {
                tracing::error!("Home load failed: {}", e);
                LoadOutcome::Failed(e)
            }
        }
    }

    /// Reload with the units, categories and location held by `state`.
    /// Does nothing while no location is known.
    pub async fn reload_for<W, N>(
        &self,
        state: &AppState,
        weather: &W,
        news: &N,
    ) -> Option<LoadOutcome>
    where
        W: WeatherSource + ?Sized,
        N: NewsSource + ?Sized,
    {
        let location = state.location()?;
        let prefs = state.preferences();
        Some(
            self.reload(weather, news, &location, prefs.units, &prefs.categories)
                .await,
        )
    }
}
