//! Weather service for MoodNews
//!
//! Fetches the OpenWeather 5-day / 3-hour forecast and reduces it to a
//! current-conditions summary plus one entry per day. Also defines the
//! location seam the forecast request depends on.

pub mod location;
pub mod provider;
pub mod types;

pub use location::{FixedLocation, LocationProvider};
pub use moodnews_core::Units;
pub use provider::{WeatherProvider, WeatherSource};
pub use types::*;
