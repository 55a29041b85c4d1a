//! Screen-level services for MoodNews: application state and the loaders
//! behind the home screen, news screen and settings preview.

pub mod app_state;
pub mod error;
pub mod home;
pub mod preview;

pub use app_state::{AppState, LocationState};
pub use error::LoadError;
pub use home::{load_home, HomeFeed, HomeScreen, LoadOutcome};
pub use preview::{load_category_news, load_category_preview};
