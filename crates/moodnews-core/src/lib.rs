pub mod app;
pub mod config;
pub mod error;
pub mod preferences;
pub mod units;

pub use app::App;
pub use config::{Config, LocationConfig, NewsConfig, ValidationResult, WeatherConfig};
pub use error::{NetworkError, PreferenceError, ReqwestErrorExt};
pub use preferences::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceStore, Preferences, DEFAULT_CATEGORIES,
    KNOWN_CATEGORIES,
};
pub use units::Units;

use anyhow::Result;

/// Initialize the core application
pub fn init() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("MoodNews core initialized");
    Ok(())
}
