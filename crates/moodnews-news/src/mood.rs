//! Temperature mood and the search keywords each mood selects.
//!
//! The headline service has no sentiment filter, so each mood is
//! approximated by a handful of OR-combined search phrases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mood derived from the current temperature. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Cold,
    Hot,
    Cool,
}

impl Mood {
    pub fn as_str(self) -> &'static str {
        match self {
            Mood::Cold => "cold",
            Mood::Hot => "hot",
            Mood::Cool => "cool",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Below this (Celsius) it is cold
pub const COLD_BELOW: f64 = 15.0;
/// Above this (Celsius) it is hot
pub const HOT_ABOVE: f64 = 30.0;

/// Classify a Celsius temperature. Both thresholds themselves are `Cool`.
pub fn mood_from_temp(celsius: f64) -> Mood {
    if celsius < COLD_BELOW {
        Mood::Cold
    } else if celsius > HOT_ABOVE {
        Mood::Hot
    } else {
        Mood::Cool
    }
}

/// Search phrases for a mood, in query order.
pub fn keywords_for_mood(mood: Mood) -> [&'static str; 3] {
    match mood {
        Mood::Cold => [
            "recession OR crisis",
            "inflation OR layoffs",
            "pollution OR disaster",
        ],
        Mood::Hot => ["crime OR violence", "war OR conflict", "scam OR fraud"],
        Mood::Cool => [
            "victory OR won",
            "innovation OR breakthrough",
            "celebration OR happiness",
        ],
    }
}
