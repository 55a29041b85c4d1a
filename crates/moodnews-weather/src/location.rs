use async_trait::async_trait;
use moodnews_core::LocationConfig;

use crate::types::{Location, LocationError};

/// One-shot source of the device position.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(&self) -> Result<Location, LocationError>;
}

/// Location supplied by the user (flags or config file) instead of a
/// positioning service. No coordinates means no permission was granted.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation {
    coordinates: Option<Location>,
}

impl FixedLocation {
    pub fn new(location: Location) -> Self {
        Self {
            coordinates: Some(location),
        }
    }

    pub fn denied() -> Self {
        Self { coordinates: None }
    }

    /// Explicit coordinates win over configured ones; a lone latitude or
    /// longitude is ignored.
    pub fn resolve(
        latitude: Option<f64>,
        longitude: Option<f64>,
        config: &LocationConfig,
    ) -> Self {
        let coordinates = latitude
            .zip(longitude)
            .or_else(|| config.coordinates())
            .map(|(lat, lon)| Location::new(lat, lon));
        Self { coordinates }
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Result<Location, LocationError> {
        match self.coordinates {
            Some(location) => {
                if !(-90.0..=90.0).contains(&location.latitude)
                    || !(-180.0..=180.0).contains(&location.longitude)
                {
                    return Err(LocationError::Unavailable(format!(
                        "Coordinates out of range: {}, {}",
                        location.latitude, location.longitude
                    )));
                }
                Ok(location)
            }
            None => Err(LocationError::PermissionDenied),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_location_is_returned() {
        let provider = FixedLocation::new(Location::new(40.7, -74.0));
        let loc = provider.current_location().await.unwrap();
        assert_eq!(loc, Location::new(40.7, -74.0));
    }

    #[tokio::test]
    async fn missing_coordinates_are_a_denial() {
        let result = FixedLocation::denied().current_location().await;
        assert!(matches!(result, Err(LocationError::PermissionDenied)));
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_unavailable() {
        let result = FixedLocation::new(Location::new(123.0, 0.0))
            .current_location()
            .await;
        assert!(matches!(result, Err(LocationError::Unavailable(_))));
    }

    #[tokio::test]
    async fn explicit_coordinates_override_config() {
        let config = LocationConfig {
            latitude: Some(1.0),
            longitude: Some(2.0),
        };
        let provider = FixedLocation::resolve(Some(3.0), Some(4.0), &config);
        assert_eq!(
            provider.current_location().await.unwrap(),
            Location::new(3.0, 4.0)
        );

        let provider = FixedLocation::resolve(Some(3.0), None, &config);
        assert_eq!(
            provider.current_location().await.unwrap(),
            Location::new(1.0, 2.0)
        );
    }
}
