//! Ways of finding out where the user is.

use thiserror::Error;

use crate::api::{geocode_place, locate_by_ip};
use crate::config::{IpLocateConfig, NominatimConfig};
use crate::domain::Location;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("location unavailable: {0:#}")]
    Unavailable(anyhow::Error),
    #[error("place not found: {0}")]
    NotFound(String),
    #[error("invalid coordinates ({lat}, {lon})")]
    InvalidCoordinates { lat: f64, lon: f64 },
}

/// Source of a single location fix
pub trait Locator {
    fn locate(&self) -> Result<Location, LocateError>;

    /// Short description for progress output
    fn describe(&self) -> String;
}

/// Coordinates given up front (CLI flags or config file)
#[derive(Debug, Clone)]
pub struct FixedLocator {
    location: Location,
}

impl FixedLocator {
    pub fn new(location: Location) -> Self {
        Self { location }
    }
}

impl Locator for FixedLocator {
    fn locate(&self) -> Result<Location, LocateError> {
        if !self.location.is_valid() {
            return Err(LocateError::InvalidCoordinates {
                lat: self.location.lat,
                lon: self.location.lon,
            });
        }
        Ok(self.location)
    }

    fn describe(&self) -> String {
        format!("coordinates {}", self.location)
    }
}

/// Resolve a place name through Nominatim
#[derive(Debug, Clone)]
pub struct GeocodeLocator {
    query: String,
    config: NominatimConfig,
}

impl GeocodeLocator {
    pub fn new(query: impl Into<String>, config: NominatimConfig) -> Self {
        Self {
            query: query.into(),
            config,
        }
    }
}

impl Locator for GeocodeLocator {
    fn locate(&self) -> Result<Location, LocateError> {
        geocode_place(&self.query, &self.config)
            .map_err(LocateError::Unavailable)?
            .ok_or_else(|| LocateError::NotFound(self.query.clone()))
    }

    fn describe(&self) -> String {
        format!("place {:?}", self.query)
    }
}

/// Approximate position from the public IP address
#[derive(Debug, Clone, Default)]
pub struct IpLocator {
    config: IpLocateConfig,
}

impl IpLocator {
    pub fn new(config: IpLocateConfig) -> Self {
        Self { config }
    }
}

impl Locator for IpLocator {
    fn locate(&self) -> Result<Location, LocateError> {
        locate_by_ip(&self.config).map_err(LocateError::Unavailable)
    }

    fn describe(&self) -> String {
        "IP geolocation".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[test]
    fn test_fixed_locator() {
        let locator = FixedLocator::new(Location::new(28.61, 77.21));
        assert_eq!(locator.locate().unwrap(), Location::new(28.61, 77.21));

        let bad = FixedLocator::new(Location::new(120.0, 0.0));
        assert!(matches!(
            bad.locate(),
            Err(LocateError::InvalidCoordinates { .. })
        ));
    }

    #[test]
    fn test_geocode_locator_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200).json_body(serde_json::json!([]));
        });

        let locator = GeocodeLocator::new(
            "Nowhere",
            NominatimConfig {
                url: server.url("/search"),
                delay_ms: 0,
            },
        );
        assert!(matches!(locator.locate(), Err(LocateError::NotFound(q)) if q == "Nowhere"));
    }

    #[test]
    fn test_ip_locator_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/json");
            then.status(503);
        });

        let locator = IpLocator::new(IpLocateConfig {
            url: server.url("/json"),
        });
        let err = locator.locate().unwrap_err();
        assert!(matches!(err, LocateError::Unavailable(_)));
        assert!(err.to_string().contains("503"));
    }
}
