use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::time::Duration;

use super::USER_AGENT;
use crate::config::IpLocateConfig;
use crate::domain::Location;

/// ip-api.com style lookup result. Failed lookups carry `status = "fail"`
/// and a `message` instead of coordinates.
#[derive(Debug, Deserialize)]
struct IpLookup {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    city: Option<String>,
}

/// Approximate the caller's position from their public IP address
pub fn locate_by_ip(config: &IpLocateConfig) -> Result<Location> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(15))
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(&config.url)
        .send()
        .context("Failed to send request to IP geolocation API")?;

    if !response.status().is_success() {
        bail!(
            "IP geolocation API returned error status: {}",
            response.status()
        );
    }

    let lookup: IpLookup = response
        .json()
        .context("Failed to parse IP geolocation JSON response")?;

    if lookup.status != "success" {
        bail!(
            "IP geolocation failed: {}",
            lookup.message.as_deref().unwrap_or("no reason given")
        );
    }

    match (lookup.lat, lookup.lon) {
        (Some(lat), Some(lon)) => {
            if let Some(city) = &lookup.city {
                tracing::debug!("IP geolocation placed us near {}", city);
            }
            Ok(Location::new(lat, lon))
        }
        _ => bail!("IP geolocation response is missing coordinates"),
    }
}
