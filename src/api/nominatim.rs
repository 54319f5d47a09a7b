use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::thread;
use std::time::Duration;

use super::USER_AGENT;
use crate::config::NominatimConfig;
use crate::domain::Location;

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    display_name: String,
}

/// Geocode a free-text place ("Connaught Place, New Delhi") to coordinates.
///
/// Uses the Nominatim search API and returns the best match. Sleeps for
/// `config.delay_ms` first to stay within the Nominatim usage policy.
///
/// # Returns
/// * `Ok(Some(Location))` - Coordinates of the first result
/// * `Ok(None)` - Nothing matched the query
/// * `Err` - If the API failed
pub fn geocode_place(query: &str, config: &NominatimConfig) -> Result<Option<Location>> {
    if config.delay_ms > 0 {
        thread::sleep(Duration::from_millis(config.delay_ms));
    }

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to create HTTP client")?;

    let response = client
        .get(&config.url)
        .query(&[("q", query), ("format", "json"), ("limit", "1")])
        .send()
        .context("Failed to send request to Nominatim API")?;

    if !response.status().is_success() {
        bail!("Nominatim API returned error status: {}", response.status());
    }

    let results: Vec<NominatimResult> = response
        .json()
        .context("Failed to parse Nominatim JSON response")?;

    let Some(result) = results.into_iter().next() else {
        return Ok(None);
    };

    let lat: f64 = result
        .lat
        .parse()
        .context("Failed to parse latitude from Nominatim response")?;
    let lon: f64 = result
        .lon
        .parse()
        .context("Failed to parse longitude from Nominatim response")?;

    tracing::debug!("Geocoded {:?} to {}", query, result.display_name);

    Ok(Some(Location::new(lat, lon)))
}
