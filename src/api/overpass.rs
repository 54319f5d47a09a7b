use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use super::USER_AGENT;
use crate::config::OverpassConfig;
use crate::domain::{Amenity, Location};

/// Raw Overpass API response
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    pub elements: Vec<Element>,
}

/// A single element from Overpass. Amenity queries only return nodes, but
/// the type is kept so the parser can skip anything else.
#[derive(Debug, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub type_: String,
    pub id: u64,
    #[serde(default)]
    pub tags: Option<HashMap<String, String>>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// Build the Overpass QL query for amenity nodes around a point
pub fn build_amenity_query(
    center: Location,
    radius_m: u32,
    amenity: &Amenity,
    timeout_secs: u64,
) -> String {
    format!(
        r#"[out:json][timeout:{timeout}];
node(around:{radius},{lat},{lon})["amenity"="{amenity}"];
out;"#,
        timeout = timeout_secs,
        radius = radius_m,
        lat = center.lat,
        lon = center.lon,
        amenity = amenity.as_str()
    )
}

/// Fetch amenity nodes within `radius_m` metres of `center`.
///
/// Issues exactly one request. A non-200 status or an undecodable body is
/// an error; there is no retry.
pub fn fetch_amenities(
    center: Location,
    radius_m: u32,
    amenity: &Amenity,
    config: &OverpassConfig,
) -> Result<OverpassResponse> {
    let query = build_amenity_query(center, radius_m, amenity, config.timeout_secs);
    tracing::debug!(url = %config.url, %amenity, radius_m, "Querying Overpass");

    let client = reqwest::blocking::Client::builder()
        .user_agent(USER_AGENT)
        // Slightly above the server-side timeout so the server gets to answer first
        .timeout(Duration::from_secs(config.timeout_secs + 10))
        .build()
        .context("Failed to create HTTP client")?;

    // Overpass expects form-encoded POST data: data=<query>
    let response = client
        .post(&config.url)
        .form(&[("data", query.as_str())])
        .send()
        .context("Failed to send request to Overpass API")?;

    let status = response.status();
    if status.as_u16() != 200 {
        bail!("Overpass API returned error status: {}", status);
    }

    response
        .json()
        .context("Failed to parse Overpass JSON response")
}
