use serde::Deserialize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::render::OutputFormat;

/// Map view defaults, in Leaflet terms.
pub mod view {
    /// Centre shown before a location fix arrives (central India)
    pub const INITIAL_CENTER: (f64, f64) = (20.0, 77.0);
    pub const INITIAL_ZOOM: u8 = 5;
    /// Zoom applied once the user has been located
    pub const LOCATED_ZOOM: u8 = 13;
    pub const MAX_ZOOM: u8 = 19;
}

pub const DEFAULT_RADIUS: u32 = 5000;
pub const DEFAULT_SERVICE: &str = "hospital";

fn default_radius() -> u32 {
    DEFAULT_RADIUS
}
fn default_verbose() -> bool {
    false
}

pub fn default_services() -> Vec<String> {
    [
        "hospital",
        "clinic",
        "doctors",
        "pharmacy",
        "police",
        "fire_station",
        "shelter",
        "social_facility",
        "restaurant",
        "cafe",
        "fuel",
        "atm",
        "bank",
        "toilets",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    /// Free-text place to geocode instead of using coordinates
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default = "default_radius")]
    pub radius: u32,
    #[serde(default)]
    pub service: Option<String>,
    /// Options offered by the service selector
    #[serde(default)]
    pub services: Option<Vec<String>>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub format: Option<OutputFormat>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub overpass: Option<OverpassConfig>,
    #[serde(default)]
    pub nominatim: Option<NominatimConfig>,
    #[serde(default)]
    pub ip_locate: Option<IpLocateConfig>,
    #[serde(default)]
    pub tiles: Option<TileConfig>,
}

fn default_overpass_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Deserialize, Clone)]
pub struct OverpassConfig {
    #[serde(default = "default_overpass_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            url: default_overpass_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_delay_ms() -> u64 {
    1000
}

#[derive(Debug, Deserialize, Clone)]
pub struct NominatimConfig {
    #[serde(default = "default_nominatim_url")]
    pub url: String,
    /// Pause before each request; Nominatim allows one request per second
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            url: default_nominatim_url(),
            delay_ms: default_delay_ms(),
        }
    }
}

fn default_ip_locate_url() -> String {
    "http://ip-api.com/json".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct IpLocateConfig {
    #[serde(default = "default_ip_locate_url")]
    pub url: String,
}

impl Default for IpLocateConfig {
    fn default() -> Self {
        Self {
            url: default_ip_locate_url(),
        }
    }
}

fn default_tile_url() -> String {
    "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string()
}

fn default_max_zoom() -> u8 {
    view::MAX_ZOOM
}

fn default_attribution() -> String {
    "&copy; OpenStreetMap contributors".to_string()
}

/// Raster tile source referenced by the rendered map page
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TileConfig {
    #[serde(default = "default_tile_url")]
    pub url: String,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
    #[serde(default = "default_attribution")]
    pub attribution: String,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            url: default_tile_url(),
            max_zoom: default_max_zoom(),
            attribution: default_attribution(),
        }
    }
}

impl FileConfig {
    /// Load the first parseable config from the standard search paths
    pub fn load() -> Option<Self> {
        let config_paths = get_config_paths();

        for path in config_paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                // Runs before the logger is installed, so report straight to stderr
                match toml::from_str(&contents) {
                    Ok(config) => return Some(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file; unlike `load`, errors are fatal
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("Config file not found: {}", path.display());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents).context("Failed to parse config file")
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("nearmap.toml"));
    paths.push(PathBuf::from(".nearmap.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("nearmap").join("config.toml"));
        paths.push(config_dir.join("nearmap.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".nearmap.toml"));
        paths.push(home.join(".config").join("nearmap").join("config.toml"));
    }

    paths
}
