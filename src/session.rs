//! Event handling for one map session.
//!
//! A session reacts to two events: the location fix arriving (`start`) and
//! the selected service type changing (`select_service`). Failures are
//! logged and leave the map as it was after the last completed step.

use anyhow::Result;
use thiserror::Error;

use crate::api::fetch_amenities;
use crate::config::{OverpassConfig, TileConfig, view};
use crate::domain::{Amenity, AmenityError, Location, Marker, Place};
use crate::locate::Locator;
use crate::map::MapView;
use crate::osm::parse_places;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectError {
    #[error(transparent)]
    Invalid(#[from] AmenityError),
    #[error("{0:?} is not one of the available service types")]
    NotOffered(String),
    #[error("no service types configured")]
    NoOptions,
}

/// The set of selectable service types plus the current choice
#[derive(Debug, Clone)]
pub struct ServiceSelector {
    options: Vec<Amenity>,
    current: usize,
}

impl ServiceSelector {
    /// Build a selector from raw option strings; `initial` defaults to the first option
    pub fn new<S: AsRef<str>>(options: &[S], initial: Option<&str>) -> Result<Self, SelectError> {
        let mut parsed: Vec<Amenity> = Vec::with_capacity(options.len());
        for option in options {
            let amenity: Amenity = option.as_ref().parse()?;
            if !parsed.contains(&amenity) {
                parsed.push(amenity);
            }
        }
        if parsed.is_empty() {
            return Err(SelectError::NoOptions);
        }

        let mut selector = Self {
            options: parsed,
            current: 0,
        };
        if let Some(initial) = initial {
            selector.select(initial)?;
        }
        Ok(selector)
    }

    /// Change the current value. Only listed options are accepted.
    pub fn select(&mut self, value: &str) -> Result<&Amenity, SelectError> {
        let amenity: Amenity = value.parse()?;
        let index = self
            .options
            .iter()
            .position(|o| *o == amenity)
            .ok_or_else(|| SelectError::NotOffered(amenity.to_string()))?;
        self.current = index;
        Ok(&self.options[index])
    }

    pub fn current(&self) -> &Amenity {
        &self.options[self.current]
    }

    pub fn options(&self) -> &[Amenity] {
        &self.options
    }
}

/// Something that can list places of a given amenity type around a point
pub trait PlaceSource {
    fn nearby(&self, center: Location, radius_m: u32, amenity: &Amenity) -> Result<Vec<Place>>;
}

/// Live Overpass API backend
#[derive(Debug, Clone, Default)]
pub struct OverpassSource {
    config: OverpassConfig,
}

impl OverpassSource {
    pub fn new(config: OverpassConfig) -> Self {
        Self { config }
    }
}

impl PlaceSource for OverpassSource {
    fn nearby(&self, center: Location, radius_m: u32, amenity: &Amenity) -> Result<Vec<Place>> {
        let response = fetch_amenities(center, radius_m, amenity, &self.config)?;
        Ok(parse_places(&response))
    }
}

pub struct Session {
    locator: Box<dyn Locator>,
    source: Box<dyn PlaceSource>,
    selector: ServiceSelector,
    radius_m: u32,
    map: MapView,
    location: Option<Location>,
    queries_issued: usize,
}

impl Session {
    pub fn new(
        locator: Box<dyn Locator>,
        source: Box<dyn PlaceSource>,
        selector: ServiceSelector,
        radius_m: u32,
        tiles: TileConfig,
    ) -> Self {
        Self {
            locator,
            source,
            selector,
            radius_m,
            map: MapView::new(tiles),
            location: None,
            queries_issued: 0,
        }
    }

    /// Acquire a location fix, centre the map on it, mark it and run the
    /// query for the current selection.
    ///
    /// Returns the number of places plotted, or `None` if locating or the
    /// query failed (the failure is logged).
    pub fn start(&mut self) -> Option<usize> {
        let location = match self.locator.locate() {
            Ok(location) => location,
            Err(e) => {
                tracing::error!("Error fetching location: {}", e);
                return None;
            }
        };

        tracing::info!("Located at {}", location);
        self.location = Some(location);
        self.map.set_view(location, view::LOCATED_ZOOM);
        self.map.set_user_marker(location);

        self.refresh()
    }

    /// Handle a change of the service-type selector.
    ///
    /// Issues exactly one query around the last known location. Without a
    /// location fix, or for a value the selector does not offer, nothing is
    /// queried and the error is logged.
    pub fn select_service(&mut self, value: &str) -> Option<usize> {
        if let Err(e) = self.selector.select(value) {
            tracing::error!("Ignoring service type change: {}", e);
            return None;
        }
        self.refresh()
    }

    /// Clear prior results, then query and plot the current selection
    fn refresh(&mut self) -> Option<usize> {
        let removed = self.map.clear_service_markers();
        if removed > 0 {
            tracing::debug!("Removed {} previous result markers", removed);
        }

        let Some(center) = self.location else {
            tracing::error!("No location known yet; skipping query");
            return None;
        };

        let amenity = self.selector.current().clone();
        self.queries_issued += 1;

        let places = match self.source.nearby(center, self.radius_m, &amenity) {
            Ok(places) => places,
            Err(e) => {
                tracing::error!("Error fetching data: {:#}", e);
                return None;
            }
        };

        for place in &places {
            self.map.add_marker(Marker::nearby_service(place, &amenity));
        }

        tracing::info!(
            "Found {} {} within {}m",
            places.len(),
            amenity.label(),
            self.radius_m
        );
        Some(places.len())
    }

    pub fn map(&self) -> &MapView {
        &self.map
    }

    pub fn location(&self) -> Option<Location> {
        self.location
    }

    pub fn selected(&self) -> &Amenity {
        self.selector.current()
    }

    pub fn selector(&self) -> &ServiceSelector {
        &self.selector
    }

    pub fn radius_m(&self) -> u32 {
        self.radius_m
    }

    /// Number of geodata queries sent so far
    pub fn queries_issued(&self) -> usize {
        self.queries_issued
    }
}
