//! In-memory map state: view, tile source and marker layer.

use crate::config::{TileConfig, view};
use crate::domain::{Location, Marker};

#[derive(Debug, Clone)]
pub struct MapView {
    center: Location,
    zoom: u8,
    tiles: TileConfig,
    markers: Vec<Marker>,
}

impl MapView {
    /// A fresh map showing the initial overview with no markers
    pub fn new(tiles: TileConfig) -> Self {
        Self {
            center: view::INITIAL_CENTER.into(),
            zoom: view::INITIAL_ZOOM,
            tiles,
            markers: Vec::new(),
        }
    }

    pub fn set_view(&mut self, center: Location, zoom: u8) {
        self.center = center;
        self.zoom = zoom.min(self.tiles.max_zoom);
    }

    pub fn center(&self) -> Location {
        self.center
    }

    pub fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn tiles(&self) -> &TileConfig {
        &self.tiles
    }

    /// Place the user's marker, replacing any earlier one
    pub fn set_user_marker(&mut self, location: Location) {
        self.markers.retain(|m| !m.is_user());
        self.markers.insert(0, Marker::current_location(location));
    }

    pub fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    /// Drop every result marker. The user marker is always kept.
    ///
    /// Returns the number of markers removed.
    pub fn clear_service_markers(&mut self) -> usize {
        let before = self.markers.len();
        self.markers.retain(Marker::is_user);
        before - self.markers.len()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn user_marker(&self) -> Option<&Marker> {
        self.markers.iter().find(|m| m.is_user())
    }

    pub fn service_markers(&self) -> impl Iterator<Item = &Marker> {
        self.markers.iter().filter(|m| !m.is_user())
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new(TileConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amenity, Place};

    fn service_marker(id: u64) -> Marker {
        let amenity: Amenity = "hospital".parse().unwrap();
        Marker::nearby_service(&Place::new(id, Location::new(1.0, 1.0)), &amenity)
    }

    #[test]
    fn test_initial_view() {
        let map = MapView::default();
        assert_eq!(map.center(), Location::new(20.0, 77.0));
        assert_eq!(map.zoom(), 5);
        assert!(map.markers().is_empty());
    }

    #[test]
    fn test_set_view_clamps_to_max_zoom() {
        let mut map = MapView::default();
        map.set_view(Location::new(1.0, 2.0), 25);
        assert_eq!(map.zoom(), view::MAX_ZOOM);
        assert_eq!(map.center(), Location::new(1.0, 2.0));
    }

    #[test]
    fn test_clear_keeps_user_marker() {
        let mut map = MapView::default();
        map.set_user_marker(Location::new(1.0, 2.0));
        map.add_marker(service_marker(1));
        map.add_marker(service_marker(2));

        assert_eq!(map.clear_service_markers(), 2);
        assert_eq!(map.markers().len(), 1);
        assert_eq!(
            map.user_marker().map(|m| m.location),
            Some(Location::new(1.0, 2.0))
        );
        assert_eq!(map.clear_service_markers(), 0);
    }

    #[test]
    fn test_set_user_marker_replaces_previous() {
        let mut map = MapView::default();
        map.add_marker(service_marker(1));
        map.set_user_marker(Location::new(1.0, 2.0));
        map.set_user_marker(Location::new(3.0, 4.0));

        let users: Vec<_> = map.markers().iter().filter(|m| m.is_user()).collect();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].location, Location::new(3.0, 4.0));
        assert_eq!(map.service_markers().count(), 1);
    }
}
