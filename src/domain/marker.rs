use super::{Amenity, Location, Place};
use serde::Serialize;

const SHADOW_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/images/marker-shadow.png";
const RED_ICON_URL: &str = "https://raw.githubusercontent.com/pointhi/leaflet-color-markers/master/img/marker-icon-red.png";
const BLUE_ICON_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.7.1/images/marker-icon.png";

/// Leaflet-compatible icon descriptor. Sizes and anchors are in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSpec {
    pub icon_url: &'static str,
    pub shadow_url: &'static str,
    pub icon_size: [i32; 2],
    pub icon_anchor: [i32; 2],
    pub popup_anchor: [i32; 2],
    pub shadow_size: [i32; 2],
}

/// The two marker kinds the map ever shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerStyle {
    /// Red pin for the user's own position
    CurrentLocation,
    /// Blue pin for a query result
    NearbyService,
}

impl MarkerStyle {
    pub fn icon(self) -> IconSpec {
        let icon_url = match self {
            MarkerStyle::CurrentLocation => RED_ICON_URL,
            MarkerStyle::NearbyService => BLUE_ICON_URL,
        };
        IconSpec {
            icon_url,
            shadow_url: SHADOW_URL,
            icon_size: [25, 41],
            icon_anchor: [12, 41],
            popup_anchor: [1, -34],
            shadow_size: [41, 41],
        }
    }
}

/// Popup content. Rendered as a bold heading with an optional second line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Popup {
    pub heading: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub style: MarkerStyle,
    pub location: Location,
    pub title: String,
    pub popup: Popup,
    /// Open the popup as soon as the map is shown
    pub open_popup: bool,
}

impl Marker {
    pub fn current_location(location: Location) -> Self {
        Self {
            style: MarkerStyle::CurrentLocation,
            location,
            title: "Your Location".to_string(),
            popup: Popup {
                heading: "You are here".to_string(),
                detail: None,
            },
            open_popup: true,
        }
    }

    pub fn nearby_service(place: &Place, amenity: &Amenity) -> Self {
        Self {
            style: MarkerStyle::NearbyService,
            location: place.location,
            title: place.title(amenity.as_str()).to_string(),
            popup: Popup {
                heading: place.display_name().to_string(),
                detail: Some(amenity.to_string()),
            },
            open_popup: false,
        }
    }

    pub fn is_user(&self) -> bool {
        self.style == MarkerStyle::CurrentLocation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icons_differ_only_by_image() {
        let red = MarkerStyle::CurrentLocation.icon();
        let blue = MarkerStyle::NearbyService.icon();
        assert_ne!(red.icon_url, blue.icon_url);
        assert_eq!(red.shadow_url, blue.shadow_url);
        assert_eq!(red.icon_size, [25, 41]);
        assert_eq!(blue.popup_anchor, [1, -34]);
    }

    #[test]
    fn test_nearby_service_marker_from_unnamed_place() {
        let amenity: Amenity = "police".parse().unwrap();
        let place = Place::new(7, Location::new(1.0, 2.0));
        let marker = Marker::nearby_service(&place, &amenity);

        assert_eq!(marker.title, "police");
        assert_eq!(marker.popup.heading, "Unknown");
        assert_eq!(marker.popup.detail.as_deref(), Some("police"));
        assert!(!marker.is_user());
    }

    #[test]
    fn test_current_location_marker() {
        let marker = Marker::current_location(Location::new(1.0, 2.0));
        assert!(marker.is_user());
        assert!(marker.open_popup);
        assert_eq!(marker.title, "Your Location");
        assert_eq!(marker.popup.heading, "You are here");
    }
}
