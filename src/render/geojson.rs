use serde_json::{Value, json};

use crate::domain::Marker;
use crate::map::MapView;

fn feature(marker: &Marker) -> Value {
    json!({
        "type": "Feature",
        "geometry": {
            "type": "Point",
            // GeoJSON positions are [lon, lat]
            "coordinates": [marker.location.lon, marker.location.lat],
        },
        "properties": {
            "style": marker.style,
            "title": marker.title,
            "popup": marker.popup.heading,
            "detail": marker.popup.detail,
        },
    })
}

/// Export all markers as a GeoJSON FeatureCollection
pub fn to_geojson(map: &MapView) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": map.markers().iter().map(feature).collect::<Vec<_>>(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amenity, Location, Place};

    #[test]
    fn test_to_geojson() {
        let mut map = MapView::default();
        map.set_user_marker(Location::new(10.0, 20.0));
        let amenity: Amenity = "police".parse().unwrap();
        map.add_marker(Marker::nearby_service(
            &Place::new(1, Location::new(10.5, 20.5)),
            &amenity,
        ));

        let value = to_geojson(&map);
        let features = value["features"].as_array().unwrap();

        assert_eq!(value["type"], "FeatureCollection");
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["geometry"]["coordinates"], json!([20.0, 10.0]));
        assert_eq!(features[0]["properties"]["style"], "current_location");
        assert_eq!(features[0]["properties"]["detail"], Value::Null);
        assert_eq!(features[1]["properties"]["title"], "police");
        assert_eq!(features[1]["properties"]["popup"], "Unknown");
    }

    #[test]
    fn test_empty_map() {
        let value = to_geojson(&MapView::default());
        assert_eq!(value["features"], json!([]));
    }
}
