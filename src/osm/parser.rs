use crate::api::OverpassResponse;
use crate::domain::{Location, Place};

/// Parse an Overpass response into places.
///
/// One pass over the elements, keeping nodes that carry both coordinates.
/// `name` and `amenity` are lifted out of the tag map; everything else is
/// kept as-is on the place.
pub fn parse_places(response: &OverpassResponse) -> Vec<Place> {
    let mut places = Vec::with_capacity(response.elements.len());

    for element in &response.elements {
        if element.type_ != "node" {
            continue;
        }

        let (lat, lon) = match (element.lat, element.lon) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => continue,
        };

        let mut place = Place::new(element.id, Location::new(lat, lon));

        if let Some(tags) = &element.tags {
            let mut tags = tags.clone();
            place.name = tags.remove("name").filter(|n| !n.trim().is_empty());
            place.amenity = tags.remove("amenity");
            place.tags = tags;
        }

        places.push(place);
    }

    places
}
