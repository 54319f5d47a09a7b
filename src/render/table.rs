use crate::domain::Marker;
use crate::geometry::{distance_m, sort_by_distance};
use crate::map::MapView;

fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

/// Plain-text listing of the result markers, nearest first.
///
/// Distances are measured from the user marker, or from the map centre
/// when the user has not been located.
pub fn render_table(map: &MapView, title: &str) -> String {
    let origin = map
        .user_marker()
        .map(|m| m.location)
        .unwrap_or_else(|| map.center());

    let mut services: Vec<&Marker> = map.service_markers().collect();
    sort_by_distance(origin, &mut services, |m| m.location);

    let mut out = format!("{}\n{}\n", title, "=".repeat(title.chars().count()));
    if let Some(user) = map.user_marker() {
        out.push_str(&format!("You are here: {}\n", user.location));
    }
    out.push('\n');

    if services.is_empty() {
        out.push_str("No places found.\n");
        return out;
    }

    for (i, marker) in services.iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {:<40} {:>9}  ({:.5}, {:.5})\n",
            i + 1,
            marker.popup.heading,
            format_distance(distance_m(origin, marker.location)),
            marker.location.lat,
            marker.location.lon
        ));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Amenity, Location, Place};

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(12.4), "12 m");
        assert_eq!(format_distance(999.0), "999 m");
        assert_eq!(format_distance(1549.0), "1.5 km");
    }

    #[test]
    fn test_render_table_sorted_nearest_first() {
        let mut map = MapView::default();
        map.set_user_marker(Location::new(0.0, 0.0));
        let amenity: Amenity = "pharmacy".parse().unwrap();
        map.add_marker(Marker::nearby_service(
            &Place::new(1, Location::new(0.0, 0.02)).with_name("Far Pharmacy"),
            &amenity,
        ));
        map.add_marker(Marker::nearby_service(
            &Place::new(2, Location::new(0.0, 0.001)).with_name("Near Pharmacy"),
            &amenity,
        ));

        let table = render_table(&map, "Nearby pharmacy");
        let near = table.find("Near Pharmacy").unwrap();
        let far = table.find("Far Pharmacy").unwrap();

        assert!(table.starts_with("Nearby pharmacy\n===============\n"));
        assert!(table.contains("You are here: 0.0000N / 0.0000E"));
        assert!(near < far);
        assert!(table.contains("  1. Near Pharmacy"));
        assert!(table.contains("2.2 km"));
    }

    #[test]
    fn test_render_table_empty() {
        let table = render_table(&MapView::default(), "Nothing");
        assert!(table.contains("No places found."));
        assert!(!table.contains("You are here"));
    }
}
