use geo::{Distance, Haversine};

use crate::domain::Location;

/// Great-circle distance between two points, in metres
pub fn distance_m(a: Location, b: Location) -> f64 {
    Haversine::distance(a.to_point(), b.to_point())
}

/// Sort items nearest-first relative to `origin`. Ties keep their order.
pub fn sort_by_distance<T>(origin: Location, items: &mut [T], location_of: impl Fn(&T) -> Location) {
    items.sort_by(|a, b| {
        distance_m(origin, location_of(a)).total_cmp(&distance_m(origin, location_of(b)))
    });
}
