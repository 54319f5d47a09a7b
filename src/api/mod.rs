pub mod ip;
pub mod nominatim;
pub mod overpass;

pub use ip::locate_by_ip;
pub use nominatim::geocode_place;
pub use overpass::{OverpassResponse, build_amenity_query, fetch_amenities};

const USER_AGENT: &str = concat!("nearmap/", env!("CARGO_PKG_VERSION"));
