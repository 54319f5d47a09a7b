pub mod amenity;
pub mod location;
pub mod marker;
pub mod place;

pub use amenity::{Amenity, AmenityError};
pub use location::Location;
pub use marker::{IconSpec, Marker, MarkerStyle, Popup};
pub use place::Place;
