pub mod distance;

pub use distance::{distance_m, sort_by_distance};
