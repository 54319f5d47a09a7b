//! nearmap - Find nearby OpenStreetMap amenities and plot them on a map

pub mod api;
pub mod config;
pub mod domain;
pub mod geometry;
pub mod locate;
pub mod logging;
pub mod map;
pub mod osm;
pub mod render;
pub mod session;
