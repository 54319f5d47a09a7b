use super::Location;
use std::collections::HashMap;

/// A point of interest returned by the geodata API
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// OSM node id
    pub id: u64,
    pub location: Location,
    pub name: Option<String>,
    pub amenity: Option<String>,
    /// All remaining OSM tags, untouched
    pub tags: HashMap<String, String>,
}

impl Place {
    pub fn new(id: u64, location: Location) -> Self {
        Self {
            id,
            location,
            name: None,
            amenity: None,
            tags: HashMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_amenity(mut self, amenity: impl Into<String>) -> Self {
        self.amenity = Some(amenity.into());
        self
    }

    /// Name for popups, "Unknown" when the place is untagged
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Hover title: the name, or `fallback` (usually the service type)
    pub fn title<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_fallbacks() {
        let unnamed = Place::new(1, Location::new(0.0, 0.0));
        assert_eq!(unnamed.display_name(), "Unknown");
        assert_eq!(unnamed.title("pharmacy"), "pharmacy");

        let named = unnamed.with_name("City Pharmacy").with_amenity("pharmacy");
        assert_eq!(named.display_name(), "City Pharmacy");
        assert_eq!(named.title("pharmacy"), "City Pharmacy");
        assert_eq!(named.amenity.as_deref(), Some("pharmacy"));
    }
}
