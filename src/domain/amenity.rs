use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmenityError {
    #[error("service type is empty")]
    Empty,
    #[error("invalid character {found:?} in service type {value:?}")]
    InvalidCharacter { value: String, found: char },
}

/// An OSM `amenity=*` tag value such as `hospital` or `fire_station`.
///
/// Only lowercase ASCII letters, digits and underscores are accepted, which
/// covers every documented amenity value and keeps the value safe to splice
/// into an Overpass QL string literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Amenity(String);

impl Amenity {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-facing label: `fire_station` -> `fire station`
    pub fn label(&self) -> String {
        self.0.replace('_', " ")
    }
}

impl FromStr for Amenity {
    type Err = AmenityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_ascii_lowercase();
        if value.is_empty() {
            return Err(AmenityError::Empty);
        }
        if let Some(found) = value
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_'))
        {
            return Err(AmenityError::InvalidCharacter { value, found });
        }
        Ok(Amenity(value))
    }
}

impl fmt::Display for Amenity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes() {
        let a: Amenity = "  Fire_Station ".parse().unwrap();
        assert_eq!(a.as_str(), "fire_station");
        assert_eq!(a.label(), "fire station");
    }

    #[test]
    fn test_parse_rejects_injection() {
        assert_eq!("".parse::<Amenity>(), Err(AmenityError::Empty));
        assert!(matches!(
            "hospital\"];out;".parse::<Amenity>(),
            Err(AmenityError::InvalidCharacter { found: '"', .. })
        ));
        assert!("police station".parse::<Amenity>().is_err());
    }
}
