//! Longitude normalization for planetary coordinate systems.
//!
//! Every source row carries its own coordinate-system tag. Results are always
//! returned east-positive in the signed range (-180, 180]. Latitude is never
//! corrected: planetographic and planetocentric latitudes pass through as-is.

use std::fmt;

/// Coordinate convention a feature row was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoordinateSystem {
    /// "Planetographic +West 0 - 360"
    PlanetographicWest0to360,
    /// "Planetographic +East 0 - 360"
    PlanetographicEast0to360,
    /// "Planetocentric +East 0 - 360"
    PlanetocentricEast0to360,
    /// Missing or unrecognized tag.
    #[default]
    Unspecified,
}

impl CoordinateSystem {
    /// Parse a free-text tag. All whitespace is stripped before comparison,
    /// so "Planetographic +West 0 - 360" and "Planetographic+West0-360" agree.
    pub fn from_tag(tag: &str) -> Self {
        let compact: String = tag.chars().filter(|c| !c.is_whitespace()).collect();
        let known = [
            ("Planetographic+West0-360", Self::PlanetographicWest0to360),
            ("Planetographic+East0-360", Self::PlanetographicEast0to360),
            ("Planetocentric+East0-360", Self::PlanetocentricEast0to360),
        ];
        known
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&compact))
            .map(|(_, system)| *system)
            .unwrap_or(Self::Unspecified)
    }

    /// Whether the tag was recognized.
    pub fn is_determined(&self) -> bool {
        !matches!(self, Self::Unspecified)
    }
}

impl fmt::Display for CoordinateSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PlanetographicWest0to360 => write!(f, "Planetographic +West 0 - 360"),
            Self::PlanetographicEast0to360 => write!(f, "Planetographic +East 0 - 360"),
            Self::PlanetocentricEast0to360 => write!(f, "Planetocentric +East 0 - 360"),
            Self::Unspecified => write!(f, "Unspecified"),
        }
    }
}

/// Flip a west-positive longitude to east-positive, in [0, 360).
fn west_to_east(lon: f64) -> f64 {
    (360.0 - lon).rem_euclid(360.0)
}

/// Shift (180, 360) down into (-180, 0). 180 itself stays 180.
fn wrap_signed(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else {
        lon
    }
}

/// Convert a raw (lat, lon) pair into canonical east-positive coordinates.
///
/// Total: unrecognized systems only get the wraparound step, and non-finite
/// inputs come back non-finite.
pub fn normalize(raw_lat: f64, raw_lon: f64, system: CoordinateSystem) -> (f64, f64) {
    let lon = match system {
        CoordinateSystem::PlanetographicWest0to360 => west_to_east(raw_lon),
        _ => raw_lon,
    };
    (raw_lat, wrap_signed(lon))
}
