//! Geospatial argument types shared by the Mapbox tools.
//!
//! Agents send coordinates as `[longitude, latitude]` arrays. The arg structs
//! here deserialize what an agent sends and render the argument object the
//! remote tool expects.

mod tools;

pub use tools::{
    mapbox_tools, CalculateDistanceTool, GetDirectionsTool, GetIsochroneTool, SearchPoiTool,
    CATEGORY_SEARCH_TOOL, DIRECTIONS_TOOL, DISTANCE_TOOL, ISOCHRONE_TOOL,
};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;

/// Longest isochrone contour the remote service accepts, in minutes
pub const MAX_ISOCHRONE_MINUTES: u32 = 60;

/// A WGS84 position, serialized as `[longitude, latitude]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, String> {
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("longitude {longitude} is outside [-180, 180]"));
        }
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(format!("latitude {latitude} is outside [-90, 90]"));
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }
}

impl TryFrom<[f64; 2]> for Coordinates {
    type Error = String;

    fn try_from([longitude, latitude]: [f64; 2]) -> Result<Self, Self::Error> {
        Coordinates::new(longitude, latitude)
    }
}

impl From<Coordinates> for [f64; 2] {
    fn from(c: Coordinates) -> Self {
        [c.longitude, c.latitude]
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.longitude, self.latitude)
    }
}

/// Routing profile understood by directions and isochrone tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TravelProfile {
    DrivingTraffic,
    Driving,
    Walking,
    Cycling,
}

impl TravelProfile {
    pub const ALL: [TravelProfile; 4] = [
        TravelProfile::DrivingTraffic,
        TravelProfile::Driving,
        TravelProfile::Walking,
        TravelProfile::Cycling,
    ];

    /// Name without the `mapbox/` prefix
    pub fn short_name(self) -> &'static str {
        match self {
            TravelProfile::DrivingTraffic => "driving-traffic",
            TravelProfile::Driving => "driving",
            TravelProfile::Walking => "walking",
            TravelProfile::Cycling => "cycling",
        }
    }

    /// Name sent on the wire
    pub fn as_str(self) -> &'static str {
        match self {
            TravelProfile::DrivingTraffic => "mapbox/driving-traffic",
            TravelProfile::Driving => "mapbox/driving",
            TravelProfile::Walking => "mapbox/walking",
            TravelProfile::Cycling => "mapbox/cycling",
        }
    }
}

impl FromStr for TravelProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let name = name.strip_prefix("mapbox/").unwrap_or(&name);
        TravelProfile::ALL
            .into_iter()
            .find(|p| p.short_name() == name)
            .ok_or_else(|| {
                format!("unknown travel profile `{s}`, expected driving-traffic, driving, walking or cycling")
            })
    }
}

impl TryFrom<String> for TravelProfile {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TravelProfile> for String {
    fn from(p: TravelProfile) -> Self {
        p.as_str().to_string()
    }
}

impl fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unit for straight-line distance results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    #[serde(alias = "mi")]
    Miles,
    #[serde(alias = "km")]
    Kilometers,
}

impl DistanceUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            DistanceUnit::Miles => "miles",
            DistanceUnit::Kilometers => "kilometers",
        }
    }
}

impl fmt::Display for DistanceUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn driving_traffic() -> TravelProfile {
    TravelProfile::DrivingTraffic
}

fn walking() -> TravelProfile {
    TravelProfile::Walking
}

/// Arguments of `get_directions`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DirectionsArgs {
    pub origin: Coordinates,
    pub destination: Coordinates,
    #[serde(default = "driving_traffic")]
    pub profile: TravelProfile,
}

impl DirectionsArgs {
    pub fn to_remote(&self) -> Value {
        json!({
            "origin": self.origin,
            "destination": self.destination,
            "profile": self.profile,
        })
    }
}

/// Arguments of `search_poi`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PoiSearchArgs {
    pub category: String,
    /// Search center
    pub location: Coordinates,
}

impl PoiSearchArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.category.trim().is_empty() {
            return Err("category must not be empty".to_string());
        }
        Ok(())
    }

    pub fn to_remote(&self) -> Value {
        json!({
            "category": self.category.trim(),
            "proximity": self.location,
        })
    }
}

/// Arguments of `calculate_distance`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DistanceArgs {
    pub from_coords: Coordinates,
    pub to_coords: Coordinates,
    #[serde(default)]
    pub units: DistanceUnit,
}

impl DistanceArgs {
    pub fn to_remote(&self) -> Value {
        json!({
            "from": self.from_coords,
            "to": self.to_coords,
            "units": self.units,
        })
    }
}

/// Arguments of `get_isochrone`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IsochroneArgs {
    /// Center point
    pub location: Coordinates,
    pub minutes: u32,
    #[serde(default = "walking")]
    pub profile: TravelProfile,
}

impl IsochroneArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.minutes == 0 || self.minutes > MAX_ISOCHRONE_MINUTES {
            return Err(format!(
                "minutes must be between 1 and {MAX_ISOCHRONE_MINUTES}, got {}",
                self.minutes
            ));
        }
        Ok(())
    }

    pub fn to_remote(&self) -> Value {
        json!({
            "coordinates": self.location,
            "contours_minutes": [self.minutes],
            "profile": self.profile,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_serialize_as_pair() {
        let c = Coordinates::new(-73.9857, 40.7484).unwrap();
        assert_eq!(serde_json::to_value(c).unwrap(), json!([-73.9857, 40.7484]));
        let back: Coordinates = serde_json::from_value(json!([-73.9857, 40.7484])).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_coordinates_out_of_range() {
        assert!(serde_json::from_value::<Coordinates>(json!([40.7, -200.0])).is_err());
        assert!(serde_json::from_value::<Coordinates>(json!([190.0, 40.7])).is_err());
        assert!(serde_json::from_value::<Coordinates>(json!([1.0])).is_err());
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_travel_profile_parsing() {
        assert_eq!(
            "driving-traffic".parse::<TravelProfile>().unwrap(),
            TravelProfile::DrivingTraffic
        );
        assert_eq!(
            "mapbox/cycling".parse::<TravelProfile>().unwrap(),
            TravelProfile::Cycling
        );
        assert_eq!(" Walking ".parse::<TravelProfile>().unwrap(), TravelProfile::Walking);
        assert!("teleport".parse::<TravelProfile>().is_err());
        assert_eq!(
            serde_json::to_value(TravelProfile::Driving).unwrap(),
            json!("mapbox/driving")
        );
    }

    #[test]
    fn test_directions_defaults_to_traffic() {
        let args: DirectionsArgs = serde_json::from_value(json!({
            "origin": [-71.0589, 42.3601],
            "destination": [-74.0060, 40.7128]
        }))
        .unwrap();
        assert_eq!(args.profile, TravelProfile::DrivingTraffic);
        assert_eq!(
            args.to_remote(),
            json!({
                "origin": [-71.0589, 42.3601],
                "destination": [-74.0060, 40.7128],
                "profile": "mapbox/driving-traffic"
            })
        );
    }

    #[test]
    fn test_poi_search_maps_location_to_proximity() {
        let args: PoiSearchArgs = serde_json::from_value(json!({
            "category": "coffee",
            "location": [-122.4, 37.79]
        }))
        .unwrap();
        assert!(args.validate().is_ok());
        assert_eq!(
            args.to_remote(),
            json!({"category": "coffee", "proximity": [-122.4, 37.79]})
        );

        let blank = PoiSearchArgs {
            category: "  ".into(),
            ..args
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn test_distance_units() {
        let args: DistanceArgs = serde_json::from_value(json!({
            "from_coords": [-74.0, 40.71],
            "to_coords": [-73.98, 40.75]
        }))
        .unwrap();
        assert_eq!(args.units, DistanceUnit::Miles);
        assert_eq!(
            args.to_remote(),
            json!({"from": [-74.0, 40.71], "to": [-73.98, 40.75], "units": "miles"})
        );

        let km: DistanceUnit = serde_json::from_value(json!("km")).unwrap();
        assert_eq!(km, DistanceUnit::Kilometers);
    }

    #[test]
    fn test_isochrone_contours() {
        let args: IsochroneArgs = serde_json::from_value(json!({
            "location": [-122.4, 37.79],
            "minutes": 10
        }))
        .unwrap();
        assert_eq!(args.profile, TravelProfile::Walking);
        assert!(args.validate().is_ok());
        assert_eq!(
            args.to_remote(),
            json!({
                "coordinates": [-122.4, 37.79],
                "contours_minutes": [10],
                "profile": "mapbox/walking"
            })
        );

        for minutes in [0, 61] {
            let bad = IsochroneArgs { minutes, ..args.clone() };
            assert!(bad.validate().is_err());
        }
    }
}
