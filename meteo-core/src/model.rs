use serde::{Deserialize, Serialize};

/// A place name resolved to geographic coordinates.
///
/// Built from the single best geocoding match; immutable once returned and
/// carries no reference back to the query that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Name as the provider spells it, which may differ from the query.
    pub name: String,
    /// Empty when the provider omits it.
    pub country: String,
    /// IANA timezone name; empty when the provider omits it.
    pub timezone: String,
    /// Metres above sea level; 0 when the provider omits it.
    pub elevation: f64,
}

/// Snapshot of current conditions at a coordinate pair.
///
/// Every field is optional because the upstream payload may omit any of
/// them; absence is preserved rather than replaced with a sentinel, so
/// "no data" stays distinguishable from a literal zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CurrentWeather {
    pub temperature_c: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    /// Provider-supplied timestamp in the location's local timezone,
    /// passed through verbatim.
    pub observation_time: Option<String>,
    /// WMO weather interpretation code.
    pub weather_code: Option<u32>,
}
