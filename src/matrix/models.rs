//! Time/distance matrix data models
//!
//! Data structures for the one-to-many matrix request and response.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point on the map
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Travel cost profile used by the routing engine
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Costing {
    Auto,
    Bicycle,
    Pedestrian,
    Multimodal,
}

impl Costing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Costing::Auto => "auto",
            Costing::Bicycle => "bicycle",
            Costing::Pedestrian => "pedestrian",
            Costing::Multimodal => "multimodal",
        }
    }
}

impl fmt::Display for Costing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload carried in the `json` query parameter
#[derive(Debug, Clone, Serialize)]
pub struct MatrixRequest<'a> {
    pub locations: &'a [Location],
}

/// Time and distance from the origin to one destination
///
/// `time` (seconds) and `distance` (in `units`) are null when the
/// destination cannot be reached.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatrixEntry {
    pub from_index: usize,
    pub to_index: usize,
    pub time: Option<u64>,
    pub distance: Option<f64>,
}

/// One-to-many matrix response
///
/// Fields the service adds beyond the typed ones are kept in `extra` so the
/// response serializes back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatrixResponse {
    pub one_to_many: Vec<Vec<MatrixEntry>>,
    pub units: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locations: Option<Vec<Vec<Location>>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MatrixResponse {
    /// Entries from the origin to each destination, origin itself excluded
    pub fn destinations(&self) -> impl Iterator<Item = &MatrixEntry> {
        self.one_to_many
            .iter()
            .flatten()
            .filter(|entry| entry.to_index != entry.from_index)
    }
}
