//! Derived aggregate models served from the materialized-view cache.

use serde::{Deserialize, Serialize};

/// Faculty head-count for one institution, with geocoordinates.
///
/// Coordinates stay at the (0, 0) sentinel when no geocoding source is
/// configured or the institution does not resolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstituteFacultyCount {
    pub institute: String,
    pub faculty_count: u64,
    pub latitude: f64,
    pub longitude: f64,
}

/// One faculty member's keyword fan-out.
///
/// The keyword list is carried as serialized JSON text, exactly as stored in
/// the materialized view; consumers parse it on their side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyKeywords {
    pub faculty_name: String,
    pub keywords_json: String,
}
