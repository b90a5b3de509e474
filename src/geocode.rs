//! Optional geocoding capability for institution coordinates.

use std::collections::HashMap;

use async_trait::async_trait;

/// Resolves an institution name to a (latitude, longitude) pair.
///
/// Running without a geocoder is a supported configuration; the aggregate
/// cache then records the (0, 0) sentinel for every institution. `None`
/// means "unresolved" and falls back to the same sentinel.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn locate(&self, institute: &str) -> Option<(f64, f64)>;
}

/// Geocoder backed by a fixed name → coordinates table.
///
/// Suited to curated datasets where the institution list is known up front.
#[derive(Debug, Default)]
pub struct StaticGeocoder {
    coordinates: HashMap<String, (f64, f64)>,
}

impl StaticGeocoder {
    pub fn new(coordinates: HashMap<String, (f64, f64)>) -> Self {
        Self { coordinates }
    }
}

#[async_trait]
impl Geocoder for StaticGeocoder {
    async fn locate(&self, institute: &str) -> Option<(f64, f64)> {
        self.coordinates.get(institute).copied()
    }
}
