use std::future::Future;

use thiserror::Error;

use crate::models::Coords;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("position unavailable")]
    Unavailable,
}

/// One-shot position lookup. Callers make a single attempt and never retry.
pub trait Geolocation {
    fn current_position(&self) -> impl Future<Output = Result<Coords, GeolocationError>> + Send;
}

/// Resolves to a position fixed at startup, typically from `HOME_POSITION`.
#[derive(Debug, Clone, Default)]
pub struct StaticGeolocation {
    position: Option<Coords>,
}

impl StaticGeolocation {
    pub fn new(position: Option<Coords>) -> Self {
        Self { position }
    }

    pub fn at(lat: f64, lng: f64) -> Self {
        Self::new(Some(Coords::new(lat, lng)))
    }

    pub fn unavailable() -> Self {
        Self::new(None)
    }
}

impl Geolocation for StaticGeolocation {
    fn current_position(&self) -> impl Future<Output = Result<Coords, GeolocationError>> + Send {
        std::future::ready(self.position.ok_or(GeolocationError::Unavailable))
    }
}

/// Parse `"lat,lng"`. Out-of-range or non-finite values are rejected.
pub fn parse_position(raw: &str) -> Option<Coords> {
    let (lat, lng) = raw.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lng: f64 = lng.trim().parse().ok()?;
    let coords = Coords::new(lat, lng);
    if !coords.is_finite() || !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return None;
    }
    Some(coords)
}
