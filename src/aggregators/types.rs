//! Result types handed to the rendering layer.

use serde::Serialize;

/// One row of the busiest-streets ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreetRank {
    pub street: String,
    pub mean_adt: f64,
}

/// One year of the traffic time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearPoint {
    pub year: i32,
    pub adt: f64,
    /// `true` when no observation fell in this year and the value was filled in.
    pub interpolated: bool,
}

/// A weighted location for the density layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub weight: f64,
}

impl HeatPoint {
    pub fn as_triple(&self) -> (f64, f64, f64) {
        (self.latitude, self.longitude, self.weight)
    }
}
