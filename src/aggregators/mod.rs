//! The three views derived from a [`FilteredSet`](crate::filter::FilteredSet).
//!
//! Each aggregator only reads the filtered observations and returns an owned
//! result; none depends on another's output. Empty input yields an empty
//! view, never an error.

pub mod spatial;
pub mod temporal;
pub mod top_n;
pub mod types;
pub mod utility;

pub use spatial::heat_points;
pub use temporal::yearly_series;
pub use top_n::{DEFAULT_TOP_N, top_n};
pub use types::{HeatPoint, StreetRank, YearPoint};
