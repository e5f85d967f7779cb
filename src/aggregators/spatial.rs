use tracing::debug;

use crate::aggregators::types::HeatPoint;
use crate::filter::FilteredSet;

/// Projects complete observations to weighted points for the density layer.
///
/// Observations missing a latitude, longitude or ADT are skipped. Points are
/// not merged by location; the heat layer blends overlapping weights itself.
pub fn heat_points(filtered: &FilteredSet) -> Vec<HeatPoint> {
    let points: Vec<HeatPoint> = filtered
        .iter()
        .filter_map(|obs| {
            let (latitude, longitude) = obs.location()?;
            let weight = obs.valid_adt()?;
            Some(HeatPoint { latitude, longitude, weight })
        })
        .collect();

    debug!(
        observations = filtered.len(),
        points = points.len(),
        skipped = filtered.len() - points.len(),
        "Heat points extracted"
    );
    points
}
