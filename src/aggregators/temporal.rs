use std::collections::BTreeMap;

use chrono::Datelike;
use tracing::debug;

use crate::aggregators::types::YearPoint;
use crate::aggregators::utility::{lerp, mean};
use crate::filter::FilteredSet;

/// Mean ADT per calendar year, with every year between the first and last
/// observed year present.
///
/// The span comes from the data, not from the filter window. A year with no
/// observations is filled by linear interpolation between the nearest
/// observed years on either side; both always exist inside the span.
pub fn yearly_series(filtered: &FilteredSet) -> Vec<YearPoint> {
    let mut by_year: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for obs in filtered.iter() {
        if let Some(adt) = obs.valid_adt() {
            by_year.entry(obs.count_date.year()).or_default().push(adt);
        }
    }

    let observed: Vec<(i32, f64)> = by_year
        .iter()
        .filter_map(|(&year, values)| mean(values).map(|m| (year, m)))
        .collect();

    let series = fill_gaps(&observed);
    debug!(
        observed = observed.len(),
        interpolated = series.len() - observed.len(),
        "Yearly series built"
    );
    series
}

/// Expands year-sorted observed means into a gapless series.
fn fill_gaps(observed: &[(i32, f64)]) -> Vec<YearPoint> {
    let Some(&(last_year, last_adt)) = observed.last() else {
        return Vec::new();
    };

    let mut series = Vec::new();
    for pair in observed.windows(2) {
        let (y0, v0) = pair[0];
        let (y1, v1) = pair[1];

        series.push(YearPoint { year: y0, adt: v0, interpolated: false });
        for year in (y0 + 1)..y1 {
            series.push(YearPoint {
                year,
                adt: lerp(y0, v0, y1, v1, year),
                interpolated: true,
            });
        }
    }
    series.push(YearPoint { year: last_year, adt: last_adt, interpolated: false });

    series
}
