use std::collections::HashMap;

use tracing::debug;

use crate::aggregators::types::StreetRank;
use crate::aggregators::utility::mean;
use crate::filter::FilteredSet;

/// Number of streets shown in the busiest-streets ranking.
pub const DEFAULT_TOP_N: usize = 10;

/// Ranks streets by mean ADT, busiest first, and keeps the first `n`.
///
/// Streets are grouped by their exact name: no case folding or trimming, so
/// `"Story Rd"` and `"STORY RD"` rank separately. Rows with an empty street
/// name have no group and are skipped, as are observations without an ADT
/// value; a street with no ADT at all is left out.
///
/// Equal means keep the order in which the streets first appear in the input.
pub fn top_n(filtered: &FilteredSet, n: usize) -> Vec<StreetRank> {
    // Groups in first-encounter order; the index map only locates them.
    let mut groups: Vec<(&str, Vec<f64>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for obs in filtered.iter().filter(|obs| !obs.street.is_empty()) {
        let slot = *index.entry(obs.street.as_str()).or_insert_with(|| {
            groups.push((obs.street.as_str(), Vec::new()));
            groups.len() - 1
        });

        if let Some(adt) = obs.valid_adt() {
            groups[slot].1.push(adt);
        }
    }

    let mut ranked: Vec<StreetRank> = groups
        .into_iter()
        .filter_map(|(street, values)| {
            mean(&values).map(|mean_adt| StreetRank {
                street: street.to_string(),
                mean_adt,
            })
        })
        .collect();

    // `sort_by` is stable: ties stay in first-encounter order.
    ranked.sort_by(|a, b| b.mean_adt.total_cmp(&a.mean_adt));
    ranked.truncate(n);

    debug!(n, streets = index.len(), ranked = ranked.len(), "Top streets ranked");
    ranked
}
