//! Ingestion and normalization of ADT table exports.
//!
//! Rows are read from CSV, their count dates parsed and stripped of timezone
//! information, and their numeric cells coerced. A single unparsable date
//! fails the whole batch so callers never aggregate a silently truncated table.

use std::io::Read;

use flate2::read::GzDecoder;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};
use crate::observation::{Observation, RawObservation, parse_count_date};

/// Normalizes raw rows into observations.
///
/// # Errors
///
/// Returns [`PipelineError::MalformedInput`] for the first row whose count
/// date cannot be parsed. Rows are numbered from 1, header excluded.
pub fn normalize(raw: Vec<RawObservation>) -> Result<Vec<Observation>> {
    raw.into_iter()
        .enumerate()
        .map(|(idx, row)| {
            let count_date =
                parse_count_date(&row.count_date).ok_or_else(|| PipelineError::MalformedInput {
                    row: idx + 1,
                    value: row.count_date.clone(),
                })?;

            Ok(Observation {
                street: row.street,
                latitude: row.latitude,
                longitude: row.longitude,
                adt: row.adt,
                count_date,
                city: row.city,
            })
        })
        .collect()
}

/// Reads and normalizes every row of a CSV export.
#[tracing::instrument(skip(reader))]
pub fn read_observations<R: Read>(reader: R) -> Result<Vec<Observation>> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(reader);

    let mut raw = Vec::new();
    for result in rdr.deserialize() {
        let record: RawObservation = result?;
        raw.push(record);
    }
    debug!(rows = raw.len(), "CSV rows read");

    let observations = normalize(raw)?;
    info!(observations = observations.len(), "Ingestion complete");
    Ok(observations)
}

/// Returns the CSV payload of a source, gunzipping it when `name` ends in `.gz`.
pub fn decode_source(name: &str, bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !name.ends_with(".gz") {
        return Ok(bytes);
    }

    let mut decoded = Vec::new();
    GzDecoder::new(bytes.as_slice()).read_to_end(&mut decoded)?;
    debug!(compressed = bytes.len(), decoded = decoded.len(), "Source gunzipped");
    Ok(decoded)
}
