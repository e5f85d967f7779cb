//! Pipeline entry point: ingestion, range filter, then the three aggregators.

use std::io::Read;

use serde::Serialize;
use tracing::{info, warn};

use crate::aggregators::{HeatPoint, StreetRank, YearPoint, heat_points, top_n, yearly_series};
use crate::config::{HeatLayerSettings, PipelineConfig};
use crate::error::Result;
use crate::filter::{DateRange, filter};
use crate::ingest::read_observations;
use crate::observation::Observation;

/// Everything the rendering layer needs from one invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficReport {
    pub range: DateRange,
    pub filtered_rows: usize,
    pub top_streets: Vec<StreetRank>,
    pub yearly_series: Vec<YearPoint>,
    pub heat_points: Vec<HeatPoint>,
    pub heat_layer: HeatLayerSettings,
}

impl TrafficReport {
    /// `true` when the window matched no rows at all.
    pub fn is_empty(&self) -> bool {
        self.filtered_rows == 0
    }
}

/// Runs the aggregation pipeline over already-ingested observations.
///
/// # Errors
///
/// Returns [`InvalidConfig`](crate::error::PipelineError::InvalidConfig) if
/// `config` does not validate. Empty windows are not errors.
#[tracing::instrument(skip_all, fields(rows = observations.len(), top_n = config.top_n))]
pub fn run(observations: &[Observation], config: &PipelineConfig) -> Result<TrafficReport> {
    config.validate()?;

    let range = config.range();
    let filtered = filter(observations, &range);
    if filtered.is_empty() {
        warn!(start = ?range.start, end = ?range.end, "No observations in date range");
    }

    let report = TrafficReport {
        range,
        filtered_rows: filtered.len(),
        top_streets: top_n(&filtered, config.top_n),
        yearly_series: yearly_series(&filtered),
        heat_points: heat_points(&filtered),
        heat_layer: config.heat_layer,
    };

    info!(
        filtered = report.filtered_rows,
        streets = report.top_streets.len(),
        years = report.yearly_series.len(),
        heat_points = report.heat_points.len(),
        "Pipeline complete"
    );
    Ok(report)
}

/// Ingests a CSV export and runs the pipeline over it.
///
/// A malformed count date anywhere in the input fails the call before any
/// aggregation happens.
pub fn run_from_reader<R: Read>(reader: R, config: &PipelineConfig) -> Result<TrafficReport> {
    let observations = read_observations(reader)?;
    run(&observations, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn scenario_rows() -> Vec<Observation> {
        vec![
            Observation::new("StreetA", ymd(2019, 1, 1), 100.0).at(37.3, -121.9),
            Observation::new("StreetA", ymd(2020, 1, 1), 200.0).at(37.3, -121.9),
            Observation::new("StreetB", ymd(2021, 1, 1), 50.0).at(37.3, -121.9),
        ]
    }

    fn window(start: NaiveDate, end: NaiveDate) -> PipelineConfig {
        PipelineConfig {
            start_date: Some(start),
            end_date: Some(end),
            ..Default::default()
        }
    }

    #[test]
    fn test_run_full_scenario() {
        let report = run(&scenario_rows(), &window(ymd(2019, 1, 1), ymd(2021, 12, 31))).unwrap();

        assert_eq!(report.filtered_rows, 3);
        assert_eq!(
            report.top_streets,
            vec![
                StreetRank { street: "StreetA".into(), mean_adt: 150.0 },
                StreetRank { street: "StreetB".into(), mean_adt: 50.0 },
            ]
        );
        let years: Vec<(i32, f64)> = report.yearly_series.iter().map(|p| (p.year, p.adt)).collect();
        assert_eq!(years, vec![(2019, 100.0), (2020, 200.0), (2021, 50.0)]);
        assert_eq!(report.heat_points.len(), 3);
    }

    #[test]
    fn test_run_gap_year_scenario() {
        let rows: Vec<Observation> = scenario_rows()
            .into_iter()
            .filter(|o| o.count_date != ymd(2020, 1, 1))
            .collect();
        let report = run(&rows, &window(ymd(2019, 1, 1), ymd(2021, 12, 31))).unwrap();

        let years: Vec<(i32, f64)> = report.yearly_series.iter().map(|p| (p.year, p.adt)).collect();
        assert_eq!(years, vec![(2019, 100.0), (2020, 75.0), (2021, 50.0)]);
    }

    #[test]
    fn test_run_missing_latitude_only_affects_heat_points() {
        let with_coords = run(&scenario_rows(), &PipelineConfig::default()).unwrap();

        let rows: Vec<Observation> = scenario_rows()
            .into_iter()
            .map(|mut o| {
                o.latitude = None;
                o
            })
            .collect();
        let report = run(&rows, &PipelineConfig::default()).unwrap();

        assert!(report.heat_points.is_empty());
        assert_eq!(report.top_streets, with_coords.top_streets);
        assert_eq!(report.yearly_series, with_coords.yearly_series);
    }

    #[test]
    fn test_run_inverted_window_is_empty_not_error() {
        let report = run(&scenario_rows(), &window(ymd(2021, 12, 31), ymd(2019, 1, 1))).unwrap();

        assert!(report.is_empty());
        assert!(report.top_streets.is_empty());
        assert!(report.yearly_series.is_empty());
        assert!(report.heat_points.is_empty());
    }

    #[test]
    fn test_run_is_idempotent() {
        let config = window(ymd(2019, 1, 1), ymd(2021, 12, 31));
        let first = run(&scenario_rows(), &config).unwrap();
        let second = run(&scenario_rows(), &config).unwrap();

        assert_eq!(first, second);
        let bits = |r: &TrafficReport| -> Vec<u64> {
            r.top_streets
                .iter()
                .map(|s| s.mean_adt.to_bits())
                .chain(r.yearly_series.iter().map(|p| p.adt.to_bits()))
                .chain(r.heat_points.iter().map(|h| h.weight.to_bits()))
                .collect()
        };
        assert_eq!(bits(&first), bits(&second));
    }

    #[test]
    fn test_run_huge_adt_values_stay_finite() {
        let rows = vec![
            Observation::new("A", ymd(2019, 1, 1), 1e308),
            Observation::new("A", ymd(2019, 2, 1), 1e308),
            Observation::new("B", ymd(2021, 1, 1), 5.0),
        ];
        let report = run(&rows, &PipelineConfig::default()).unwrap();

        assert_eq!(report.top_streets[0].mean_adt, 1e308);
        assert_eq!(report.top_streets[1].mean_adt, 5.0);

        let series = &report.yearly_series;
        assert_eq!(series.len(), 3);
        assert!(series.iter().all(|p| p.adt.is_finite()));
        assert!(series[1].interpolated);
        assert!(series[1].adt >= 5.0 && series[1].adt <= 1e308);
    }

    #[test]
    fn test_run_rejects_zero_top_n() {
        let config = PipelineConfig { top_n: 0, ..Default::default() };
        assert!(matches!(
            run(&scenario_rows(), &config),
            Err(PipelineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_run_from_reader_surfaces_malformed_input() {
        let data = "STREETONE,LATITUDE,LONGITUDE,ADT,COUNTDATE,CITY\n\
                    StreetA,37.3,-121.9,100,2019-01-01,San Jose\n\
                    StreetB,37.3,-121.9,50,31st of June,San Jose\n";
        let err = run_from_reader(data.as_bytes(), &PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedInput { row: 2, .. }));
    }

    #[test]
    fn test_run_carries_heat_layer_settings() {
        let config = PipelineConfig {
            heat_layer: HeatLayerSettings { radius: 25, blur: 5 },
            ..Default::default()
        };
        let report = run(&scenario_rows(), &config).unwrap();
        assert_eq!(report.heat_layer, HeatLayerSettings { radius: 25, blur: 5 });
    }
}
