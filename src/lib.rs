pub mod aggregators;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod ingest;
pub mod observation;
pub mod output;
pub mod pipeline;

pub use config::PipelineConfig;
pub use error::PipelineError;
pub use pipeline::{TrafficReport, run, run_from_reader};
