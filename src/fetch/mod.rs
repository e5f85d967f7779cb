//! Source loading for ADT table exports.
//!
//! A source is either a local path or an `http(s)` URL. Payloads whose name
//! ends in `.gz` are gunzipped before parsing.

mod client;

pub use client::{BasicClient, HttpClient};

use anyhow::{Context, Result};
use tracing::debug;

use crate::ingest::decode_source;

pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

/// Loads the CSV payload of `source` from a local file or over HTTP.
#[tracing::instrument]
pub async fn load_source(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        let client = BasicClient::new();
        fetch_bytes(&client, source)
            .await
            .with_context(|| format!("failed to fetch '{source}'"))?
    } else {
        std::fs::read(source).with_context(|| format!("failed to read '{source}'"))?
    };
    debug!(bytes = bytes.len(), "Source loaded");

    let name = source.split(['?', '#']).next().unwrap_or(source);
    Ok(decode_source(name, bytes)?)
}
