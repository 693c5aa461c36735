//! HTTP transport: fetch bytes from a URL as a stream.

use std::io::Read;

use anyhow::{Context, Result};

/// GET `url` and return the response body. Any non-2xx status is an error.
pub fn get(url: &str) -> Result<Box<dyn Read + Send + Sync + 'static>> {
    tracing::debug!(url, "GET");
    let response = ureq::get(url)
        .call()
        .with_context(|| format!("request to {url} failed"))?;
    tracing::debug!(status = response.status(), "response");
    Ok(response.into_reader())
}
