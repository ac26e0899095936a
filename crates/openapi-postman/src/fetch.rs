//! Loading the specification from a URL or a local file.

use std::time::Duration;

use crate::document::SpecDocument;
use crate::error::{Error, Result};

/// Time allowed for the whole spec request.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Load a spec from `source`.
///
/// Sources starting with `http://` or `https://` are fetched; anything else
/// is read from the local filesystem.
///
/// # Errors
///
/// Returns an error if the request fails, the server answers with a
/// non-success status, the file cannot be read, or the body is neither
/// JSON nor YAML.
pub fn load_spec(source: &str) -> Result<SpecDocument> {
    if is_remote(source) {
        fetch_spec(source)
    } else {
        tracing::debug!(path = source, "reading spec from file");
        let text = std::fs::read_to_string(source)?;
        SpecDocument::parse(&text)
    }
}

/// Fetch a spec over HTTP with a blocking client.
///
/// # Errors
///
/// Returns [`Error::Fetch`] on transport failure, [`Error::HttpStatus`] on a
/// non-2xx answer, or a parse error for a malformed body.
pub fn fetch_spec(url: &str) -> Result<SpecDocument> {
    let fetch_error = |source: reqwest::Error| Error::Fetch {
        url: url.to_string(),
        source,
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(fetch_error)?;

    tracing::debug!(url, "fetching spec");
    let response = client.get(url).send().map_err(fetch_error)?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let text = response.text().map_err(fetch_error)?;
    SpecDocument::parse(&text)
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}
