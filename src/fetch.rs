use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use crate::error::CheckError;

/// One attempt, no retries; a hung server must not wedge the scheduler.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// A CRL as fetched, before any decoding. The bytes live only for the
/// duration of the invocation and are dropped on every exit path.
#[derive(Debug)]
pub struct RetrievedCrl {
    pub url: String,
    pub bytes: Vec<u8>,
}

/// Fetch the raw CRL bytes from `url` over http/https.
///
/// Every transport-level failure (DNS, connect, TLS, timeout) and every
/// non-success HTTP status collapses into `CheckError::Retrieval`.
pub fn fetch_crl(url: &str) -> Result<RetrievedCrl, CheckError> {
    let retrieval = |source| CheckError::Retrieval {
        url: url.to_string(),
        source,
    };

    let client = Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(retrieval)?;

    let bytes = client
        .get(url)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.bytes())
        .map_err(retrieval)?
        .to_vec();

    debug!(url, len = bytes.len(), "fetched CRL");

    Ok(RetrievedCrl {
        url: url.to_string(),
        bytes,
    })
}
