//! OpenAPI document retrieval from a URL, a file or inline JSON.

use std::time::Duration;

use nsplit_core::{DocumentSource, Error, OpenApiDocument, Result};
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use tracing::{debug, warn};
use url::Url;

const MAX_RETRIES: u32 = 5;
const INITIAL_DELAY_MS: u64 = 125;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Outcome of one failed attempt.
#[derive(Debug)]
enum Attempt {
    /// Connection errors, timeouts, 5xx, 408 and 429.
    Transient(String),
    /// Any other error status. Repeating the request would not help.
    Permanent(String),
}

impl From<reqwest::Error> for Attempt {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) if !is_transient_status(status) => Self::Permanent(e.to_string()),
            _ => Self::Transient(e.to_string()),
        }
    }
}

fn is_transient_status(status: StatusCode) -> bool {
    status.is_server_error()
        || status == StatusCode::REQUEST_TIMEOUT
        || status == StatusCode::TOO_MANY_REQUESTS
}

/// Execute an async operation with exponential backoff retry.
///
/// Transient failures are retried up to 5 times with delays: 125ms, 250ms,
/// 500ms, 1000ms. A permanent failure is returned at once.
async fn fetch_with_retry<T, F, Fut>(operation: F, operation_name: &str) -> std::result::Result<T, String>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = std::result::Result<T, Attempt>>,
{
    let mut last_error = String::new();
    for attempt in 0..MAX_RETRIES {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(Attempt::Permanent(e)) => return Err(format!("{operation_name}: {e}")),
            Err(Attempt::Transient(e)) => {
                last_error = e;
                if attempt < MAX_RETRIES - 1 {
                    let delay = INITIAL_DELAY_MS * (1 << attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_retries = MAX_RETRIES,
                        delay_ms = delay,
                        operation = operation_name,
                        error = %last_error,
                        "Document request failed, retrying"
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
            }
        }
    }
    Err(format!(
        "{operation_name}: {last_error} (after {MAX_RETRIES} retries)"
    ))
}

/// Download the document text, retrying transient failures.
pub async fn fetch_text(url: &Url) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| Error::Fetch(format!("Failed to build HTTP client: {e}")))?;
    let client = &client;

    fetch_with_retry(
        || async move {
            let response = client
                .get(url.clone())
                .header(ACCEPT, "application/json")
                .send()
                .await
                .map_err(Attempt::from)?
                .error_for_status()
                .map_err(Attempt::from)?;
            response.text().await.map_err(Attempt::from)
        },
        url.as_str(),
    )
    .await
    .map_err(Error::Fetch)
}

/// Load and parse the document.
///
/// A document fetched over HTTP gets a relative base URL resolved against
/// the URL it came from.
pub async fn load_document(source: &DocumentSource) -> Result<OpenApiDocument> {
    match source {
        DocumentSource::Url(location) => {
            let url = Url::parse(location)
                .map_err(|e| Error::Config(format!("Invalid document URL `{location}`: {e}")))?;
            let text = fetch_text(&url).await?;
            debug!(url = %url, bytes = text.len(), "Fetched OpenAPI document");
            let mut document = OpenApiDocument::from_json(&text)?;
            document.resolve_relative_base_url(url.as_str());
            Ok(document)
        }
        DocumentSource::File(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .map_err(|source| Error::Read {
                    path: path.clone(),
                    source,
                })?;
            debug!(path = %path.display(), bytes = text.len(), "Read OpenAPI document");
            OpenApiDocument::from_json(&text)
        }
        DocumentSource::Inline(json) => OpenApiDocument::from_json(json),
    }
}
