//! Fetches the motivational quote shown on the landing page.

use std::time::Duration;

use serde::Deserialize;

use crate::Error;

/// The quote service used when none is configured.
pub const DEFAULT_QUOTE_URL: &str = "https://api.quotable.io/random?tags=motivational";

/// How long to wait for the quote service before using [Quote::fallback].
pub const DEFAULT_QUOTE_TIMEOUT: Duration = Duration::from_millis(2000);

/// A quote and the person it is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Quote {
    /// The text of the quote.
    pub content: String,
    /// Who said it.
    pub author: String,
}

impl Quote {
    /// The quote shown when the quote service cannot be reached.
    pub fn fallback() -> Self {
        Self {
            content: "Do not save what is left after spending, but spend what is left after saving."
                .to_owned(),
            author: "Warren Buffett".to_owned(),
        }
    }
}

/// The ways fetching a quote can fail.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    /// The request could not be sent, timed out, or the body could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The quote service responded with a non-success status code.
    #[error("unexpected status code {0}")]
    Status(reqwest::StatusCode),
}

/// A client for a quote service that responds with JSON of the form
/// `{"content": "...", "author": "..."}`.
#[derive(Debug, Clone)]
pub struct QuoteClient {
    url: String,
    http: reqwest::Client,
}

impl QuoteClient {
    /// Create a client that fetches quotes from `url`, giving up after `timeout`.
    ///
    /// # Errors
    /// Returns [Error::HttpClient] if the underlying HTTP client could not be built.
    pub fn new(url: &str, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| Error::HttpClient(error.to_string()))?;

        Ok(Self {
            url: url.to_owned(),
            http,
        })
    }

    /// Fetch a random quote.
    ///
    /// # Errors
    /// Returns a [QuoteError] if the request fails, times out, the response
    /// status is not a success or the body is not a quote.
    pub async fn fetch(&self) -> Result<Quote, QuoteError> {
        let response = self.http.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::Status(status));
        }

        Ok(response.json::<Quote>().await?)
    }

    /// Fetch a random quote, or [Quote::fallback] if that fails for any reason.
    pub async fn fetch_or_fallback(&self) -> Quote {
        match self.fetch().await {
            Ok(quote) => quote,
            Err(error) => {
                tracing::warn!("Could not fetch quote from {}: {error}", self.url);
                Quote::fallback()
            }
        }
    }
}
