use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::models::Quote;

pub const DEFAULT_QUOTE_API_URL: &str = "https://zenquotes.io/api/today";

#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("quote service returned an empty list")]
    Empty,
}

/// Reads today's quote from the quote API. The endpoint answers with a JSON
/// array; only the first element is used.
#[derive(Clone)]
pub struct QuoteClient {
    http: Client,
    url: Url,
}

impl QuoteClient {
    pub fn new(url: Url, timeout: Duration) -> Result<Self, QuoteError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub async fn fetch_today(&self) -> Result<Quote, QuoteError> {
        let quotes: Vec<Quote> = self
            .http
            .get(self.url.clone())
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        quotes.into_iter().next().ok_or(QuoteError::Empty)
    }
}
