use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::models::Quote;
use crate::quotes::QuoteClient;

pub const FETCH_FAILED: &str = "Failed to fetch quote";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QuoteState {
    Loading,
    Success { quote: Quote },
    Error { message: String },
}

#[derive(Clone)]
pub struct QuoteScreen {
    client: QuoteClient,
    state: Arc<watch::Sender<QuoteState>>,
}

impl QuoteScreen {
    pub fn new(client: QuoteClient) -> Self {
        let (state, _) = watch::channel(QuoteState::Loading);
        Self {
            client,
            state: Arc::new(state),
        }
    }

    pub fn current(&self) -> QuoteState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QuoteState> {
        self.state.subscribe()
    }

    /// The quote currently on screen, if the last fetch succeeded.
    pub fn quote(&self) -> Option<Quote> {
        match &*self.state.borrow() {
            QuoteState::Success { quote } => Some(quote.clone()),
            _ => None,
        }
    }

    /// Fetch today's quote, publishing `Loading` first and the outcome after.
    /// Failures are not retried.
    pub async fn refresh(&self) -> QuoteState {
        self.state.send_replace(QuoteState::Loading);

        let next = match self.client.fetch_today().await {
            Ok(quote) => QuoteState::Success { quote },
            Err(e) => {
                tracing::warn!(url = %self.client.url(), "quote fetch failed: {e}");
                QuoteState::Error {
                    message: FETCH_FAILED.to_string(),
                }
            }
        };

        self.state.send_replace(next.clone());
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_serializes_with_tag() {
        let json = serde_json::to_value(QuoteState::Error {
            message: FETCH_FAILED.to_string(),
        })
        .unwrap();
        assert_eq!(json["state"], "error");
        assert_eq!(json["message"], FETCH_FAILED);

        let json = serde_json::to_value(QuoteState::Loading).unwrap();
        assert_eq!(json["state"], "loading");
    }
}
