use serde::{Deserialize, Serialize};

/// A single quote as served by the quote API.
///
/// The API uses one-letter keys (`q`, `a`, `h`); the rest of the app
/// serializes the long names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    #[serde(rename(deserialize = "q"))]
    pub text: String,
    #[serde(rename(deserialize = "a"))]
    pub author: String,
    #[serde(rename(deserialize = "h"), default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

impl Quote {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
            html: None,
        }
    }
}
