use shared::error::DEFAULT_FAILURE_MESSAGE;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search service answered {status}")]
    Service { status: u16, detail: Option<String> },
    #[error("search request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("search response could not be decoded: {0}")]
    Decode(#[source] reqwest::Error),
}

impl SearchError {
    /// Text for the error surface: the service's own `detail` when it sent
    /// one, the generic failure message otherwise.
    pub fn user_message(&self) -> String {
        match self {
            SearchError::Service {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }
}
