use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{ApiErrorBody, SearchRequest, SearchResponse};
use tracing::debug;
use url::Url;

pub mod config;
pub mod error;
pub mod form;
pub mod render;
pub mod session;

pub use error::SearchError;
pub use form::{build_request, FormSnapshot, FormSource};
pub use render::{render, DisplayTree, ExerciseCard, ExerciseNode, RoutineCard, SectionBlock};
pub use session::{BusyFlag, BusyGuard, DisplaySurface, SearchController, SubmitOutcome};

/// Transport seam between the submission flow and the search service.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError>;
}

pub struct SearchClient {
    http: Client,
    endpoint: Url,
}

impl SearchClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    /// Builds the client for a server base URL such as `http://127.0.0.1:8000`.
    pub fn for_server(server_url: &str) -> anyhow::Result<Self> {
        Ok(Self::new(config::search_endpoint(server_url)?))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl SearchBackend for SearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        debug!(endpoint = %self.endpoint, ?request, "posting search request");
        let response = self
            .http
            .post(self.endpoint.as_str())
            .json(request)
            .send()
            .await
            .map_err(SearchError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            // A body that is not the usual `{"detail": ...}` still yields the
            // generic message.
            let body = response.json::<ApiErrorBody>().await.unwrap_or_default();
            return Err(SearchError::Service {
                status: status.as_u16(),
                detail: body.detail_message().map(str::to_owned),
            });
        }

        response
            .json::<SearchResponse>()
            .await
            .map_err(SearchError::Decode)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
