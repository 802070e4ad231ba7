//! HTTP client for the `/advocates` endpoint and the glue that feeds its
//! responses back into a [`Session`].

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::ClientConfig;
use crate::models::{AdvocatePage, Failure};
use crate::session::{Action, FetchIntent, Session};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered `{ ok: false }`.
    #[error("server reported a failure")]
    ServerFailure,
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Source of advocate pages.
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    async fn list_advocates(&self, intent: &FetchIntent) -> Result<AdvocatePage, ClientError>;
}

/// `/advocates` answers either a page or a failure body, both with 200.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListReply {
    Page(AdvocatePage),
    Failure(Failure),
}

/// [`DirectoryApi`] over HTTP.
pub struct HttpDirectory {
    http: reqwest::Client,
    base_url: String,
}

impl HttpDirectory {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::with_base_url(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Query-string pairs for an intent. `searchText` is only sent when set.
pub fn query_params(intent: &FetchIntent) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("pageSize", intent.page_size.to_string()),
        ("page", intent.page.to_string()),
    ];
    if let Some(text) = intent.search_text.as_deref().filter(|t| !t.is_empty()) {
        params.push(("searchText", text.to_string()));
    }
    params
}

#[async_trait]
impl DirectoryApi for HttpDirectory {
    async fn list_advocates(&self, intent: &FetchIntent) -> Result<AdvocatePage, ClientError> {
        let response = self
            .http
            .get(format!("{}/advocates", self.base_url))
            .query(&query_params(intent))
            .send()
            .await?;

        let status = response.status();
        if status.is_client_error() {
            let message = response
                .json::<Failure>()
                .await
                .ok()
                .and_then(|f| f.message)
                .unwrap_or_else(|| status.to_string());
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        if !status.is_success() {
            return Err(ClientError::ServerFailure);
        }

        match response.json::<ListReply>().await? {
            ListReply::Page(page) => Ok(page),
            ListReply::Failure(failure) => {
                tracing::debug!(ok = failure.ok, message = ?failure.message, "server reported failure");
                Err(ClientError::ServerFailure)
            }
        }
    }
}

/// Applies `action` to `session` and, if it produces a fetch, performs it and
/// applies the outcome. Returns whether a request was made.
pub async fn dispatch(session: &mut Session, api: &dyn DirectoryApi, action: Action) -> bool {
    let Some(intent) = session.apply(action) else {
        return false;
    };

    let outcome = match api.list_advocates(&intent).await {
        Ok(page) => {
            let total_count = page.count();
            Action::Loaded {
                request_id: intent.request_id,
                rows: page.data,
                total_count,
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, request_id = intent.request_id, "fetch failed");
            Action::Failed {
                request_id: intent.request_id,
                message: "Failed to fetch advocates.".to_string(),
            }
        }
    };
    session.apply(outcome);
    true
}
