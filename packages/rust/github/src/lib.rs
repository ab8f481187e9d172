//! GitHub REST implementation of [`ItemStore`].
//!
//! Items are issues; children are sub-issues. Each sub-issue carries its own
//! `repository_url`, so a hierarchy may span repositories.

mod wire;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, Response};
use rollup_core::ItemStore;
use rollup_shared::{ChildRef, Container, GitHubConfig, Item, Result, RollupError};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use wire::{CloseRequest, CommentRequest, ErrorBody, IssueResponse};

/// Media type GitHub recommends for REST calls.
const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// Pinned REST API version.
const GITHUB_API_VERSION: &str = "2022-11-28";

/// User-Agent string for API requests (GitHub rejects requests without one).
const USER_AGENT: &str = concat!("rollup/", env!("CARGO_PKG_VERSION"));

/// Issue store backed by the GitHub REST API.
pub struct GitHubStore {
    client: Client,
    api_url: String,
    per_page: u32,
}

impl GitHubStore {
    /// Build a store authenticated with `token`.
    pub fn new(config: &GitHubConfig, token: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| RollupError::config("GitHub token contains invalid characters"))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| RollupError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            per_page: config.per_page.max(1),
        })
    }

    fn issue_url(&self, container: &Container, id: u64) -> String {
        format!(
            "{}/repos/{}/{}/issues/{id}",
            self.api_url, container.namespace, container.name
        )
    }

    /// Send a request, mapping 404 to [`RollupError::NotFound`] and any other
    /// failure status to [`RollupError::Store`].
    async fn send(
        &self,
        request: RequestBuilder,
        what: &str,
        container: &Container,
        id: u64,
    ) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| RollupError::Network(format!("{what}: {e}")))?;

        let status = response.status();
        debug!(what, %status, "github response");

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RollupError::not_found(container, id));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or(body);
            return Err(RollupError::Store(format!(
                "{what}: HTTP {status}: {}",
                message.trim()
            )));
        }

        Ok(response)
    }
}

/// Decode a JSON response body.
async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let body = response
        .text()
        .await
        .map_err(|e| RollupError::Network(format!("{what}: failed to read body: {e}")))?;

    serde_json::from_str(&body).map_err(|e| RollupError::parse(format!("{what}: {e}")))
}

#[async_trait]
impl ItemStore for GitHubStore {
    #[instrument(skip(self))]
    async fn get_item(&self, container: &Container, id: u64) -> Result<Item> {
        let url = self.issue_url(container, id);
        let what = format!("GET {url}");

        let response = self
            .send(self.client.get(&url), &what, container, id)
            .await?;
        let issue: IssueResponse = decode(response, &what).await?;

        Ok(issue.into_item(container.clone()))
    }

    #[instrument(skip(self))]
    async fn list_children(&self, container: &Container, id: u64) -> Result<Vec<ChildRef>> {
        let url = format!("{}/sub_issues", self.issue_url(container, id));
        let mut children = Vec::new();

        for page in 1.. {
            let what = format!("GET {url} (page {page})");
            let request = self
                .client
                .get(&url)
                .query(&[("per_page", self.per_page), ("page", page)]);

            let response = self.send(request, &what, container, id).await?;
            let batch: Vec<IssueResponse> = decode(response, &what).await?;
            let short_page = batch.len() < self.per_page as usize;

            for issue in batch {
                children.push(issue.into_child_ref()?);
            }
            if short_page {
                break;
            }
        }

        debug!(count = children.len(), "listed sub-issues");
        Ok(children)
    }

    #[instrument(skip(self))]
    async fn close_item(&self, container: &Container, id: u64) -> Result<()> {
        let url = self.issue_url(container, id);
        let what = format!("PATCH {url}");

        self.send(
            self.client.patch(&url).json(&CloseRequest::completed()),
            &what,
            container,
            id,
        )
        .await?;
        Ok(())
    }

    #[instrument(skip(self, text))]
    async fn add_note(&self, container: &Container, id: u64, text: &str) -> Result<()> {
        let url = format!("{}/comments", self.issue_url(container, id));
        let what = format!("POST {url}");

        self.send(
            self.client.post(&url).json(&CommentRequest { body: text }),
            &what,
            container,
            id,
        )
        .await?;
        Ok(())
    }
}
