//! GitHub REST request/response shapes.

use rollup_shared::{ChildRef, CompletionSummary, Container, Item, ItemState, Result, RollupError};
use serde::{Deserialize, Serialize};

/// The subset of an issue object rollup reads.
#[derive(Debug, Deserialize)]
pub(crate) struct IssueResponse {
    pub number: u64,
    pub title: String,
    pub state: ItemState,
    #[serde(default)]
    pub sub_issues_summary: Option<SubIssuesSummary>,
    /// `https://api.github.com/repos/{owner}/{repo}`
    #[serde(default)]
    pub repository_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubIssuesSummary {
    pub total: u32,
    pub completed: u32,
    pub percent_completed: u8,
}

impl IssueResponse {
    pub(crate) fn into_item(self, container: Container) -> Item {
        Item {
            id: self.number,
            container,
            title: self.title,
            state: self.state,
            summary: self.sub_issues_summary.map(|s| CompletionSummary {
                total: s.total,
                completed: s.completed,
                percent_complete: s.percent_completed,
            }),
        }
    }

    /// A sub-issue reference, located by its own repository.
    pub(crate) fn into_child_ref(self) -> Result<ChildRef> {
        let container = self
            .repository_url
            .as_deref()
            .and_then(container_from_repository_url)
            .ok_or_else(|| {
                RollupError::parse(format!(
                    "sub-issue #{} has no usable repository_url",
                    self.number
                ))
            })?;
        Ok(ChildRef {
            id: self.number,
            container,
        })
    }
}

/// Extract `owner/repo` from `.../repos/{owner}/{repo}`.
pub(crate) fn container_from_repository_url(url: &str) -> Option<Container> {
    let mut segments = url.trim_end_matches('/').rsplit('/');
    let name = segments.next().filter(|s| !s.is_empty())?;
    let namespace = segments.next().filter(|s| !s.is_empty())?;
    (segments.next() == Some("repos")).then(|| Container::new(namespace, name))
}

/// Body for `PATCH /repos/{owner}/{repo}/issues/{number}`.
#[derive(Debug, Serialize)]
pub(crate) struct CloseRequest {
    state: &'static str,
    state_reason: &'static str,
}

impl CloseRequest {
    pub(crate) fn completed() -> Self {
        Self {
            state: "closed",
            state_reason: "completed",
        }
    }
}

/// Body for `POST .../comments`.
#[derive(Debug, Serialize)]
pub(crate) struct CommentRequest<'a> {
    pub body: &'a str,
}

/// GitHub error payload.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_url_parsing() {
        assert_eq!(
            container_from_repository_url("https://api.github.com/repos/octo/app"),
            Some(Container::new("octo", "app"))
        );
        assert_eq!(
            container_from_repository_url("https://ghe.example.com/api/v3/repos/octo/app/"),
            Some(Container::new("octo", "app"))
        );
        assert_eq!(container_from_repository_url("https://api.github.com/octo/app"), None);
        assert_eq!(container_from_repository_url("app"), None);
    }

    #[test]
    fn zero_total_summary_is_kept_as_reported() {
        let issue: IssueResponse = serde_json::from_str(
            r#"{"number":3,"title":"t","state":"open",
                "sub_issues_summary":{"total":0,"completed":0,"percent_completed":0}}"#,
        )
        .unwrap();
        let item = issue.into_item(Container::new("a", "b"));
        assert_eq!(item.summary.map(|s| s.total), Some(0));
        assert!(item.children_summary().is_none());
    }
}
