//! GitHub integration via `octocrab`.
//!
//! Issues and labels are fetched through raw routes so that labels can be read
//! in whichever shape the API hands back (see [`LabelRef`](crate::base::types::LabelRef)).

use std::sync::Arc;

use async_trait::async_trait;
use ::octocrab::{Octocrab, service::middleware::retry::RetryConfig};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};

use crate::base::{
    config::{Config, IssueState},
    types::{Issue, Label, RepoId, Res, Void},
};

use super::{GenericIssueClient, IssueClient};

/// Page size requested from list endpoints (the API maximum).
const PER_PAGE: usize = 100;

// Extra methods on `IssueClient` applied by the octocrab implementation.

impl IssueClient {
    /// Creates a new GitHub client talking to `api_url`.
    pub fn octocrab(config: &Config, api_url: &str) -> Res<Self> {
        let client = OctocrabIssueClient::new(config, api_url)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Structs.

/// Query parameters for a list request.
#[derive(Serialize)]
struct ListParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a str>,
    per_page: usize,
    page: u32,
}

/// Octocrab-backed GitHub client.
#[derive(Clone)]
pub struct OctocrabIssueClient {
    client: Octocrab,
    issue_state: IssueState,
}

impl OctocrabIssueClient {
    /// Create a new GitHub client.
    #[instrument(name = "OctocrabIssueClient::new", skip_all, fields(api_url = %api_url))]
    pub fn new(config: &Config, api_url: &str) -> Res<Self> {
        // Each call is sent once, including on 5xx and 429.
        let client = Octocrab::builder()
            .personal_token(config.token.clone())
            .base_uri(api_url)?
            .add_retry_config(RetryConfig::None)
            .build()?;

        Ok(Self {
            client,
            issue_state: config.issue_state,
        })
    }

    /// Fetch every page of a list route.
    async fn get_all_pages<T>(&self, route: &str, state: Option<&str>) -> Res<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page = 1;

        loop {
            let params = ListParams { state, per_page: PER_PAGE, page };
            let batch: Vec<T> = self.client.get(route, Some(&params)).await?;
            let done = batch.len() < PER_PAGE;

            debug!("Fetched {} items from `{route}` (page {page})", batch.len());

            items.extend(batch);

            if done {
                break;
            }

            page += 1;
        }

        Ok(items)
    }
}

#[async_trait]
impl GenericIssueClient for OctocrabIssueClient {
    #[instrument(name = "OctocrabIssueClient::list_issues", skip_all, fields(repo = %repo))]
    async fn list_issues(&self, repo: &RepoId) -> Res<Vec<Issue>> {
        let route = format!("/repos/{}/{}/issues", repo.owner, repo.repo);

        self.get_all_pages(&route, Some(self.issue_state.as_str())).await
    }

    #[instrument(name = "OctocrabIssueClient::list_labels", skip_all, fields(repo = %repo))]
    async fn list_labels(&self, repo: &RepoId) -> Res<Vec<Label>> {
        let route = format!("/repos/{}/{}/labels", repo.owner, repo.repo);

        self.get_all_pages(&route, None).await
    }

    #[instrument(name = "OctocrabIssueClient::add_labels", skip_all, fields(repo = %repo, issue_number = issue_number))]
    async fn add_labels(&self, repo: &RepoId, issue_number: u64, labels: &[String]) -> Void {
        let route = format!("/repos/{}/{}/issues/{issue_number}/labels", repo.owner, repo.repo);
        let payload = serde_json::json!({ "labels": labels });

        let _: serde_json::Value = self.client.post(route, Some(&payload)).await?;

        Ok(())
    }
}
