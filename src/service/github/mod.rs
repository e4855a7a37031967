pub mod octocrab;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{Issue, Label, RepoId, Res, Void};

// Traits.

/// Generic source-control client trait that clients must implement.
///
/// This trait defines the three calls a labeling run makes against the repository.
/// Implementing this trait allows different forges (or mocks) to be used with the issue-labeler.
#[async_trait]
pub trait GenericIssueClient: Send + Sync + 'static {
    /// List the issues of the repository.
    ///
    /// Every page is fetched; the result is in the order the API returned it.
    async fn list_issues(&self, repo: &RepoId) -> Res<Vec<Issue>>;

    /// List the labels defined on the repository.
    async fn list_labels(&self, repo: &RepoId) -> Res<Vec<Label>>;

    /// Add labels to an issue, keeping the ones already present.
    async fn add_labels(&self, repo: &RepoId, issue_number: u64, labels: &[String]) -> Void;
}

// Structs.

/// Source-control client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct IssueClient {
    inner: Arc<dyn GenericIssueClient>,
}

impl Deref for IssueClient {
    type Target = dyn GenericIssueClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl IssueClient {
    pub fn new(inner: Arc<dyn GenericIssueClient>) -> Self {
        Self { inner }
    }
}
