//! Runtime services and shared state for the issue-labeler.

use tracing::instrument;

use crate::{
    base::{config::Config, error::LabelerError},
    interaction::label_issue::{self, LabelTarget, Labeled},
    service::{action::ActionContext, github::IssueClient, llm::LlmClient},
};

/// Runtime service context for a labeling run.
///
/// This struct holds the source-control client, the LLM client, and configuration.
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The source-control client instance.
    pub github: IssueClient,
    /// The LLM client instance.
    pub llm: LlmClient,
}

impl Runtime {
    /// Create a new runtime instance with the GitHub and OpenAI clients.
    #[instrument(skip_all)]
    pub fn new(config: Config, context: &ActionContext) -> Result<Self, LabelerError> {
        // Initialize the GitHub client.
        let github = IssueClient::octocrab(&config, &context.api_url).map_err(|source| LabelerError::Client { what: "GitHub", source })?;

        // Initialize the LLM client.
        let llm = LlmClient::openai(&config);

        Ok(Self { config, github, llm })
    }

    /// Label the target issue.
    pub async fn label(&self, target: &LabelTarget) -> Result<Labeled, LabelerError> {
        label_issue::label_issue(self, target).await
    }
}
