use tracing::{info, instrument, warn};

use crate::{
    base::{
        config::Config,
        error::LabelerError,
        types::{ClassificationRequest, Issue, RepoId, TrainingCorpus},
    },
    interaction::collect_examples::collect_examples,
    runtime::Runtime,
    service::action::{self, ActionContext},
};

/// The issue a run labels, once the inputs have been checked.
#[derive(Debug, Clone)]
pub struct LabelTarget {
    pub repo: RepoId,
    pub issue: Issue,
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labeled {
    /// The label the model picked.
    pub label: String,
    /// Whether the label was written to the issue.
    pub applied: bool,
}

/// Check the inputs a run needs before anything is fetched.
///
/// Fields are checked in order (`token`, `openai-api-key`, `issue`, `GITHUB_REPOSITORY`) and the first absent one is reported.
pub fn validate(config: &Config, context: &ActionContext) -> Result<LabelTarget, LabelerError> {
    if config.token.is_empty() {
        return Err(LabelerError::MissingConfiguration { field: "token" });
    }

    if config.openai_api_key.is_empty() {
        return Err(LabelerError::MissingConfiguration { field: "openai-api-key" });
    }

    let Some(issue) = context.event.issue.clone() else {
        return Err(LabelerError::MissingConfiguration { field: "issue" });
    };

    let Some(repo) = context.repository.clone() else {
        return Err(LabelerError::MissingConfiguration { field: "GITHUB_REPOSITORY" });
    };

    Ok(LabelTarget { repo, issue })
}

/// The query: title, body, and space-joined label names, one per line.
pub fn build_query(issue: &Issue) -> String {
    format!("{}\n{}\n{}", issue.title(), issue.body(), issue.label_names().join(" "))
}

/// Assemble the classification request for `issue` from the collected corpus.
pub fn build_request(config: &Config, issue: &Issue, corpus: TrainingCorpus) -> ClassificationRequest {
    ClassificationRequest {
        model: config.model.clone(),
        search_model: config.search_model.clone(),
        temperature: config.temperature,
        query: build_query(issue),
        labels: corpus.labels,
        examples: corpus.examples,
        max_examples: config.max_examples,
    }
}

/// Classify the target issue and apply the resulting label.
///
/// Each step runs to completion before the next: collect, classify, apply. Nothing is retried.
#[instrument(skip_all, fields(repo = %target.repo, issue_number = ?target.issue.number))]
pub async fn label_issue(runtime: &Runtime, target: &LabelTarget) -> Result<Labeled, LabelerError> {
    let issue = &target.issue;

    action::group("Issue", &serde_json::to_string_pretty(issue).unwrap_or_default());

    // Gather examples and the label vocabulary.

    let corpus = collect_examples(&runtime.github, &target.repo).await?;
    let request = build_request(&runtime.config, issue, corpus);

    action::group("Classification Request", &serde_json::to_string_pretty(&request).unwrap_or_default());

    // Ask the model.

    let classification = runtime.llm.classify(&request).await.map_err(LabelerError::ClassificationRequest)?;
    let label = classification.label.trim().to_string();

    if label.is_empty() {
        return Err(LabelerError::ClassificationRequest(anyhow::anyhow!("The model returned no label.")));
    }

    info!("Issue classified as `{label}`");
    action::notice(&format!("Issue labeled as '{label}'"));

    // Apply the label.

    let Some(number) = issue.number.filter(|n| *n > 0) else {
        warn!("Triggering issue has no number; not applying the label.");
        return Ok(Labeled { label, applied: false });
    };

    if runtime.config.dry_run {
        info!("Dry run; not adding `{label}` to issue #{number}.");
        return Ok(Labeled { label, applied: false });
    }

    runtime
        .github
        .add_labels(&target.repo, number, std::slice::from_ref(&label))
        .await
        .map_err(|source| LabelerError::LabelApplication {
            label: label.clone(),
            number,
            source,
        })?;

    info!("Added `{label}` to issue #{number}");

    Ok(Labeled { label, applied: true })
}
