use tracing::{info, instrument};

use crate::{
    base::{
        error::LabelerError,
        types::{Issue, Label, RepoId, TrainingCorpus, TrainingExample},
    },
    service::github::IssueClient,
};

/// Gather the training examples and the candidate labels of `repo`.
///
/// Issues are listed before labels. A repository without labels is an error since
/// there is nothing to classify into.
#[instrument(skip_all, fields(repo = %repo))]
pub async fn collect_examples(github: &IssueClient, repo: &RepoId) -> Result<TrainingCorpus, LabelerError> {
    let issues = github.list_issues(repo).await.map_err(|source| LabelerError::UpstreamFetch {
        what: "issues",
        repo: repo.clone(),
        source,
    })?;

    let mut examples = examples_from_issues(&issues);

    let labels = github.list_labels(repo).await.map_err(|source| LabelerError::UpstreamFetch {
        what: "labels",
        repo: repo.clone(),
        source,
    })?;

    if labels.is_empty() {
        return Err(LabelerError::NoLabels { repo: repo.clone() });
    }

    examples.extend(examples_from_labels(&labels));

    info!("Collected {} examples from {} issues and {} labels", examples.len(), issues.len(), labels.len());

    Ok(TrainingCorpus {
        examples,
        labels: labels.into_iter().map(|l| l.name).collect(),
    })
}

/// One example per (title, label) and one per (body, label) for every label on every issue.
pub fn examples_from_issues(issues: &[Issue]) -> Vec<TrainingExample> {
    let mut examples = Vec::new();

    for issue in issues {
        for label in issue.label_names() {
            if !issue.title().is_empty() {
                examples.push(TrainingExample::new(issue.title(), label.clone()));
            }

            if !issue.body().is_empty() {
                examples.push(TrainingExample::new(issue.body(), label));
            }
        }
    }

    examples
}

/// One example per label that has a description.
pub fn examples_from_labels(labels: &[Label]) -> Vec<TrainingExample> {
    labels
        .iter()
        .filter_map(|label| match label.description.as_deref() {
            Some(description) if !description.is_empty() => Some(TrainingExample::new(description, label.name.clone())),
            _ => None,
        })
        .collect()
}
