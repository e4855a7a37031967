//! Failure modes of a labeling run.

use thiserror::Error;

use super::types::RepoId;

/// Errors that end a labeling run.
///
/// Each variant corresponds to one step of the run; service failures are carried as the source.
#[derive(Error, Debug)]
pub enum LabelerError {
    /// A required input or piece of runner context is absent.
    #[error("Missing required configuration `{field}`.")]
    MissingConfiguration { field: &'static str },

    /// The repository has no labels to classify against.
    #[error("No labels found for repository {repo}.")]
    NoLabels { repo: RepoId },

    /// Listing issues or labels failed.
    #[error("Failed to fetch {what} for repository {repo}: {source:#}")]
    UpstreamFetch {
        what: &'static str,
        repo: RepoId,
        source: anyhow::Error,
    },

    /// The model call failed or produced no usable label.
    #[error("Classification request failed: {0:#}")]
    ClassificationRequest(anyhow::Error),

    /// Writing the label back to the issue failed.
    #[error("Error adding label '{label}' to issue #{number}: {source:#}")]
    LabelApplication { label: String, number: u64, source: anyhow::Error },

    /// A service client could not be constructed.
    #[error("Failed to initialize the {what} client: {source:#}")]
    Client { what: &'static str, source: anyhow::Error },
}
