//! Common types shared by the collector, the dispatcher, and the service clients.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Maximum number of characters kept from any text used as a training example.
pub const MAX_EXAMPLE_LENGTH: usize = 4096;

/// Truncate `text` to at most [`MAX_EXAMPLE_LENGTH`] characters.
pub fn truncate_example(text: &str) -> String {
    match text.char_indices().nth(MAX_EXAMPLE_LENGTH) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

// Repository.

/// An `owner/repo` pair identifying a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub repo: String,
}

impl RepoId {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self { owner: owner.into(), repo: repo.into() }
    }
}

impl FromStr for RepoId {
    type Err = Err;

    fn from_str(s: &str) -> Res<Self> {
        match s.split_once('/') {
            Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => Ok(Self::new(owner, repo)),
            _ => Err(anyhow::anyhow!("Invalid repository `{s}`, expected `owner/repo`.")),
        }
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

// Issues and labels.

/// A label attached to an issue, as returned by the API or found in an event payload.
///
/// GitHub hands these back either as a bare name or as a full label object;
/// [`LabelRef::into_name`] maps both shapes onto the label name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LabelRef {
    Name(String),
    Object {
        #[serde(default)]
        name: Option<String>,
    },
    Other(serde_json::Value),
}

impl LabelRef {
    pub fn name(&self) -> Option<&str> {
        match self {
            LabelRef::Name(name) => Some(name),
            LabelRef::Object { name } => name.as_deref(),
            LabelRef::Other(_) => None,
        }
    }

    pub fn into_name(self) -> Option<String> {
        match self {
            LabelRef::Name(name) => Some(name),
            LabelRef::Object { name } => name,
            LabelRef::Other(_) => None,
        }
    }
}

/// An issue in the repository, or the issue that triggered the run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub labels: Vec<LabelRef>,
}

impl Issue {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    /// The names of the labels currently on the issue, skipping any reference without a name.
    pub fn label_names(&self) -> Vec<String> {
        self.labels.iter().filter_map(|l| l.name().map(str::to_string)).collect()
    }
}

/// A label defined on the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

// Classification.

/// A `(text, label)` pair used to steer the model.
///
/// Serialized as a two element array, which is the shape the classifications endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(String, String)", into = "(String, String)")]
pub struct TrainingExample {
    pub text: String,
    pub label: String,
}

impl TrainingExample {
    pub fn new(text: &str, label: impl Into<String>) -> Self {
        Self {
            text: truncate_example(text),
            label: label.into(),
        }
    }
}

impl From<(String, String)> for TrainingExample {
    fn from((text, label): (String, String)) -> Self {
        Self { text, label }
    }
}

impl From<TrainingExample> for (String, String) {
    fn from(example: TrainingExample) -> Self {
        (example.text, example.label)
    }
}

/// The examples and label vocabulary gathered from the repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingCorpus {
    pub examples: Vec<TrainingExample>,
    pub labels: Vec<String>,
}

/// Everything sent to the model for a single classification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationRequest {
    pub model: String,
    pub search_model: String,
    pub temperature: f32,
    pub query: String,
    pub labels: Vec<String>,
    pub examples: Vec<TrainingExample>,
    pub max_examples: u32,
}

/// The label picked by the model.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Classification {
    #[serde(default)]
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_example_long_text() {
        let text = "a".repeat(MAX_EXAMPLE_LENGTH + 10);

        assert_eq!(truncate_example(&text).chars().count(), MAX_EXAMPLE_LENGTH);
    }

    #[test]
    fn test_truncate_example_short_text_unchanged() {
        assert_eq!(truncate_example("short"), "short");

        let exact = "b".repeat(MAX_EXAMPLE_LENGTH);
        assert_eq!(truncate_example(&exact), exact);
    }

    #[test]
    fn test_truncate_example_multibyte() {
        let text = "é".repeat(MAX_EXAMPLE_LENGTH + 1);
        let truncated = truncate_example(&text);

        assert_eq!(truncated.chars().count(), MAX_EXAMPLE_LENGTH);
        assert_eq!(truncated.len(), MAX_EXAMPLE_LENGTH * 2);
    }

    #[test]
    fn test_label_ref_shapes() {
        let labels: Vec<LabelRef> = serde_json::from_value(serde_json::json!(["bug", { "name": "feature", "color": "fff" }, { "id": 3 }, { "name": 4 }, 5])).unwrap();

        let names = labels.into_iter().filter_map(LabelRef::into_name).collect::<Vec<_>>();

        assert_eq!(names, vec!["bug".to_string(), "feature".to_string()]);
    }

    #[test]
    fn test_issue_null_fields() {
        let issue: Issue = serde_json::from_value(serde_json::json!({ "number": 7, "title": "Hi", "body": null })).unwrap();

        assert_eq!(issue.number, Some(7));
        assert_eq!(issue.body(), "");
        assert!(issue.label_names().is_empty());
    }

    #[test]
    fn test_training_example_serializes_as_pair() {
        let example = TrainingExample::new("Something broken", "bug");

        assert_eq!(serde_json::to_value(&example).unwrap(), serde_json::json!(["Something broken", "bug"]));
    }

    #[test]
    fn test_repo_id_parse() {
        let repo: RepoId = "octo/widgets".parse().unwrap();

        assert_eq!(repo, RepoId::new("octo", "widgets"));
        assert_eq!(repo.to_string(), "octo/widgets");
        assert!("octo".parse::<RepoId>().is_err());
        assert!("/widgets".parse::<RepoId>().is_err());
        assert!("octo/".parse::<RepoId>().is_err());
    }
}
