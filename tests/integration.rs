#![cfg(test)]

use std::sync::Arc;

use async_trait::async_trait;
use issue_labeler::{
    base::{
        config::{Config, ConfigInner},
        error::LabelerError,
        types::{Classification, ClassificationRequest, Issue, Label, LabelRef, RepoId, Res, TrainingExample, Void},
    },
    interaction::label_issue::{LabelTarget, Labeled},
    runtime::Runtime,
    service::{
        github::{GenericIssueClient, IssueClient},
        llm::{GenericClassifierClient, LlmClient},
    },
};
use mockall::mock;

// Mocks.

// Mock GitHub client for testing.

mock! {
    pub Github {}

    #[async_trait]
    impl GenericIssueClient for Github {
        async fn list_issues(&self, repo: &RepoId) -> Res<Vec<Issue>>;
        async fn list_labels(&self, repo: &RepoId) -> Res<Vec<Label>>;
        async fn add_labels(&self, repo: &RepoId, issue_number: u64, labels: &[String]) -> Void;
    }
}

// Mock LLM client for testing.

mock! {
    pub Classifier {}

    #[async_trait]
    impl GenericClassifierClient for Classifier {
        async fn classify(&self, request: &ClassificationRequest) -> Res<Classification>;
    }
}

// Helpers.

fn create_test_config() -> Config {
    Config::from(ConfigInner {
        token: "ghs_test".to_string(),
        openai_api_key: "sk-test".to_string(),
        model: "curie".to_string(),
        search_model: "ada".to_string(),
        temperature: 0.0,
        ..Default::default()
    })
}

fn create_test_target(number: Option<u64>) -> LabelTarget {
    LabelTarget {
        repo: RepoId::new("octo", "widgets"),
        issue: Issue {
            number,
            title: Some("Crash on startup".to_string()),
            body: Some(String::new()),
            labels: vec![],
        },
    }
}

fn repo_issues() -> Vec<Issue> {
    vec![
        Issue {
            number: Some(1),
            title: Some("App panics when opening settings".to_string()),
            body: Some("Stack trace attached.".to_string()),
            labels: vec![LabelRef::Object { name: Some("bug".to_string()) }],
        },
        Issue {
            number: Some(2),
            title: Some("Dark mode".to_string()),
            body: None,
            labels: vec![LabelRef::Name("enhancement".to_string())],
        },
    ]
}

fn repo_labels() -> Vec<Label> {
    vec![
        Label {
            name: "bug".to_string(),
            description: Some("Something broken".to_string()),
        },
        Label {
            name: "enhancement".to_string(),
            description: None,
        },
    ]
}

/// A GitHub mock that serves the repository issues and labels.
fn get_mock_github() -> MockGithub {
    let mut mock = MockGithub::new();

    mock.expect_list_issues().times(1).returning(|_| Ok(repo_issues()));
    mock.expect_list_labels().times(1).returning(|_| Ok(repo_labels()));

    mock
}

fn classifier_returning(label: &'static str) -> MockClassifier {
    let mut mock = MockClassifier::new();

    mock.expect_classify().times(1).returning(move |_| Ok(Classification { label: label.to_string() }));

    mock
}

fn create_runtime(config: Config, github: MockGithub, classifier: MockClassifier) -> Runtime {
    Runtime {
        config,
        github: IssueClient::new(Arc::new(github)),
        llm: LlmClient::new(Arc::new(classifier)),
    }
}

// Tests.

#[tokio::test]
async fn test_label_issue_applies_label() {
    let mut github = get_mock_github();
    github
        .expect_add_labels()
        .withf(|repo, number, labels| repo.owner == "octo" && repo.repo == "widgets" && *number == 42 && labels.len() == 1 && labels[0] == "bug")
        .times(1)
        .returning(|_, _, _| Ok(()));

    let mut classifier = MockClassifier::new();
    classifier
        .expect_classify()
        .withf(|request| {
            request.query == "Crash on startup\n\n"
                && request.labels == vec!["bug".to_string(), "enhancement".to_string()]
                && request.model == "curie"
                && request.search_model == "ada"
                && request.temperature == 0.0
        })
        .times(1)
        .returning(|_| Ok(Classification { label: "bug".to_string() }));

    let runtime = create_runtime(create_test_config(), github, classifier);

    let labeled = runtime.label(&create_test_target(Some(42))).await.unwrap();

    assert_eq!(
        labeled,
        Labeled {
            label: "bug".to_string(),
            applied: true
        }
    );
}

#[tokio::test]
async fn test_label_issue_sends_collected_examples() {
    let mut github = get_mock_github();
    github.expect_add_labels().times(1).returning(|_, _, _| Ok(()));

    let mut classifier = MockClassifier::new();
    classifier
        .expect_classify()
        .withf(|request| {
            request.examples
                == vec![
                    TrainingExample::new("App panics when opening settings", "bug"),
                    TrainingExample::new("Stack trace attached.", "bug"),
                    TrainingExample::new("Dark mode", "enhancement"),
                    TrainingExample::new("Something broken", "bug"),
                ]
        })
        .times(1)
        .returning(|_| Ok(Classification { label: "bug".to_string() }));

    let runtime = create_runtime(create_test_config(), github, classifier);

    runtime.label(&create_test_target(Some(42))).await.unwrap();
}

#[tokio::test]
async fn test_label_issue_no_labels() {
    let mut github = MockGithub::new();
    github.expect_list_issues().times(1).returning(|_| Ok(repo_issues()));
    github.expect_list_labels().times(1).returning(|_| Ok(vec![]));
    github.expect_add_labels().never();

    let mut classifier = MockClassifier::new();
    classifier.expect_classify().never();

    let runtime = create_runtime(create_test_config(), github, classifier);

    let err = runtime.label(&create_test_target(Some(42))).await.unwrap_err();

    assert!(matches!(err, LabelerError::NoLabels { ref repo } if repo.to_string() == "octo/widgets"));
}

#[tokio::test]
async fn test_label_issue_issue_listing_fails() {
    let mut github = MockGithub::new();
    github.expect_list_issues().times(1).returning(|_| Err(anyhow::anyhow!("502 Bad Gateway")));
    github.expect_list_labels().never();
    github.expect_add_labels().never();

    let mut classifier = MockClassifier::new();
    classifier.expect_classify().never();

    let runtime = create_runtime(create_test_config(), github, classifier);

    let err = runtime.label(&create_test_target(Some(42))).await.unwrap_err();

    assert!(matches!(err, LabelerError::UpstreamFetch { what: "issues", .. }));
    assert!(err.to_string().contains("502 Bad Gateway"));
}

#[tokio::test]
async fn test_label_issue_label_listing_fails() {
    let mut github = MockGithub::new();
    github.expect_list_issues().times(1).returning(|_| Ok(vec![]));
    github.expect_list_labels().times(1).returning(|_| Err(anyhow::anyhow!("403 Forbidden")));
    github.expect_add_labels().never();

    let mut classifier = MockClassifier::new();
    classifier.expect_classify().never();

    let runtime = create_runtime(create_test_config(), github, classifier);

    let err = runtime.label(&create_test_target(Some(42))).await.unwrap_err();

    assert!(matches!(err, LabelerError::UpstreamFetch { what: "labels", .. }));
}

#[tokio::test]
async fn test_label_issue_empty_classification() {
    let mut github = get_mock_github();
    github.expect_add_labels().never();

    let runtime = create_runtime(create_test_config(), github, classifier_returning("  "));

    let err = runtime.label(&create_test_target(Some(42))).await.unwrap_err();

    assert!(matches!(err, LabelerError::ClassificationRequest(_)));
}

#[tokio::test]
async fn test_label_issue_classification_fails() {
    let mut github = get_mock_github();
    github.expect_add_labels().never();

    let mut classifier = MockClassifier::new();
    classifier.expect_classify().times(1).returning(|_| Err(anyhow::anyhow!("401 Unauthorized")));

    let runtime = create_runtime(create_test_config(), github, classifier);

    let err = runtime.label(&create_test_target(Some(42))).await.unwrap_err();

    assert!(matches!(err, LabelerError::ClassificationRequest(_)));
    assert!(err.to_string().contains("401 Unauthorized"));
}

#[tokio::test]
async fn test_label_issue_label_application_fails() {
    let mut github = get_mock_github();
    github.expect_add_labels().times(1).returning(|_, _, _| Err(anyhow::anyhow!("422 Validation Failed")));

    let runtime = create_runtime(create_test_config(), github, classifier_returning("bug"));

    let err = runtime.label(&create_test_target(Some(42))).await.unwrap_err();
    let message = err.to_string();

    assert!(matches!(err, LabelerError::LabelApplication { number: 42, .. }));
    assert!(message.contains("'bug'"));
    assert!(message.contains("#42"));
}

#[tokio::test]
async fn test_label_issue_without_number_skips_application() {
    let mut github = get_mock_github();
    github.expect_add_labels().never();

    let runtime = create_runtime(create_test_config(), github, classifier_returning("bug"));

    let labeled = runtime.label(&create_test_target(None)).await.unwrap();

    assert_eq!(labeled.label, "bug");
    assert!(!labeled.applied);
}

#[tokio::test]
async fn test_label_issue_with_zero_number_skips_application() {
    let mut github = get_mock_github();
    github.expect_add_labels().never();

    let runtime = create_runtime(create_test_config(), github, classifier_returning("bug"));

    let labeled = runtime.label(&create_test_target(Some(0))).await.unwrap();

    assert_eq!(labeled.label, "bug");
    assert!(!labeled.applied);
}

#[tokio::test]
async fn test_label_issue_dry_run() {
    let mut github = get_mock_github();
    github.expect_add_labels().never();

    let config = Config::from(ConfigInner {
        dry_run: true,
        ..(*create_test_config().inner).clone()
    });

    let runtime = create_runtime(config, github, classifier_returning("enhancement"));

    let labeled = runtime.label(&create_test_target(Some(7))).await.unwrap();

    assert_eq!(
        labeled,
        Labeled {
            label: "enhancement".to_string(),
            applied: false
        }
    );
}

#[tokio::test]
async fn test_start_missing_token_fails_before_any_call() {
    let config = Config::from(ConfigInner {
        token: String::new(),
        ..(*create_test_config().inner).clone()
    });
    let context = issue_labeler::service::action::ActionContext {
        repository: Some(RepoId::new("octo", "widgets")),
        event: Default::default(),
        // Nothing listens here; validation must fail first.
        api_url: "http://127.0.0.1:9".to_string(),
        output_path: None,
    };

    let err = issue_labeler::start(config, context).await.unwrap_err();

    assert!(matches!(err, LabelerError::MissingConfiguration { field: "token" }));
}
