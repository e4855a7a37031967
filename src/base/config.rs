//! Load configuration via `config` crate from action inputs (`INPUT_*`) with an optional file underneath.

use std::{fmt, ops::Deref, path::Path, sync::Arc};

use serde::Deserialize;

use super::{prompts, types::Res};

/// Default model used to rank the candidate labels.
fn default_model() -> String {
    "curie".to_string()
}

/// Default model used to search the examples.
fn default_search_model() -> String {
    "ada".to_string()
}

/// Default sampling temperature.
fn default_temperature() -> f32 {
    0.0
}

/// Default OpenAI API base URL.
fn default_openai_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

/// Default cap on the examples the model considers.
fn default_max_examples() -> u32 {
    200
}

/// Default system directive for the chat backend.
fn default_system_directive() -> String {
    prompts::CLASSIFIER_SYSTEM_DIRECTIVE.to_string()
}

/// Which OpenAI endpoint performs the classification.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The `/classifications` endpoint.
    #[default]
    Classifications,
    /// Chat completions with the examples in the prompt.
    Chat,
}

/// Which issues are listed when gathering examples.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    #[default]
    Open,
    Closed,
    All,
}

impl IssueState {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
            IssueState::All => "all",
        }
    }
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for the issue-labeler application.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub inner: Arc<ConfigInner>,
}

impl Deref for Config {
    type Target = ConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<ConfigInner> for Config {
    fn from(inner: ConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigInner {
    /// GitHub token used to read issues and apply labels (`INPUT_TOKEN`).
    #[serde(default)]
    pub token: String,
    /// OpenAI API key (`INPUT_OPENAI-API-KEY`).
    #[serde(default)]
    pub openai_api_key: String,
    /// Model that picks the label (`INPUT_MODEL`).
    #[serde(default = "default_model")]
    pub model: String,
    /// Model that searches the examples (`INPUT_SEARCH-MODEL`).
    #[serde(default = "default_search_model")]
    pub search_model: String,
    /// Sampling temperature (`INPUT_TEMPERATURE`).
    /// Value between 0 and 2. Higher values like 0.8 make output more random,
    /// while lower values like 0.2 make it more focused and deterministic.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Classification backend (`INPUT_BACKEND`).
    #[serde(default)]
    pub backend: Backend,
    /// Optional custom system directive for the chat backend (`INPUT_SYSTEM-DIRECTIVE`).
    #[serde(default = "default_system_directive")]
    pub system_directive: String,
    /// OpenAI API base URL (`INPUT_OPENAI-API-BASE`).
    #[serde(default = "default_openai_api_base")]
    pub openai_api_base: String,
    /// Maximum number of examples the model considers (`INPUT_MAX-EXAMPLES`).
    #[serde(default = "default_max_examples")]
    pub max_examples: u32,
    /// State filter for the issues used as examples (`INPUT_ISSUE-STATE`).
    #[serde(default)]
    pub issue_state: IssueState,
    /// Classify and report without touching the issue (`INPUT_DRY-RUN`).
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ConfigInner {
    fn default() -> Self {
        Self {
            token: String::new(),
            openai_api_key: String::new(),
            model: default_model(),
            search_model: default_search_model(),
            temperature: default_temperature(),
            backend: Backend::default(),
            system_directive: default_system_directive(),
            openai_api_base: default_openai_api_base(),
            max_examples: default_max_examples(),
            issue_state: IssueState::default(),
            dry_run: false,
        }
    }
}

impl Config {
    /// Load from the process environment, on top of `explicit_path` when given.
    pub fn load(explicit_path: Option<&Path>) -> Res<Self> {
        Self::from_sources(explicit_path, std::env::vars())
    }

    /// Load from an explicit set of environment variables.
    ///
    /// Only `INPUT_*` variables are considered, and empty ones are skipped: the runner
    /// exports every declared input, even those the workflow left unset.
    pub fn from_sources(explicit_path: Option<&Path>, vars: impl IntoIterator<Item = (String, String)>) -> Res<Self> {
        let inputs = vars
            .into_iter()
            .filter(|(key, value)| key.to_ascii_uppercase().starts_with("INPUT_") && !value.trim().is_empty())
            .collect::<config::Map<String, String>>();

        let mut cfg = config::Config::builder();

        if let Some(p) = explicit_path {
            cfg = cfg.add_source(config::File::from(p.to_path_buf()));
        }

        cfg = cfg.add_source(config::Environment::with_prefix("INPUT").source(Some(inputs)));

        let result = Config {
            inner: Arc::new(cfg.build()?.try_deserialize()?),
        };

        if result.temperature < 0.0 || result.temperature > 2.0 {
            return Err(anyhow::anyhow!("Temperature must be between 0 and 2."));
        }

        if result.max_examples < 1 {
            return Err(anyhow::anyhow!("Max examples must be at least 1."));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_sources(None, vars(&[("INPUT_TOKEN", "ghs_abc"), ("INPUT_OPENAI-API-KEY", "sk-abc")])).unwrap();

        assert_eq!(config.token, "ghs_abc");
        assert_eq!(config.openai_api_key, "sk-abc");
        assert_eq!(config.model, "curie");
        assert_eq!(config.search_model, "ada");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.backend, Backend::Classifications);
        assert_eq!(config.system_directive, prompts::CLASSIFIER_SYSTEM_DIRECTIVE);
        assert_eq!(config.openai_api_base, "https://api.openai.com/v1");
        assert_eq!(config.max_examples, 200);
        assert_eq!(config.issue_state, IssueState::Open);
        assert!(!config.dry_run);
    }

    #[test]
    fn test_config_inputs() {
        let config = Config::from_sources(
            None,
            vars(&[
                ("INPUT_MODEL", "babbage"),
                ("INPUT_SEARCH-MODEL", "davinci"),
                ("INPUT_TEMPERATURE", "0.5"),
                ("INPUT_BACKEND", "chat"),
                ("INPUT_MAX-EXAMPLES", "10"),
                ("INPUT_ISSUE-STATE", "all"),
                ("INPUT_DRY-RUN", "true"),
                ("HOME", "/root"),
            ]),
        )
        .unwrap();

        assert_eq!(config.model, "babbage");
        assert_eq!(config.search_model, "davinci");
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.backend, Backend::Chat);
        assert_eq!(config.max_examples, 10);
        assert_eq!(config.issue_state, IssueState::All);
        assert!(config.dry_run);
    }

    #[test]
    fn test_config_empty_inputs_are_ignored() {
        let config = Config::from_sources(None, vars(&[("INPUT_TOKEN", ""), ("INPUT_TEMPERATURE", ""), ("INPUT_MODEL", "  ")])).unwrap();

        assert!(config.token.is_empty());
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.model, "curie");
    }

    #[test]
    fn test_config_temperature_out_of_range() {
        let result = Config::from_sources(None, vars(&[("INPUT_TEMPERATURE", "2.5")]));

        assert!(result.is_err());
    }

    #[test]
    fn test_config_max_examples_zero() {
        let result = Config::from_sources(None, vars(&[("INPUT_MAX-EXAMPLES", "0")]));

        assert!(result.is_err());
    }

    #[test]
    fn test_config_file_overridden_by_inputs() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "model = \"from-file\"\nsearch-model = \"search-from-file\"").unwrap();

        let config = Config::from_sources(Some(file.path()), vars(&[("INPUT_MODEL", "from-input")])).unwrap();

        assert_eq!(config.model, "from-input");
        assert_eq!(config.search_model, "search-from-file");
    }
}
