//! GitHub Actions runner integration.
//!
//! Reads the runner context (repository, event payload, API URL, output file) and
//! writes workflow commands to stdout.

use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

use crate::base::types::{Issue, RepoId, Res, Void};

/// Default REST endpoint when the runner does not set `GITHUB_API_URL`.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// The parts of the triggering event payload that the labeler reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssueEvent {
    #[serde(default)]
    pub issue: Option<Issue>,
}

/// Runner context for a single invocation.
#[derive(Debug, Clone)]
pub struct ActionContext {
    /// Repository the workflow runs in (`GITHUB_REPOSITORY`).
    pub repository: Option<RepoId>,
    /// The triggering event (`GITHUB_EVENT_PATH`).
    pub event: IssueEvent,
    /// REST API base URL (`GITHUB_API_URL`).
    pub api_url: String,
    /// Step output file (`GITHUB_OUTPUT`).
    pub output_path: Option<PathBuf>,
}

impl ActionContext {
    /// Read the context from the process environment.
    pub fn from_env() -> Res<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Read the context from an explicit set of environment variables.
    ///
    /// A missing event path yields an event without an issue; a path that cannot be read or parsed is an error.
    pub fn from_vars(vars: impl IntoIterator<Item = (String, String)>) -> Res<Self> {
        let mut repository = None;
        let mut event_path = None;
        let mut api_url = None;
        let mut output_path = None;

        for (key, value) in vars {
            if value.is_empty() {
                continue;
            }

            match key.as_str() {
                "GITHUB_REPOSITORY" => repository = Some(value.parse::<RepoId>()?),
                "GITHUB_EVENT_PATH" => event_path = Some(PathBuf::from(value)),
                "GITHUB_API_URL" => api_url = Some(value),
                "GITHUB_OUTPUT" => output_path = Some(PathBuf::from(value)),
                _ => {}
            }
        }

        let event = match event_path {
            Some(path) => load_event(&path)?,
            None => IssueEvent::default(),
        };

        Ok(Self {
            repository,
            event,
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            output_path,
        })
    }
}

/// Parse the event payload at `path`.
pub fn load_event(path: &Path) -> Res<IssueEvent> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read event payload at `{}`", path.display()))?;
    let event = serde_json::from_str(&raw).with_context(|| format!("Failed to parse event payload at `{}`", path.display()))?;

    debug!("Loaded event payload from `{}`", path.display());

    Ok(event)
}

// Workflow commands.

/// Escape a workflow command message.
pub fn escape_data(message: &str) -> String {
    message.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

/// Format a workflow command line.
pub fn command(name: &str, message: &str) -> String {
    format!("::{name}::{}", escape_data(message))
}

/// Print `body` inside a collapsible log group.
pub fn group(title: &str, body: &str) {
    println!("{}", command("group", title));
    println!("{body}");
    println!("::endgroup::");
}

/// Emit a notice annotation.
pub fn notice(message: &str) {
    println!("{}", command("notice", message));
}

/// Emit an error annotation, which marks the step as failed once the process exits non-zero.
pub fn set_failed(message: &str) {
    println!("{}", command("error", message));
}

/// Append a step output to the runner's output file.
pub fn set_output(path: &Path, name: &str, value: &str) -> Void {
    let mut file = OpenOptions::new().create(true).append(true).open(path).with_context(|| format!("Failed to open output file `{}`", path.display()))?;

    if value.contains('\n') {
        let delimiter = "ISSUE_LABELER_EOF";
        writeln!(file, "{name}<<{delimiter}\n{value}\n{delimiter}")?;
    } else {
        writeln!(file, "{name}={value}")?;
    }

    Ok(())
}

// Tests.
