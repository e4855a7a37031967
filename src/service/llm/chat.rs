//! Classification through OpenAI chat completions.
//!
//! The examples and candidate labels are rendered into the prompt and the reply is
//! matched back onto a candidate label.

use std::{fmt::Write, sync::Arc, time::Duration};

use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use tracing::{debug, instrument, warn};

use crate::base::{
    config::Config,
    types::{Classification, ClassificationRequest, Res},
};

use super::{GenericClassifierClient, LlmClient};

// Extra methods on `LlmClient` applied by the chat implementation.

impl LlmClient {
    pub fn openai_chat(config: &Config) -> Self {
        let client = OpenAiChatClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI chat completions client implementation.
#[derive(Clone)]
pub struct OpenAiChatClient {
    client: Client<OpenAIConfig>,
    system_directive: String,
}

impl OpenAiChatClient {
    /// Create a new OpenAI chat client.
    #[instrument(name = "OpenAiChatClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let cfg = OpenAIConfig::new().with_api_key(config.openai_api_key.clone()).with_api_base(config.openai_api_base.clone());

        // Zero elapsed budget: rate-limited requests are not resent.
        let backoff = ExponentialBackoffBuilder::new().with_max_elapsed_time(Some(Duration::ZERO)).build();

        Self {
            client: Client::with_config(cfg).with_backoff(backoff),
            system_directive: config.system_directive.clone(),
        }
    }
}

#[async_trait]
impl GenericClassifierClient for OpenAiChatClient {
    #[instrument(name = "OpenAiChatClient::classify", skip_all, fields(model = %request.model, examples = request.examples.len()))]
    async fn classify(&self, request: &ClassificationRequest) -> Res<Classification> {
        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default().content(self.system_directive.clone()).build()?.into(),
            ChatCompletionRequestUserMessageArgs::default().content(build_chat_prompt(request)).build()?.into(),
        ];

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&request.model)
            .messages(messages)
            .temperature(request.temperature)
            .build()?;

        let response = self.client.chat().create(chat_request).await?;
        let content = response.choices.first().and_then(|choice| choice.message.content.clone()).unwrap_or_default();

        debug!("Model replied `{content}`");

        if content.trim().is_empty() {
            warn!("Model returned an empty reply.");
            return Ok(Classification { label: String::new() });
        }

        let label = match_candidate(&content, &request.labels).ok_or_else(|| anyhow::anyhow!("Model replied `{}`, which is not one of the candidate labels.", content.trim()))?;

        Ok(Classification { label: label.to_string() })
    }
}

// Helpers.

/// Render the user prompt: candidate labels, up to `max_examples` examples, then the issue.
///
/// When there are more examples than that, the last ones are kept. Label-description
/// examples come after the issue examples, so they are never the ones cut.
pub fn build_chat_prompt(request: &ClassificationRequest) -> String {
    let mut prompt = String::from("## Candidate Labels\n\n");

    for label in &request.labels {
        let _ = writeln!(prompt, "- {label}");
    }

    prompt.push_str("\n## Examples\n\n");

    let skip = request.examples.len().saturating_sub(request.max_examples as usize);

    for example in request.examples.iter().skip(skip) {
        let _ = writeln!(prompt, "Text: {}\nLabel: {}\n", example.text, example.label);
    }

    let _ = write!(prompt, "## Issue\n\n{}\n", request.query);

    prompt
}

/// Match a model reply onto a candidate label, ignoring case, surrounding whitespace, quotes, and a trailing period.
pub fn match_candidate<'a>(reply: &str, candidates: &'a [String]) -> Option<&'a str> {
    let reply = reply.trim().trim_matches(|c| c == '"' || c == '\'' || c == '`').trim_end_matches('.').trim().to_lowercase();

    candidates.iter().find(|c| c.to_lowercase() == reply).map(String::as_str)
}

// Tests.
