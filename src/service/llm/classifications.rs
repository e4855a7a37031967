//! Client for the OpenAI `/classifications` endpoint.
//!
//! `async-openai` has no binding for this endpoint, so the request is sent with
//! `reqwest` while `async-openai` supplies the base URL and auth headers.

use std::sync::Arc;

use async_openai::config::{Config as _, OpenAIConfig};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::base::{
    config::Config,
    types::{Classification, ClassificationRequest, Res},
};

use super::{GenericClassifierClient, LlmClient};

// Extra methods on `LlmClient` applied by the classifications implementation.

impl LlmClient {
    pub fn openai_classifications(config: &Config) -> Self {
        let client = OpenAiClassificationsClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Structs.

/// Error body returned by the OpenAI API.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ApiErrorMessage {
    message: String,
}

/// OpenAI classifications client implementation.
#[derive(Clone)]
pub struct OpenAiClassificationsClient {
    http: reqwest::Client,
    openai: OpenAIConfig,
}

impl OpenAiClassificationsClient {
    /// Create a new OpenAI classifications client.
    #[instrument(name = "OpenAiClassificationsClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let openai = OpenAIConfig::new().with_api_key(config.openai_api_key.clone()).with_api_base(config.openai_api_base.clone());

        Self {
            http: reqwest::Client::new(),
            openai,
        }
    }
}

#[async_trait]
impl GenericClassifierClient for OpenAiClassificationsClient {
    #[instrument(name = "OpenAiClassificationsClient::classify", skip_all, fields(model = %request.model, examples = request.examples.len()))]
    async fn classify(&self, request: &ClassificationRequest) -> Res<Classification> {
        let response = self.http.post(self.openai.url("/classifications")).headers(self.openai.headers()).json(request).send().await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body).map(|b| b.error.message).unwrap_or(body);

            return Err(anyhow::anyhow!("OpenAI classifications API returned {status}: {message}"));
        }

        let classification: Classification = response.json().await?;

        debug!("Model picked label `{}`", classification.label);

        Ok(classification)
    }
}
