pub mod chat;
pub mod classifications;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::{
    config::{Backend, Config},
    types::{Classification, ClassificationRequest, Res},
};

// Traits.

/// Generic classifier trait that LLM clients must implement.
///
/// This trait defines the single model call of a labeling run: given the query, the
/// candidate labels, and the examples, pick a label. Implementing this trait allows
/// different LLM providers (or endpoints) to be used with the issue-labeler.
#[async_trait]
pub trait GenericClassifierClient: Send + Sync + 'static {
    /// Classify the query of `request` into one of its candidate labels.
    ///
    /// An empty label in the result means the model did not pick one.
    async fn classify(&self, request: &ClassificationRequest) -> Res<Classification>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericClassifierClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericClassifierClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericClassifierClient>) -> Self {
        Self { inner }
    }

    /// Create the OpenAI client for the configured backend.
    pub fn openai(config: &Config) -> Self {
        match config.backend {
            Backend::Classifications => Self::openai_classifications(config),
            Backend::Chat => Self::openai_chat(config),
        }
    }
}
