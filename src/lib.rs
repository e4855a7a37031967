//! Library root for `issue-labeler`.
//!
//! Issue-labeler is a GitHub Action that labels new issues with OpenAI:
//! - Collects training examples from the repository's labeled issues and label descriptions
//! - Asks a model to pick one of the repository's labels for the triggering issue
//! - Adds the picked label to the issue
//!
//! The action integrates with GitHub for issues and labels, and OpenAI for
//! classification. The architecture is built around traits that allow for
//! different implementations of each service.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, error::LabelerError};
use interaction::label_issue::{self, Labeled};
use rustls::crypto;
use service::action::{self, ActionContext};
use tracing::{info, warn};

/// Install the process-wide TLS crypto provider, if none is installed yet.
pub fn install_crypto_provider() {
    let _ = crypto::ring::default_provider().install_default();
}

/// Public async entry for the binary crate.
///
/// Runs a single labeling pass:
/// - Validates the inputs and runner context
/// - Creates the runtime with the GitHub and LLM clients
/// - Labels the triggering issue and records the `label` step output
pub async fn start(config: Config, context: ActionContext) -> Result<Labeled, LabelerError> {
    info!("Starting issue-labeler ...");

    // Check inputs before touching any service.
    let target = label_issue::validate(&config, &context)?;

    // Start the crypto provider.
    install_crypto_provider();

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config, &context)?;

    // Label the issue.
    let labeled = runtime.label(&target).await?;

    if let Some(path) = &context.output_path {
        if let Err(err) = action::set_output(path, "label", &labeled.label) {
            warn!("Failed to write the `label` output: {err:#}");
        }
    }

    Ok(labeled)
}
