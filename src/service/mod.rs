//! Service integrations for external APIs and the action runner.
//!
//! This module contains implementations for the services used by the issue-labeler:
//! - Source-control services (e.g., GitHub via octocrab)
//! - LLM services (e.g., OpenAI)
//! - The GitHub Actions runner (inputs, event payload, workflow commands)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod action;
pub mod github;
pub mod llm;
