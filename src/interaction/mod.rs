//! The steps of a labeling run.
//!
//! This module provides the logic that sits between the services:
//! - Collecting training examples from the repository's issues and labels
//! - Validating the run, building the classification request, and applying the result

pub mod collect_examples;
pub mod label_issue;
