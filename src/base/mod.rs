//! Core components, types, and utilities for the issue-labeler.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling from action inputs.
//! - The error taxonomy of a labeling run.
//! - System prompts for the chat backend.
//! - Common types and result handling.

pub mod config;
pub mod error;
pub mod prompts;
pub mod types;
