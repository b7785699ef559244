//! Shared domain types for chatbox.
//!
//! This crate contains the core domain types used across the workspace:
//! accounts, conversations, turns, LLM request/response shapes, configuration,
//! job payloads, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod account;
pub mod chat;
pub mod config;
pub mod error;
pub mod job;
pub mod llm;
