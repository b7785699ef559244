//! Conversation engine, account logic and repository traits for chatbox.
//!
//! This crate defines the "ports" (repository, provider, hasher and job
//! traits) that chatbox-infra implements. It depends only on
//! `chatbox-types`, never on a database or HTTP crate.

pub mod account;
pub mod chat;
pub mod job;
pub mod llm;
pub mod validation;
