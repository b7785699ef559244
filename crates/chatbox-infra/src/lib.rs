//! Infrastructure layer for chatbox.
//!
//! Implements the ports defined in `chatbox-core`: SQLite repositories,
//! the OpenAI-compatible completion provider, Argon2/SHA-256 credential
//! hashing, TOML configuration loading, and the in-process job queue.

pub mod config;
pub mod crypto;
pub mod job;
pub mod llm;
pub mod sqlite;
