//! Background job payloads.
//!
//! Jobs are plain serializable values; the dispatcher that carries them is
//! injected where needed rather than reached through a global handle.

use serde::{Deserialize, Serialize};

use crate::account::AccountId;

/// A unit of background work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Job {
    /// A new account was registered.
    AccountRegistered {
        account_id: AccountId,
        email: String,
        name: String,
    },
}

impl Job {
    /// Queue identifier used in logs.
    pub fn queue_id(&self) -> &'static str {
        match self {
            Job::AccountRegistered { .. } => "account_registered",
        }
    }
}
