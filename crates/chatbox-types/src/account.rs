//! Account types.
//!
//! Accounts are referenced everywhere by [`AccountId`] only; the chat engine
//! never looks inside credentials.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Storage identifier of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of account.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (account_type IN ('CUSTOMER', 'ADMIN'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    Customer,
    Admin,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountType::Customer => write!(f, "CUSTOMER"),
            AccountType::Admin => write!(f, "ADMIN"),
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CUSTOMER" => Ok(AccountType::Customer),
            "ADMIN" => Ok(AccountType::Admin),
            other => Err(format!("invalid account type: '{other}'")),
        }
    }
}

impl Default for AccountType {
    fn default() -> Self {
        AccountType::Customer
    }
}

/// A registered account. The password hash is never part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub valid_until: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Premium while `valid_until` lies strictly after `today`.
    pub fn is_premium_on(&self, today: NaiveDate) -> bool {
        self.valid_until.is_some_and(|until| until > today)
    }
}

/// Registration input, already validated. `password_hash` is a PHC string.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub password_hash: String,
    pub account_type: AccountType,
}

/// Explicit set of mutable profile fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl AccountUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone_number.is_none() && self.address.is_none()
    }
}

/// A verified caller identity, produced by the authenticator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub account_id: AccountId,
    pub email: String,
    pub account_type: AccountType,
    pub is_premium: bool,
}

/// A bearer token issued at login. Only the digest is ever stored.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Persisted token record, keyed by digest.
///
/// Carries a snapshot of the identity claims taken at login, so
/// authentication does not need the account row to still exist.
#[derive(Debug, Clone)]
pub struct TokenRecord {
    pub token_hash: String,
    pub account_id: AccountId,
    pub email: String,
    pub account_type: AccountType,
    pub is_premium: bool,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenRecord {
    pub fn identity(&self) -> Identity {
        Identity {
            account_id: self.account_id,
            email: self.email.clone(),
            account_type: self.account_type,
            is_premium: self.is_premium,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Body of `POST /register`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub address: String,
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}
