//! HTTP request handlers for the REST API.

pub mod account;
pub mod chatbox;
pub mod home;
