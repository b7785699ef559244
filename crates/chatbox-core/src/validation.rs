//! Request validation.
//!
//! Each validator collects every failing field instead of stopping at the
//! first, so clients can fix a form in one round trip.

use chatbox_types::account::{AccountUpdate, LoginRequest, RegisterRequest};
use chatbox_types::error::FieldError;

fn required(errors: &mut Vec<FieldError>, field: &str, value: &str) -> bool {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, format!("{field} is a required field")));
        false
    } else {
        true
    }
}

fn email(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if required(errors, field, value) && !is_valid_email(value) {
        errors.push(FieldError::new(
            field,
            format!("{field} must be a valid email address"),
        ));
    }
}

fn not_blank_if_set(errors: &mut Vec<FieldError>, field: &str, value: Option<&str>) {
    if let Some(value) = value {
        if value.trim().is_empty() {
            errors.push(FieldError::new(field, format!("{field} cannot be blank")));
        }
    }
}

/// A pragmatic address check: one `@`, a non-empty local part, and a
/// dotted domain without empty labels or whitespace.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

fn finish(errors: Vec<FieldError>) -> Result<(), Vec<FieldError>> {
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

pub fn validate_message(message: &str) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    required(&mut errors, "message", message);
    finish(errors)
}

pub fn validate_registration(req: &RegisterRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    required(&mut errors, "name", &req.name);
    email(&mut errors, "email", &req.email);
    required(&mut errors, "phone_number", &req.phone_number);
    required(&mut errors, "password", &req.password);
    required(&mut errors, "address", &req.address);
    finish(errors)
}

pub fn validate_login(req: &LoginRequest) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    email(&mut errors, "email", &req.email);
    required(&mut errors, "password", &req.password);
    finish(errors)
}

pub fn validate_update(update: &AccountUpdate) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();
    if update.is_empty() {
        errors.push(FieldError::new("body", "at least one field must be provided"));
    }
    not_blank_if_set(&mut errors, "name", update.name.as_deref());
    not_blank_if_set(&mut errors, "phone_number", update.phone_number.as_deref());
    not_blank_if_set(&mut errors, "address", update.address.as_deref());
    finish(errors)
}
