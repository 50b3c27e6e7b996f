//! Candidate validation applied before registration.
//!
//! Mirrors the checks of the add-customer form. Validation never rewrites
//! values; matching stays exact on what was submitted.

use std::sync::LazyLock;

use regex::Regex;

use super::NewCustomer;
use crate::error::CoreError;

/// 7 to 15 ASCII digits once separators are removed.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{7,15}$").expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid regex"));

/// Validate a candidate before it is registered.
///
/// Rules:
/// - `name` must not be blank.
/// - `phone`, if present and non-empty, must be 7-15 digits after removing
///   `-` and whitespace.
/// - `email`, if present and non-empty, must look like `x@y.z`.
pub fn validate_new_customer(candidate: &NewCustomer) -> Result<(), CoreError> {
    if candidate.name.trim().is_empty() {
        return Err(CoreError::Validation("姓名不能为空".into()));
    }

    if let Some(phone) = candidate.phone.as_deref().filter(|p| !p.is_empty()) {
        let digits: String = phone
            .chars()
            .filter(|c| *c != '-' && !c.is_whitespace())
            .collect();
        if !PHONE_RE.is_match(&digits) {
            return Err(CoreError::Validation("请输入有效的电话号码".into()));
        }
    }

    if let Some(email) = candidate.email.as_deref().filter(|e| !e.is_empty()) {
        if !EMAIL_RE.is_match(email) {
            return Err(CoreError::Validation("请输入有效的邮箱地址".into()));
        }
    }

    Ok(())
}
