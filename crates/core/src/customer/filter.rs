//! List filtering for the customer overview: free-text search plus status.

use serde::Deserialize;

use super::{Customer, CustomerStatus};

/// Optional narrowing of a customer listing. The default keeps every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CustomerFilter {
    /// Case-insensitive substring of name, company or email, or a raw
    /// substring of the phone number. Blank means no text filter.
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub status: Option<CustomerStatus>,
}

impl CustomerFilter {
    pub fn matches(&self, customer: &Customer) -> bool {
        if self.status.is_some_and(|status| status != customer.status) {
            return false;
        }

        let term = match self.q.as_deref().map(str::trim) {
            Some(term) if !term.is_empty() => term,
            _ => return true,
        };
        let needle = term.to_lowercase();
        let contains = |value: Option<&str>| {
            value.is_some_and(|v| v.to_lowercase().contains(&needle))
        };

        contains(Some(customer.name.as_str()))
            || contains(customer.company.as_deref())
            || contains(customer.email.as_deref())
            || customer.phone.as_deref().is_some_and(|p| p.contains(term))
    }
}
