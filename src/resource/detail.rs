//! Lookup results for cross-referenced details
//!
//! Every detail lookup the correlator performs (shape config, VNIC, subnet,
//! NSG, volume, attached instance) yields a [`Detail`]. Failures are kept as
//! values so one missing reference never costs the enclosing row.

use anyhow::Result;

/// Outcome of a single detail lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Detail<T> {
    /// The lookup succeeded
    Resolved(T),
    /// There is nothing to look up (no attachment, no reference)
    Missing,
    /// The lookup was attempted and failed
    Failed,
}

impl<T> Detail<T> {
    /// Absorb a provider result, logging the failure at debug level only
    pub fn from_result(result: Result<T>, what: &str) -> Self {
        match result {
            Ok(value) => Detail::Resolved(value),
            Err(e) => {
                tracing::debug!("{} lookup failed: {:#}", what, e);
                Detail::Failed
            }
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Detail<U> {
        match self {
            Detail::Resolved(v) => Detail::Resolved(f(v)),
            Detail::Missing => Detail::Missing,
            Detail::Failed => Detail::Failed,
        }
    }

    /// Chain a dependent lookup; an unresolved input short-circuits
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Detail<U>) -> Detail<U> {
        match self {
            Detail::Resolved(v) => f(v),
            Detail::Missing => Detail::Missing,
            Detail::Failed => Detail::Failed,
        }
    }
}

impl<T: ToString> Detail<T> {
    /// Render for display, `-` for anything unresolved
    pub fn display(&self) -> String {
        self.display_or("-", "-")
    }

    pub fn display_or(&self, missing: &str, failed: &str) -> String {
        match self {
            Detail::Resolved(v) => v.to_string(),
            Detail::Missing => missing.to_string(),
            Detail::Failed => failed.to_string(),
        }
    }
}
