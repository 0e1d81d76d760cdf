//! Validated DNS domain names.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::stack::StackError;

/// A fully qualified domain name without trailing dot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DomainName(String);

impl DomainName {
    /// Parse a domain name, rejecting empty input, leading/trailing dots
    /// and empty labels.
    pub fn parse(name: impl Into<String>) -> Result<Self, StackError> {
        let name = name.into();
        if name.is_empty() {
            return Err(StackError::InvalidDomain(
                "domain name cannot be empty".to_string(),
            ));
        }
        if name.split('.').any(str::is_empty) {
            return Err(StackError::InvalidDomain(format!(
                "domain name '{name}' contains an empty label"
            )));
        }
        Ok(Self(name))
    }

    /// Derive `label + "." + parent` exactly once. The label must be a
    /// single DNS label (no dots).
    pub fn subdomain(label: &str, parent: &str) -> Result<Self, StackError> {
        if label.is_empty() {
            return Err(StackError::InvalidDomain(
                "subdomain label cannot be empty".to_string(),
            ));
        }
        if label.contains('.') {
            return Err(StackError::InvalidDomain(format!(
                "subdomain label '{label}' must not contain dots"
            )));
        }
        Self::parse(format!("{label}.{parent}"))
    }

    /// Prefix this domain with one more label (`api`, `kinesis`, ...).
    pub fn child(&self, label: &str) -> Result<Self, StackError> {
        Self::subdomain(label, &self.0)
    }

    /// The wildcard pattern covering this domain's direct subdomains.
    pub fn wildcard(&self) -> String {
        format!("*.{}", self.0)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whether a certificate for `primary` with `alternative_names` covers
/// `domain`. A wildcard `*.x.y` covers exactly one extra label deep.
pub fn certificate_covers(primary: &str, alternative_names: &[String], domain: &str) -> bool {
    if domain == primary {
        return true;
    }
    alternative_names.iter().any(|name| {
        if name == domain {
            return true;
        }
        match name.strip_prefix("*.") {
            Some(base) => domain
                .strip_suffix(base)
                .and_then(|head| head.strip_suffix('.'))
                .is_some_and(|label| !label.is_empty() && !label.contains('.')),
            None => false,
        }
    })
}
