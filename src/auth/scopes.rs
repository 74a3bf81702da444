//! OAuth scope handling.
//!
//! Provides the [`AuthScopes`] type for the permission scopes requested in
//! the authorization URL.

use crate::error::ConfigError;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Scopes requested when none are configured.
pub const DEFAULT_SCOPES: &str = "write_discounts";

/// A set of OAuth scopes requested from the platform.
///
/// Scopes are parsed from a comma-separated list, trimmed, and
/// deduplicated. `Display` renders them sorted and comma-joined, which is
/// the format the authorization endpoint expects in its `scope` parameter.
///
/// # Example
///
/// ```rust
/// use shopify_installer::AuthScopes;
///
/// let scopes: AuthScopes = "write_discounts, read_products".parse().unwrap();
/// assert_eq!(scopes.to_string(), "read_products,write_discounts");
/// assert!(scopes.contains("write_discounts"));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthScopes {
    scopes: BTreeSet<String>,
}

impl AuthScopes {
    /// Returns `true` if the scope set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Returns `true` if `scope` is part of this set.
    #[must_use]
    pub fn contains(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }

    /// Returns an iterator over the scopes in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.scopes.iter().map(String::as_str)
    }
}

impl Default for AuthScopes {
    fn default() -> Self {
        Self {
            scopes: BTreeSet::from([DEFAULT_SCOPES.to_string()]),
        }
    }
}

impl FromStr for AuthScopes {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut scopes = BTreeSet::new();

        for scope in s.split(',') {
            let scope = scope.trim();
            if scope.is_empty() {
                continue;
            }

            if !scope.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(ConfigError::InvalidScopes {
                    reason: format!("Invalid characters in scope: '{scope}'"),
                });
            }

            scopes.insert(scope.to_string());
        }

        if scopes.is_empty() {
            return Err(ConfigError::InvalidScopes {
                reason: "at least one scope is required".to_string(),
            });
        }

        Ok(Self { scopes })
    }
}

impl fmt::Display for AuthScopes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scopes: Vec<&str> = self.iter().collect();
        write!(f, "{}", scopes.join(","))
    }
}
