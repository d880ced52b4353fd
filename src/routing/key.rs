//! Route key derivation.
//!
//! The route key groups load-balancer and sticky-session state per logical
//! entry point. It is `<upstream template>|<methods joined by ",">`, methods in
//! the order given.
//!
//! Two routes with the same upstream template and methods but different
//! downstream targets produce the same key. Validation rejects such
//! duplicates; nothing here tries to disambiguate them.

use std::fmt;

use serde::Serialize;

/// Separates the template from the method list.
pub const KEY_DELIMITER: char = '|';

/// Separates methods inside the method list.
pub const METHOD_SEPARATOR: &str = ",";

/// Grouping key for a route's load-balancer and session state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RouteKey(String);

impl RouteKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RouteKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Derive the route key from an upstream template and its methods.
pub fn derive_route_key<S: AsRef<str>>(upstream_template: &str, methods: &[S]) -> RouteKey {
    let mut key = String::with_capacity(upstream_template.len() + 1 + methods.len() * 5);
    key.push_str(upstream_template);
    key.push(KEY_DELIMITER);
    for (i, method) in methods.iter().enumerate() {
        if i > 0 {
            key.push_str(METHOD_SEPARATOR);
        }
        key.push_str(method.as_ref());
    }
    RouteKey(key)
}
