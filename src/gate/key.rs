//! Counter keys.
//!
//! A request is counted against a [`RouteKey`]. Which parts of the request
//! make up the key is decided by the [`KeyPolicy`] the gate was built with.

use std::fmt;
use std::str::FromStr;

use axum::http::Method;
use serde::{Deserialize, Serialize};

/// Which parts of a request identify its counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyPolicy {
    /// Count by path only. GET and POST on the same path share a counter.
    #[default]
    Path,
    /// Count by (path, method).
    PathAndMethod,
}

impl KeyPolicy {
    /// Build the counter key for a request under this policy.
    pub fn key_for(&self, route: &str, method: &Method) -> RouteKey {
        match self {
            KeyPolicy::Path => RouteKey {
                path: route.to_string(),
                method: None,
            },
            KeyPolicy::PathAndMethod => RouteKey {
                path: route.to_string(),
                method: Some(method.clone()),
            },
        }
    }
}

impl fmt::Display for KeyPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPolicy::Path => write!(f, "path"),
            KeyPolicy::PathAndMethod => write!(f, "path_and_method"),
        }
    }
}

impl FromStr for KeyPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "path" => Ok(KeyPolicy::Path),
            "path_and_method" => Ok(KeyPolicy::PathAndMethod),
            other => Err(format!(
                "unknown key policy '{}' (expected 'path' or 'path_and_method')",
                other
            )),
        }
    }
}

/// Identity of a request counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    path: String,
    method: Option<Method>,
}

impl RouteKey {
    pub fn path(&self) -> &str {
        &self.path
    }

    /// `None` when the key was built with [`KeyPolicy::Path`].
    pub fn method(&self) -> Option<&Method> {
        self.method.as_ref()
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.method {
            Some(method) => write!(f, "{} {}", method, self.path),
            None => write!(f, "{}", self.path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_policy_ignores_method() {
        let policy = KeyPolicy::Path;
        assert_eq!(
            policy.key_for("/app/status", &Method::GET),
            policy.key_for("/app/status", &Method::POST)
        );
        assert_eq!(policy.key_for("/app/status", &Method::GET).method(), None);
    }

    #[test]
    fn test_path_and_method_policy_splits_methods() {
        let policy = KeyPolicy::PathAndMethod;
        let get = policy.key_for("/app/status", &Method::GET);
        let post = policy.key_for("/app/status", &Method::POST);
        assert_ne!(get, post);
        assert_eq!(get.path(), "/app/status");
        assert_eq!(get.to_string(), "GET /app/status");
    }

    #[test]
    fn test_parse_policy() {
        assert_eq!("path".parse::<KeyPolicy>(), Ok(KeyPolicy::Path));
        assert_eq!(
            "path-and-method".parse::<KeyPolicy>(),
            Ok(KeyPolicy::PathAndMethod)
        );
        assert!("route".parse::<KeyPolicy>().is_err());
    }
}
