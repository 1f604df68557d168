//! Path prefix matching and rewriting.
//!
//! # Responsibilities
//! - Match a path prefix on a segment boundary (`/api/users` does not match
//!   `/api/usersx`)
//! - Produce the backend-relative path from the unmatched remainder
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A trailing slash in a configured prefix is ignored
//! - No regex to guarantee O(n) matching

use crate::config::RewriteRule;

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    /// The normalized prefix (no trailing slash; empty for `/`).
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The part of `path` after the prefix, if it matches.
    ///
    /// The remainder is either empty or starts with `/`.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        self.strip(path).is_some()
    }
}

/// Apply a rewrite rule to the remainder left after prefix matching.
pub fn rewrite(rule: &RewriteRule, remainder: &str) -> String {
    let base = match rule {
        RewriteRule::Strip => "",
        RewriteRule::Replace { with } => with.trim_end_matches('/'),
    };
    let path = format!("{}{}", base, remainder);
    if path.is_empty() {
        "/".to_string()
    } else {
        path
    }
}
