//! Route table lookup.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up the matching route for a path
//! - Return matched route plus rewritten backend path, or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Routes ordered by prefix length, longest first, so the most specific
//!   prefix wins even if configuration lists it later
//! - O(n) prefix scan (acceptable for typical route counts)

use crate::config::{RewriteRule, RouteConfig};
use crate::routing::matcher::{rewrite, PathPrefixMatcher};

/// A compiled route.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    matcher: PathPrefixMatcher,
    prefix: String,
    authority: String,
    rewrite: RewriteRule,
}

impl Route {
    pub fn from_config(config: &RouteConfig) -> Self {
        Self {
            name: config.name.clone(),
            matcher: PathPrefixMatcher::new(config.path_prefix.clone()),
            prefix: config.path_prefix.clone(),
            authority: config.authority(),
            rewrite: config.rewrite.clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The prefix as configured.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Backend `host:port`.
    pub fn authority(&self) -> &str {
        &self.authority
    }
}

/// Result of a successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    /// Path to request on the backend.
    pub upstream_path: String,
}

/// Immutable route table.
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Compile the route table.
    pub fn from_config(configs: &[RouteConfig]) -> Self {
        let mut routes: Vec<Route> = configs.iter().map(Route::from_config).collect();
        // Stable sort keeps configuration order among equal lengths.
        routes.sort_by(|a, b| b.matcher.prefix().len().cmp(&a.matcher.prefix().len()));

        for route in &routes {
            tracing::debug!(
                route = %route.name,
                prefix = %route.prefix,
                backend = %route.authority,
                rewrite = ?route.rewrite,
                "Route compiled"
            );
        }

        Self { routes }
    }

    /// Find the route for `path` and rewrite it for the backend.
    pub fn match_path(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|route| {
            route.matcher.strip(path).map(|remainder| RouteMatch {
                route,
                upstream_path: rewrite(&route.rewrite, remainder),
            })
        })
    }

    /// Routes in match order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;

    fn route(name: &str, prefix: &str, rewrite: RewriteRule) -> RouteConfig {
        RouteConfig {
            name: name.into(),
            path_prefix: prefix.into(),
            host: "127.0.0.1".into(),
            port: 9000,
            rewrite,
        }
    }

    #[test]
    fn default_table_rewrites_to_service_base() {
        let router = Router::from_config(&GatewayConfig::default().routes);

        let matched = router.match_path("/api/users/abc").unwrap();
        assert_eq!(matched.route.name(), "users");
        assert_eq!(matched.route.authority(), "127.0.0.1:3001");
        assert_eq!(matched.upstream_path, "/users/abc");

        let matched = router.match_path("/api/products").unwrap();
        assert_eq!(matched.upstream_path, "/products");

        assert!(router.match_path("/api/orders").is_none());
        assert!(router.match_path("/health").is_none());
    }

    #[test]
    fn longest_prefix_wins() {
        let router = Router::from_config(&[
            route("api", "/api", RewriteRule::Strip),
            route("admin", "/api/admin", RewriteRule::Replace { with: "/".into() }),
        ]);

        let matched = router.match_path("/api/admin/stats").unwrap();
        assert_eq!(matched.route.name(), "admin");
        assert_eq!(matched.upstream_path, "/stats");

        let matched = router.match_path("/api/other").unwrap();
        assert_eq!(matched.route.name(), "api");
        assert_eq!(matched.upstream_path, "/other");
    }
}
