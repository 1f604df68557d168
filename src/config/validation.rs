//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid)
//! - Detect conflicting routes (duplicate names or prefixes)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{GatewayConfig, RewriteRule};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("api prefix '{0}' must start with '/'")]
    ApiPrefix(String),

    #[error("max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("route #{0} has an empty name")]
    EmptyRouteName(usize),

    #[error("duplicate route name '{0}'")]
    DuplicateRouteName(String),

    #[error("route '{route}': path prefix '{prefix}' must start with '/'")]
    RelativePrefix { route: String, prefix: String },

    #[error("route '{route}': path prefix '{prefix}' is already routed")]
    DuplicatePrefix { route: String, prefix: String },

    #[error("route '{0}': host is empty")]
    EmptyHost(String),

    #[error("route '{0}': port must be non-zero")]
    ZeroPort(String),

    #[error("route '{route}': rewrite target '{target}' must start with '/'")]
    RewriteTarget { route: String, target: String },

    #[error("timeout '{0}' must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if !config.pipeline.api_prefix.starts_with('/') {
        errors.push(ValidationError::ApiPrefix(config.pipeline.api_prefix.clone()));
    }
    if config.pipeline.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    let mut names = HashSet::new();
    let mut prefixes = HashSet::new();
    for (index, route) in config.routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyRouteName(index));
        } else if !names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateRouteName(route.name.clone()));
        }

        if !route.path_prefix.starts_with('/') {
            errors.push(ValidationError::RelativePrefix {
                route: route.name.clone(),
                prefix: route.path_prefix.clone(),
            });
        }
        // "/api/users" and "/api/users/" route the same requests.
        let normalized = route.path_prefix.trim_end_matches('/');
        if !prefixes.insert(normalized.to_string()) {
            errors.push(ValidationError::DuplicatePrefix {
                route: route.name.clone(),
                prefix: route.path_prefix.clone(),
            });
        }

        if route.host.trim().is_empty() {
            errors.push(ValidationError::EmptyHost(route.name.clone()));
        }
        if route.port == 0 {
            errors.push(ValidationError::ZeroPort(route.name.clone()));
        }
        if let RewriteRule::Replace { with } = &route.rewrite {
            if !with.starts_with('/') {
                errors.push(ValidationError::RewriteTarget {
                    route: route.name.clone(),
                    target: with.clone(),
                });
            }
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.timeouts.idle_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("idle_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
