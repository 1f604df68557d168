//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the API gateway.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Request pipeline settings (API prefix, body ceiling).
    pub pipeline: PipelineConfig,

    /// Route table mapping path prefixes to backend services.
    pub routes: Vec<RouteConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            pipeline: PipelineConfig::default(),
            routes: default_routes(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// The users and products services on their conventional local ports.
fn default_routes() -> Vec<RouteConfig> {
    vec![
        RouteConfig {
            name: "users".to_string(),
            path_prefix: "/api/users".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3001,
            rewrite: RewriteRule::Replace {
                with: "/users".to_string(),
            },
        },
        RouteConfig {
            name: "products".to_string(),
            path_prefix: "/api/products".to_string(),
            host: "127.0.0.1".to_string(),
            port: 3002,
            rewrite: RewriteRule::Replace {
                with: "/products".to_string(),
            },
        },
    ]
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

impl ListenerConfig {
    /// Replace the port of the bind address, keeping the host part.
    pub fn set_port(&mut self, port: u16) {
        let host = match self.bind_address.rsplit_once(':') {
            Some((host, _)) => host.to_string(),
            None => self.bind_address.clone(),
        };
        self.bind_address = format!("{}:{}", host, port);
    }
}

/// Request pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Paths under this prefix get their JSON bodies captured.
    pub api_prefix: String,

    /// Maximum captured body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            api_prefix: "/api".to_string(),
            max_body_bytes: 2 * 1024 * 1024, // 2 MiB
        }
    }
}

/// A single route: path prefix to backend target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics and the root listing.
    pub name: String,

    /// Path prefix to match, on a segment boundary.
    pub path_prefix: String,

    /// Backend host.
    pub host: String,

    /// Backend port.
    pub port: u16,

    /// How the matched prefix is rewritten before forwarding.
    #[serde(default)]
    pub rewrite: RewriteRule,
}

impl RouteConfig {
    /// The `host:port` authority of the backend.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Path rewrite rule applied to the matched prefix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RewriteRule {
    /// Remove the prefix; the backend sees the remainder (or `/`).
    #[default]
    Strip,

    /// Replace the prefix with the backend's own base path.
    Replace { with: String },
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Backend connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Idle pooled connection timeout in seconds.
    pub idle_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
            idle_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_route_users_and_products() {
        let config = GatewayConfig::default();
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].authority(), "127.0.0.1:3001");
        assert_eq!(config.routes[1].path_prefix, "/api/products");
        assert_eq!(config.pipeline.max_body_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn parses_partial_toml() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:8000"

            [[routes]]
            name = "orders"
            path_prefix = "/api/orders"
            host = "10.0.0.5"
            port = 4000
            rewrite = { type = "replace", with = "/orders" }

            [[routes]]
            name = "raw"
            path_prefix = "/api/raw"
            host = "10.0.0.6"
            port = 4001
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:8000");
        assert_eq!(config.routes.len(), 2);
        assert_eq!(
            config.routes[0].rewrite,
            RewriteRule::Replace { with: "/orders".into() }
        );
        assert_eq!(config.routes[1].rewrite, RewriteRule::Strip);
        assert_eq!(config.timeouts.connect_secs, 5);
    }

    #[test]
    fn set_port_keeps_host() {
        let mut listener = ListenerConfig::default();
        listener.set_port(8088);
        assert_eq!(listener.bind_address, "0.0.0.0:8088");
    }
}
