//! Shared fixtures for integration tests.

use std::path::PathBuf;

use gateway_routes::config::schema::{FileGlobalRateLimitOptions, FileRoute};
use gateway_routes::config::{FileConfiguration, FileGlobalConfiguration};

/// A valid route forwarding to `localhost:5000`.
pub fn route(upstream: &str, methods: &[&str]) -> FileRoute {
    FileRoute {
        downstream_path_template: upstream.to_string(),
        upstream_path_template: upstream.to_string(),
        upstream_http_methods: methods.iter().map(|m| m.to_string()).collect(),
        downstream_host: Some("localhost".into()),
        downstream_port: Some(5000),
        ..Default::default()
    }
}

/// Global settings with rate limiting enabled by default.
pub fn rate_limited_global() -> FileGlobalConfiguration {
    FileGlobalConfiguration {
        rate_limit: FileGlobalRateLimitOptions {
            enabled: Some(true),
            period: Some("1m".into()),
            limit: Some(100),
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn config(routes: Vec<FileRoute>, global: FileGlobalConfiguration) -> FileConfiguration {
    FileConfiguration { routes, global }
}

/// Write `content` to a per-test file under the system temp dir.
#[allow(dead_code)]
pub fn temp_config(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("gateway-routes-{}-{}", std::process::id(), name));
    std::fs::write(&path, content).unwrap();
    path
}
