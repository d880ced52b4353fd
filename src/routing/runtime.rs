//! The published runtime configuration.
//!
//! # Responsibilities
//! - Store resolved routes in input order
//! - Look up the first route matching a request path and method
//! - Carry gateway-wide settings (administration path, service provider)
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan in input order; the first match wins
//! - A reload builds a new value; nothing here is edited in place

use std::sync::Arc;

use serde::Serialize;

use crate::routing::key::RouteKey;
use crate::routing::options::ServiceProviderConfiguration;
use crate::routing::route::ResolvedRoute;
use crate::routing::template::PathParam;

/// A route matched against a request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteMatch<'a> {
    pub route: &'a ResolvedRoute,
    pub params: Vec<PathParam>,
}

/// Immutable snapshot of every resolved route plus global settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuntimeConfiguration {
    routes: Vec<ResolvedRoute>,
    administration_path: Option<String>,
    service_provider: Arc<ServiceProviderConfiguration>,
}

impl RuntimeConfiguration {
    pub fn new(
        routes: Vec<ResolvedRoute>,
        administration_path: Option<String>,
        service_provider: Arc<ServiceProviderConfiguration>,
    ) -> Self {
        Self {
            routes,
            administration_path,
            service_provider,
        }
    }

    /// Routes in configuration order.
    pub fn routes(&self) -> &[ResolvedRoute] {
        &self.routes
    }

    pub fn administration_path(&self) -> Option<&str> {
        self.administration_path.as_deref()
    }

    pub fn service_provider(&self) -> &Arc<ServiceProviderConfiguration> {
        &self.service_provider
    }

    pub fn route_by_key(&self, key: &RouteKey) -> Option<&ResolvedRoute> {
        self.routes.iter().find(|r| r.route_key() == key)
    }

    /// First route, in configuration order, matching the path and method.
    pub fn find_route(&self, path: &str, method: &str) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|route| {
            if !route.accepts_method(method) {
                return None;
            }
            route
                .upstream_pattern()
                .captures(path)
                .map(|params| RouteMatch { route, params })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::key::derive_route_key;
    use crate::routing::route::{RouteBuilder, RouteEntry};
    use crate::routing::template::UpstreamPathPattern;

    fn route(template: &str, methods: &[&str], downstream: &str) -> ResolvedRoute {
        RouteBuilder::new(RouteEntry {
            downstream_path_template: downstream.to_string(),
            upstream_path_template: template.to_string(),
            upstream_pattern: UpstreamPathPattern::compile(template, false).unwrap(),
            upstream_methods: methods.iter().map(|m| m.to_string()).collect(),
            route_key: derive_route_key(template, methods),
        })
        .build()
    }

    fn provider() -> Arc<ServiceProviderConfiguration> {
        Arc::new(ServiceProviderConfiguration {
            provider: "consul".into(),
            host: "localhost".into(),
            port: 8500,
        })
    }

    #[test]
    fn test_first_match_wins() {
        let config = RuntimeConfiguration::new(
            vec![
                route("/users/me", &["GET"], "/profile"),
                route("/users/{id}", &["GET"], "/users/{id}"),
            ],
            None,
            provider(),
        );

        let matched = config.find_route("/users/me", "GET").unwrap();
        assert_eq!(matched.route.downstream_path_template(), "/profile");
        assert!(matched.params.is_empty());

        let matched = config.find_route("/users/7", "get").unwrap();
        assert_eq!(matched.route.downstream_path_template(), "/users/{id}");
        assert_eq!(matched.params[0].value, "7");
    }

    #[test]
    fn test_method_filter() {
        let config = RuntimeConfiguration::new(
            vec![route("/orders", &["POST"], "/orders")],
            Some("/administration".into()),
            provider(),
        );

        assert!(config.find_route("/orders", "GET").is_none());
        assert!(config.find_route("/orders", "POST").is_some());
        assert_eq!(config.administration_path(), Some("/administration"));
    }

    #[test]
    fn test_route_by_key() {
        let config = RuntimeConfiguration::new(
            vec![route("/a", &["GET"], "/a"), route("/b", &["GET"], "/b")],
            None,
            provider(),
        );

        let key = derive_route_key("/b", &["GET"]);
        assert_eq!(config.route_by_key(&key).unwrap().downstream_path_template(), "/b");
    }
}
