//! The resolved route and its staged builder.
//!
//! # Design Decisions
//! - `RouteBuilder::new` takes every mandatory field, so a route without a
//!   downstream path, upstream template/matcher, methods or route key cannot
//!   be written down
//! - Optional blocks default to "disabled" and are set with `with_*`
//! - `build` is infallible and `ResolvedRoute` has no setters

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;

use crate::routing::key::RouteKey;
use crate::routing::options::{
    AuthenticationOptions, CacheOptions, ClaimToThing, HttpHandlerOptions, LoadBalancerKind,
    QosOptions, RateLimitOptions, ServiceProviderConfiguration,
};
use crate::routing::template::UpstreamPathPattern;

/// Mandatory fields of a route.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub downstream_path_template: String,
    pub upstream_path_template: String,
    pub upstream_pattern: UpstreamPathPattern,
    pub upstream_methods: Vec<String>,
    pub route_key: RouteKey,
}

/// Where requests are forwarded to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Downstream {
    pub scheme: String,
    pub host: Option<String>,
    pub port: Option<u16>,
}

impl Default for Downstream {
    fn default() -> Self {
        Self {
            scheme: "http".to_string(),
            host: None,
            port: None,
        }
    }
}

/// Claims copied onto the outgoing request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClaimsTransforms {
    pub to_headers: Vec<ClaimToThing>,
    pub to_claims: Vec<ClaimToThing>,
    pub to_queries: Vec<ClaimToThing>,
}

/// A fully resolved, immutable route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedRoute {
    downstream_path_template: String,
    upstream_path_template: String,
    upstream_pattern: UpstreamPathPattern,
    upstream_methods: Vec<String>,
    route_key: RouteKey,
    authentication: Option<AuthenticationOptions>,
    claims: ClaimsTransforms,
    route_claims_requirement: BTreeMap<String, String>,
    is_authorised: bool,
    request_id_key: Option<String>,
    cache: Option<CacheOptions>,
    downstream: Downstream,
    load_balancer: LoadBalancerKind,
    qos: Option<QosOptions>,
    rate_limit: Option<RateLimitOptions>,
    http_handler: HttpHandlerOptions,
    service_name: Option<String>,
    service_provider: Option<Arc<ServiceProviderConfiguration>>,
}

impl ResolvedRoute {
    pub fn builder(entry: RouteEntry) -> RouteBuilder {
        RouteBuilder::new(entry)
    }

    pub fn downstream_path_template(&self) -> &str {
        &self.downstream_path_template
    }

    pub fn upstream_path_template(&self) -> &str {
        &self.upstream_path_template
    }

    pub fn upstream_pattern(&self) -> &UpstreamPathPattern {
        &self.upstream_pattern
    }

    /// Upstream methods, case as configured. Empty means any method.
    pub fn upstream_methods(&self) -> &[String] {
        &self.upstream_methods
    }

    pub fn route_key(&self) -> &RouteKey {
        &self.route_key
    }

    pub fn is_authenticated(&self) -> bool {
        self.authentication.is_some()
    }

    pub fn authentication(&self) -> Option<&AuthenticationOptions> {
        self.authentication.as_ref()
    }

    pub fn claims_to_headers(&self) -> &[ClaimToThing] {
        &self.claims.to_headers
    }

    pub fn claims_to_claims(&self) -> &[ClaimToThing] {
        &self.claims.to_claims
    }

    pub fn claims_to_queries(&self) -> &[ClaimToThing] {
        &self.claims.to_queries
    }

    pub fn route_claims_requirement(&self) -> &BTreeMap<String, String> {
        &self.route_claims_requirement
    }

    pub fn is_authorised(&self) -> bool {
        self.is_authorised
    }

    pub fn request_id_key(&self) -> Option<&str> {
        self.request_id_key.as_deref()
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    pub fn cache(&self) -> Option<&CacheOptions> {
        self.cache.as_ref()
    }

    pub fn downstream(&self) -> &Downstream {
        &self.downstream
    }

    pub fn downstream_scheme(&self) -> &str {
        &self.downstream.scheme
    }

    pub fn downstream_host(&self) -> Option<&str> {
        self.downstream.host.as_deref()
    }

    pub fn downstream_port(&self) -> Option<u16> {
        self.downstream.port
    }

    pub fn load_balancer(&self) -> LoadBalancerKind {
        self.load_balancer
    }

    pub fn is_qos(&self) -> bool {
        self.qos.is_some()
    }

    pub fn qos(&self) -> Option<&QosOptions> {
        self.qos.as_ref()
    }

    pub fn enable_rate_limiting(&self) -> bool {
        self.rate_limit.is_some()
    }

    pub fn rate_limit(&self) -> Option<&RateLimitOptions> {
        self.rate_limit.as_ref()
    }

    pub fn http_handler(&self) -> HttpHandlerOptions {
        self.http_handler
    }

    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    pub fn use_service_discovery(&self) -> bool {
        self.service_provider.is_some()
    }

    /// The snapshot-wide provider, present only when the route uses discovery.
    pub fn service_provider(&self) -> Option<&Arc<ServiceProviderConfiguration>> {
        self.service_provider.as_ref()
    }

    /// Returns true if the route accepts this method (case-insensitive).
    pub fn accepts_method(&self, method: &str) -> bool {
        self.upstream_methods.is_empty()
            || self
                .upstream_methods
                .iter()
                .any(|m| m.eq_ignore_ascii_case(method))
    }
}

/// Staged builder for [`ResolvedRoute`].
///
/// Each capability is expressed by the presence of its option block, so a
/// flag and its options cannot disagree.
#[derive(Debug, Clone)]
pub struct RouteBuilder {
    route: ResolvedRoute,
}

impl RouteBuilder {
    pub fn new(entry: RouteEntry) -> Self {
        Self {
            route: ResolvedRoute {
                downstream_path_template: entry.downstream_path_template,
                upstream_path_template: entry.upstream_path_template,
                upstream_pattern: entry.upstream_pattern,
                upstream_methods: entry.upstream_methods,
                route_key: entry.route_key,
                authentication: None,
                claims: ClaimsTransforms::default(),
                route_claims_requirement: BTreeMap::new(),
                is_authorised: false,
                request_id_key: None,
                cache: None,
                downstream: Downstream::default(),
                load_balancer: LoadBalancerKind::default(),
                qos: None,
                rate_limit: None,
                http_handler: HttpHandlerOptions::default(),
                service_name: None,
                service_provider: None,
            },
        }
    }

    /// Authentication options; `None` leaves the route unauthenticated.
    pub fn with_authentication(mut self, options: Option<AuthenticationOptions>) -> Self {
        self.route.authentication = options;
        self
    }

    pub fn with_claims(mut self, claims: ClaimsTransforms) -> Self {
        self.route.claims = claims;
        self
    }

    pub fn with_authorisation(
        mut self,
        is_authorised: bool,
        requirement: BTreeMap<String, String>,
    ) -> Self {
        self.route.is_authorised = is_authorised;
        self.route.route_claims_requirement = requirement;
        self
    }

    pub fn with_request_id_key(mut self, key: Option<String>) -> Self {
        self.route.request_id_key = key;
        self
    }

    pub fn with_cache(mut self, cache: Option<CacheOptions>) -> Self {
        self.route.cache = cache;
        self
    }

    pub fn with_downstream(mut self, downstream: Downstream) -> Self {
        self.route.downstream = downstream;
        self
    }

    pub fn with_load_balancer(mut self, kind: LoadBalancerKind) -> Self {
        self.route.load_balancer = kind;
        self
    }

    pub fn with_qos(mut self, qos: Option<QosOptions>) -> Self {
        self.route.qos = qos;
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: Option<RateLimitOptions>) -> Self {
        self.route.rate_limit = rate_limit;
        self
    }

    pub fn with_http_handler(mut self, options: HttpHandlerOptions) -> Self {
        self.route.http_handler = options;
        self
    }

    pub fn with_service(
        mut self,
        service_name: Option<String>,
        provider: Option<Arc<ServiceProviderConfiguration>>,
    ) -> Self {
        self.route.service_name = service_name;
        self.route.service_provider = provider;
        self
    }

    pub fn build(self) -> ResolvedRoute {
        self.route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::key::derive_route_key;

    fn entry(template: &str, methods: &[&str]) -> RouteEntry {
        RouteEntry {
            downstream_path_template: "/api".to_string(),
            upstream_path_template: template.to_string(),
            upstream_pattern: UpstreamPathPattern::compile(template, false).unwrap(),
            upstream_methods: methods.iter().map(|m| m.to_string()).collect(),
            route_key: derive_route_key(template, methods),
        }
    }

    #[test]
    fn test_defaults_are_disabled() {
        let route = RouteBuilder::new(entry("/users", &["GET"])).build();

        assert_eq!(route.route_key().as_str(), "/users|GET");
        assert!(!route.is_authenticated());
        assert!(!route.is_authorised());
        assert!(!route.is_cached());
        assert!(!route.is_qos());
        assert!(!route.enable_rate_limiting());
        assert!(!route.use_service_discovery());
        assert_eq!(route.downstream_scheme(), "http");
        assert_eq!(route.load_balancer(), LoadBalancerKind::NoLoadBalancer);
        assert_eq!(route.http_handler(), HttpHandlerOptions::default());
    }

    #[test]
    fn test_options_set_flags() {
        let provider = Arc::new(ServiceProviderConfiguration {
            provider: "consul".into(),
            host: "localhost".into(),
            port: 8500,
        });
        let route = ResolvedRoute::builder(entry("/users", &["GET"]))
            .with_cache(Some(CacheOptions { ttl_seconds: 30, region: "GETusers".into() }))
            .with_qos(Some(QosOptions::default()))
            .with_service(Some("users".into()), Some(provider.clone()))
            .build();

        assert!(route.is_cached());
        assert!(route.is_qos());
        assert!(route.use_service_discovery());
        assert!(Arc::ptr_eq(route.service_provider().unwrap(), &provider));
    }

    #[test]
    fn test_accepts_method() {
        let route = RouteBuilder::new(entry("/users", &["Get", "POST"])).build();
        assert!(route.accepts_method("GET"));
        assert!(route.accepts_method("post"));
        assert!(!route.accepts_method("DELETE"));

        let any = RouteBuilder::new(entry("/users", &[])).build();
        assert!(any.accepts_method("DELETE"));
    }
}
