//! Configuration schema definitions.
//!
//! This module defines the raw, file-sourced configuration: gateway-wide
//! defaults plus the ordered list of route entries. All types derive Serde
//! traits for deserialization from TOML or JSON files.
//!
//! Nothing here is trusted. Values only reach the runtime model after
//! `validation` accepted the whole file and `resolve` applied the defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root of a route configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileConfiguration {
    /// Route entries. Order is significant: it becomes matching precedence.
    pub routes: Vec<FileRoute>,

    /// Gateway-wide defaults.
    pub global: FileGlobalConfiguration,
}

/// Gateway-wide defaults and settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileGlobalConfiguration {
    /// Path prefix reserved for the administration API (e.g. "/administration").
    pub administration_path: Option<String>,

    /// Default header carrying the request id.
    pub request_id_key: Option<String>,

    /// Default rate-limit policy.
    pub rate_limit: FileGlobalRateLimitOptions,

    /// Default QoS policy.
    pub qos: FileQosOptions,

    /// Service discovery provider shared by every route using discovery.
    pub service_discovery: FileServiceDiscoveryProvider,

    /// Default HTTP handler behavior.
    pub http_handler: FileHttpHandlerOptions,
}

/// Global rate-limit defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileGlobalRateLimitOptions {
    /// Rate limiting for routes that do not say otherwise.
    pub enabled: Option<bool>,

    /// Header identifying the client (default: "ClientId").
    pub client_id_header: Option<String>,

    /// Body returned when the quota is exceeded.
    pub quota_exceeded_message: Option<String>,

    /// Prefix for counter keys in the rate-limit store.
    pub rate_limit_counter_prefix: Option<String>,

    /// Suppress the X-Rate-Limit-* response headers.
    pub disable_rate_limit_headers: Option<bool>,

    /// Status code returned when the quota is exceeded (default: 429).
    pub http_status_code: Option<u16>,

    /// Default counting window ("1s", "5m", "1h", "1d").
    pub period: Option<String>,

    /// Seconds a client must wait after exceeding the quota.
    pub period_timespan_secs: Option<f64>,

    /// Default number of requests allowed per period.
    pub limit: Option<u64>,
}

/// QoS settings. Used both per route and as the global default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileQosOptions {
    /// Explicit on/off. When unset, QoS is on if threshold and timeout are both set.
    pub enabled: Option<bool>,

    /// Failures tolerated before the circuit opens.
    pub exceptions_allowed_before_breaking: Option<u32>,

    /// How long the circuit stays open, in milliseconds.
    pub duration_of_break_ms: Option<u64>,

    /// Downstream call timeout, in milliseconds.
    pub timeout_ms: Option<u64>,
}

/// Service discovery provider settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileServiceDiscoveryProvider {
    /// Provider type (default: "consul").
    pub provider: Option<String>,

    /// Provider host (default: "localhost").
    pub host: Option<String>,

    /// Provider port (default: 8500).
    pub port: Option<u16>,
}

/// HTTP handler behavior for calls to the downstream.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileHttpHandlerOptions {
    /// Follow downstream redirects.
    pub allow_auto_redirect: Option<bool>,

    /// Keep a cookie container per downstream connection.
    pub use_cookie_container: Option<bool>,
}

/// One declarative route entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileRoute {
    /// Path template on the backend (e.g. "/api/users/{id}").
    pub downstream_path_template: String,

    /// Client-facing path template (e.g. "/users/{id}").
    pub upstream_path_template: String,

    /// Client-facing methods, case as given. Empty means any method.
    pub upstream_http_methods: Vec<String>,

    /// Backend scheme (default: "http").
    pub downstream_scheme: Option<String>,

    /// Backend host. Not needed with service discovery.
    pub downstream_host: Option<String>,

    /// Backend port. Not needed with service discovery.
    pub downstream_port: Option<u16>,

    /// Authentication block. A non-empty provider turns authentication on.
    pub authentication: Option<FileAuthenticationOptions>,

    /// Claims copied into request headers: header name -> instruction.
    pub add_headers_to_request: BTreeMap<String, String>,

    /// Claims copied into other claims: claim name -> instruction.
    pub add_claims_to_request: BTreeMap<String, String>,

    /// Claims copied into query parameters: parameter name -> instruction.
    pub add_queries_to_request: BTreeMap<String, String>,

    /// Claims the caller must hold. Non-empty turns authorisation on.
    pub route_claims_requirement: BTreeMap<String, String>,

    /// Header carrying the request id for this route.
    pub request_id_key: Option<String>,

    /// Response caching.
    pub cache: FileCacheOptions,

    /// Match the upstream template case-sensitively.
    pub route_is_case_sensitive: bool,

    /// QoS overrides.
    pub qos: FileQosOptions,

    /// Rate-limit overrides.
    pub rate_limit: FileRateLimitRule,

    /// HTTP handler overrides.
    pub http_handler: FileHttpHandlerOptions,

    /// Load balancer name ("RoundRobin", "LeastConnection", "NoLoadBalancer").
    pub load_balancer: Option<String>,

    /// Service name looked up through service discovery.
    pub service_name: Option<String>,

    /// Resolve the downstream through service discovery.
    pub use_service_discovery: bool,
}

/// Authentication settings for a route.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileAuthenticationOptions {
    /// Provider name ("IdentityServer" or "Jwt").
    pub provider: String,

    pub provider_root_url: Option<String>,
    pub api_name: Option<String>,
    pub api_secret: Option<String>,
    pub require_https: bool,
    pub allowed_scopes: Vec<String>,

    /// Required when the provider is "Jwt".
    pub jwt: Option<FileJwtConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileJwtConfig {
    pub authority: String,
    pub audience: Option<String>,
}

/// Response cache settings for a route.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileCacheOptions {
    /// Time to live in seconds. Zero disables caching.
    pub ttl_seconds: u32,

    /// Region name. Derived from methods and template when unset.
    pub region: Option<String>,
}

/// Per-route rate-limit settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct FileRateLimitRule {
    /// Explicit on/off. When unset, the global default applies.
    pub enabled: Option<bool>,

    /// Client ids exempt from limiting.
    pub client_whitelist: Vec<String>,

    /// Override of the global client id header.
    pub client_id_header: Option<String>,

    /// Counting window ("1s", "5m", "1h", "1d").
    pub period: Option<String>,

    /// Seconds a client must wait after exceeding the quota.
    pub period_timespan_secs: Option<f64>,

    /// Requests allowed per period.
    pub limit: Option<u64>,
}
