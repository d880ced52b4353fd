//! Option resolvers.
//!
//! # Data Flow
//! ```text
//! FileRoute + FileGlobalConfiguration
//!     → flags.rs (authenticated / authorised / cached / QoS / rate limited)
//!     → authentication.rs, claims.rs, request_id.rs, upstream.rs,
//!       qos.rs, rate_limit.rs, region.rs, http_handler.rs, load_balancer.rs
//!     → one resolved value per concern
//!
//! Once per build:
//!     FileGlobalConfiguration → service_provider.rs
//! ```
//!
//! # Design Decisions
//! - Every resolver is a pure, stateless strategy behind a trait
//! - Cascade: route value, else global default, else built-in default
//! - `ResolverSet` is passed to the builder explicitly; any concern can be
//!   swapped without touching the others
//! - Resolvers that parse report `ResolveError` instead of trusting that
//!   validation ran first, since the validator is pluggable too

pub mod authentication;
pub mod claims;
pub mod flags;
pub mod http_handler;
pub mod load_balancer;
pub mod qos;
pub mod rate_limit;
pub mod region;
pub mod request_id;
pub mod service_provider;
pub mod upstream;

use thiserror::Error;

use crate::routing::options::{ClaimParseError, UnknownName};
use crate::routing::template::TemplateError;

pub use authentication::{AuthenticationResolver, FileAuthenticationResolver};
pub use claims::{ClaimsToThingResolver, FileClaimsToThingResolver};
pub use flags::{FileRouteOptionsResolver, RouteFlags, RouteOptionsResolver};
pub use http_handler::{FileHttpHandlerResolver, HttpHandlerResolver};
pub use load_balancer::{FileLoadBalancerResolver, LoadBalancerResolver};
pub use qos::{FileQosResolver, QosResolver};
pub use rate_limit::{FileRateLimitResolver, RateLimitResolver};
pub use region::{FileRegionResolver, RegionResolver};
pub use request_id::{FileRequestIdKeyResolver, RequestIdKeyResolver};
pub use service_provider::{FileServiceProviderResolver, ServiceProviderResolver};
pub use upstream::{FileUpstreamPatternResolver, UpstreamPatternResolver};

/// A raw value a resolver could not turn into a runtime value.
///
/// The default validator rejects all of these up front; seeing one after a
/// successful validation points at a validator that lets too much through.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResolveError {
    #[error("upstream template '{template}': {source}")]
    Template {
        template: String,
        #[source]
        source: TemplateError,
    },

    #[error("claims instruction for '{key}': {source}")]
    Claim {
        key: String,
        #[source]
        source: ClaimParseError,
    },

    #[error("authentication provider: {0}")]
    AuthenticationProvider(#[source] UnknownName),

    #[error("load balancer: {0}")]
    LoadBalancer(#[source] UnknownName),

    #[error("rate limit period '{0}' is not valid")]
    Period(String),

    #[error("rate limit period timespan {0} is not a valid number of seconds")]
    PeriodTimespan(f64),

    #[error("route is flagged as authenticated but has no authentication options")]
    MissingAuthentication,
}

/// Route value, else global default, else built-in default.
pub fn cascade<T>(route: Option<T>, global: Option<T>, builtin: T) -> T {
    route.or(global).unwrap_or(builtin)
}

/// Treats empty and whitespace-only strings as unset.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// The full set of resolvers used by a configuration build.
pub struct ResolverSet {
    pub route_options: Box<dyn RouteOptionsResolver>,
    pub authentication: Box<dyn AuthenticationResolver>,
    pub claims: Box<dyn ClaimsToThingResolver>,
    pub request_id: Box<dyn RequestIdKeyResolver>,
    pub upstream: Box<dyn UpstreamPatternResolver>,
    pub qos: Box<dyn QosResolver>,
    pub rate_limit: Box<dyn RateLimitResolver>,
    pub region: Box<dyn RegionResolver>,
    pub http_handler: Box<dyn HttpHandlerResolver>,
    pub load_balancer: Box<dyn LoadBalancerResolver>,
    pub service_provider: Box<dyn ServiceProviderResolver>,
}

impl ResolverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route_options(mut self, resolver: impl RouteOptionsResolver + 'static) -> Self {
        self.route_options = Box::new(resolver);
        self
    }

    pub fn with_authentication(mut self, resolver: impl AuthenticationResolver + 'static) -> Self {
        self.authentication = Box::new(resolver);
        self
    }

    pub fn with_claims(mut self, resolver: impl ClaimsToThingResolver + 'static) -> Self {
        self.claims = Box::new(resolver);
        self
    }

    pub fn with_request_id(mut self, resolver: impl RequestIdKeyResolver + 'static) -> Self {
        self.request_id = Box::new(resolver);
        self
    }

    pub fn with_upstream(mut self, resolver: impl UpstreamPatternResolver + 'static) -> Self {
        self.upstream = Box::new(resolver);
        self
    }

    pub fn with_qos(mut self, resolver: impl QosResolver + 'static) -> Self {
        self.qos = Box::new(resolver);
        self
    }

    pub fn with_rate_limit(mut self, resolver: impl RateLimitResolver + 'static) -> Self {
        self.rate_limit = Box::new(resolver);
        self
    }

    pub fn with_region(mut self, resolver: impl RegionResolver + 'static) -> Self {
        self.region = Box::new(resolver);
        self
    }

    pub fn with_http_handler(mut self, resolver: impl HttpHandlerResolver + 'static) -> Self {
        self.http_handler = Box::new(resolver);
        self
    }

    pub fn with_load_balancer(mut self, resolver: impl LoadBalancerResolver + 'static) -> Self {
        self.load_balancer = Box::new(resolver);
        self
    }

    pub fn with_service_provider(
        mut self,
        resolver: impl ServiceProviderResolver + 'static,
    ) -> Self {
        self.service_provider = Box::new(resolver);
        self
    }
}

impl Default for ResolverSet {
    fn default() -> Self {
        Self {
            route_options: Box::new(FileRouteOptionsResolver),
            authentication: Box::new(FileAuthenticationResolver),
            claims: Box::new(FileClaimsToThingResolver),
            request_id: Box::new(FileRequestIdKeyResolver),
            upstream: Box::new(FileUpstreamPatternResolver),
            qos: Box::new(FileQosResolver),
            rate_limit: Box::new(FileRateLimitResolver),
            region: Box::new(FileRegionResolver),
            http_handler: Box::new(FileHttpHandlerResolver),
            load_balancer: Box::new(FileLoadBalancerResolver),
            service_provider: Box::new(FileServiceProviderResolver),
        }
    }
}

impl std::fmt::Debug for ResolverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolverSet").finish_non_exhaustive()
    }
}
