//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate templates, methods, downstream addresses and option blocks
//! - Validate value ranges (status codes, periods, QoS thresholds)
//! - Detect routes that collide on their route key
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FileConfiguration → Result<(), ValidationReport>
//! - Runs before any route is resolved; a failure resolves nothing
//! - Uses the same parsers as the resolvers, so accepted input always resolves

use std::collections::hash_map::Entry;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use thiserror::Error;

use crate::config::schema::{FileConfiguration, FileGlobalConfiguration, FileRoute};
use crate::resolve::{flags, non_empty, qos, rate_limit, service_provider, ResolveError};
use crate::routing::key::{derive_route_key, RouteKey};
use crate::routing::options::{
    parse_period, AuthenticationProvider, ClaimParseError, ClaimToThing, LoadBalancerKind,
};
use crate::routing::template::{
    parse_template, placeholder_names, Segment, TemplateError, UpstreamPathPattern,
};

/// A single problem with a route entry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteProblem {
    #[error("downstream path template: {0}")]
    DownstreamTemplate(TemplateError),

    #[error("upstream path template: {0}")]
    UpstreamTemplate(TemplateError),

    #[error("downstream placeholder '{{{0}}}' is not provided by the upstream template")]
    UnmappedPlaceholder(String),

    #[error("'{0}' is not a valid HTTP method")]
    InvalidMethod(String),

    #[error("HTTP method '{0}' is listed more than once")]
    DuplicateMethod(String),

    #[error("downstream scheme '{0}' is not supported (expected http or https)")]
    UnsupportedScheme(String),

    #[error("downstream host is required without service discovery")]
    MissingDownstreamHost,

    #[error("downstream address '{0}' is not valid")]
    InvalidDownstreamAddress(String),

    #[error("service name is required with service discovery")]
    MissingServiceName,

    #[error("authentication block has no provider")]
    MissingAuthenticationProvider,

    #[error("authentication provider '{0}' is not supported")]
    UnknownAuthenticationProvider(String),

    #[error("JWT authentication requires an authority")]
    MissingJwtAuthority,

    #[error("claims instruction for '{key}': {source}")]
    Claim { key: String, source: ClaimParseError },

    #[error("load balancer '{0}' is not supported")]
    UnknownLoadBalancer(String),

    #[error("QoS is enabled but exceptions_allowed_before_breaking is zero")]
    QosThreshold,

    #[error("QoS is enabled but timeout_ms is zero")]
    QosTimeout,

    #[error("rate limiting: {0}")]
    RateLimit(ResolveError),

    #[error("upstream template falls under the administration path '{0}'")]
    UnderAdministrationPath(String),
}

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("global: administration path '{0}' must start with '/'")]
    AdministrationPath(String),

    #[error("global: rate limit status code {0} must be between 400 and 599")]
    QuotaStatusCode(u16),

    #[error("global: rate limit period '{0}' is not valid")]
    GlobalPeriod(String),

    #[error("global: service discovery provider '{0}' is not supported")]
    UnknownDiscoveryProvider(String),

    #[error("route {index} ({upstream}): {problem}")]
    Route {
        index: usize,
        upstream: String,
        problem: RouteProblem,
    },

    #[error("routes {first} and {second} are duplicates (route key '{key}')")]
    DuplicateRouteKey {
        first: usize,
        second: usize,
        key: RouteKey,
    },

    #[error("routes {first} and {second} answer the same requests as '{key}' but forward to different downstreams")]
    ConflictingRouteKey {
        first: usize,
        second: usize,
        key: RouteKey,
    },
}

/// Every violation found in one configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

/// Gate run over the whole configuration before resolution.
pub trait ConfigValidator: Send + Sync {
    fn validate(&self, config: &FileConfiguration) -> Result<(), ValidationReport>;
}

/// The default rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileConfigValidator;

impl ConfigValidator for FileConfigValidator {
    fn validate(&self, config: &FileConfiguration) -> Result<(), ValidationReport> {
        validate_config(config)
    }
}

/// Validate a configuration, collecting every error.
pub fn validate_config(config: &FileConfiguration) -> Result<(), ValidationReport> {
    let mut errors = Vec::new();

    validate_global(&config.global, &mut errors);

    for (index, route) in config.routes.iter().enumerate() {
        for problem in route_problems(route, &config.global) {
            errors.push(ValidationError::Route {
                index,
                upstream: route.upstream_path_template.clone(),
                problem,
            });
        }
    }

    validate_route_keys(&config.routes, &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationReport::new(errors))
    }
}

fn validate_global(global: &FileGlobalConfiguration, errors: &mut Vec<ValidationError>) {
    if let Some(path) = non_empty(&global.administration_path) {
        if !path.starts_with('/') {
            errors.push(ValidationError::AdministrationPath(path.to_string()));
        }
    }

    if let Some(code) = global.rate_limit.http_status_code {
        if !(400..=599).contains(&code) {
            errors.push(ValidationError::QuotaStatusCode(code));
        }
    }

    if let Some(period) = non_empty(&global.rate_limit.period) {
        if parse_period(period).is_none() {
            errors.push(ValidationError::GlobalPeriod(period.to_string()));
        }
    }

    if let Some(provider) = non_empty(&global.service_discovery.provider) {
        let known = service_provider::KNOWN_PROVIDERS
            .iter()
            .any(|p| p.eq_ignore_ascii_case(provider.trim()));
        if !known {
            errors.push(ValidationError::UnknownDiscoveryProvider(provider.to_string()));
        }
    }
}

fn route_problems(route: &FileRoute, global: &FileGlobalConfiguration) -> Vec<RouteProblem> {
    let mut problems = Vec::new();

    check_templates(route, &mut problems);
    check_methods(route, &mut problems);
    check_downstream(route, &mut problems);
    check_authentication(route, &mut problems);
    check_claims(route, &mut problems);

    if let Some(name) = route.load_balancer.as_deref() {
        if name.trim().parse::<LoadBalancerKind>().is_err() {
            problems.push(RouteProblem::UnknownLoadBalancer(name.to_string()));
        }
    }

    if flags::is_qos(route, global) {
        let options = qos::cascade_qos(route, global);
        if options.exceptions_allowed_before_breaking == 0 {
            problems.push(RouteProblem::QosThreshold);
        }
        if options.timeout.is_zero() {
            problems.push(RouteProblem::QosTimeout);
        }
    }

    if flags::rate_limit_enabled(route, global) {
        if let Err(err) = rate_limit::resolve_rule(route, global) {
            problems.push(RouteProblem::RateLimit(err));
        }
    }

    if let Some(admin) = non_empty(&global.administration_path) {
        if is_under(&route.upstream_path_template, admin) {
            problems.push(RouteProblem::UnderAdministrationPath(admin.to_string()));
        }
    }

    problems
}

fn check_templates(route: &FileRoute, problems: &mut Vec<RouteProblem>) {
    let downstream = placeholder_names(&route.downstream_path_template);
    if let Err(err) = &downstream {
        problems.push(RouteProblem::DownstreamTemplate(err.clone()));
    }

    let upstream = UpstreamPathPattern::compile(
        &route.upstream_path_template,
        route.route_is_case_sensitive,
    );
    if let Err(err) = &upstream {
        problems.push(RouteProblem::UpstreamTemplate(err.clone()));
    }

    if let (Ok(downstream), Ok(upstream)) = (downstream, upstream) {
        for name in downstream {
            if !upstream.param_names().contains(&name) {
                problems.push(RouteProblem::UnmappedPlaceholder(name));
            }
        }
    }
}

fn check_methods(route: &FileRoute, problems: &mut Vec<RouteProblem>) {
    let mut seen: Vec<String> = Vec::with_capacity(route.upstream_http_methods.len());
    for method in &route.upstream_http_methods {
        if !is_method_token(method) {
            problems.push(RouteProblem::InvalidMethod(method.clone()));
            continue;
        }
        let upper = method.to_ascii_uppercase();
        if seen.contains(&upper) {
            problems.push(RouteProblem::DuplicateMethod(method.clone()));
        } else {
            seen.push(upper);
        }
    }
}

/// RFC 9110 token characters.
fn is_method_token(method: &str) -> bool {
    !method.is_empty()
        && method
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

fn check_downstream(route: &FileRoute, problems: &mut Vec<RouteProblem>) {
    let scheme = non_empty(&route.downstream_scheme).unwrap_or("http");
    let scheme_ok = scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https");
    if !scheme_ok {
        problems.push(RouteProblem::UnsupportedScheme(scheme.to_string()));
    }

    if route.use_service_discovery {
        if non_empty(&route.service_name).is_none() {
            problems.push(RouteProblem::MissingServiceName);
        }
        return;
    }

    let Some(host) = non_empty(&route.downstream_host) else {
        problems.push(RouteProblem::MissingDownstreamHost);
        return;
    };

    if scheme_ok {
        let address = match route.downstream_port {
            Some(port) => format!("{}://{}:{}", scheme, host, port),
            None => format!("{}://{}", scheme, host),
        };
        let valid = url::Url::parse(&address)
            .map(|url| url.host().is_some() && url.path() == "/")
            .unwrap_or(false);
        if !valid {
            problems.push(RouteProblem::InvalidDownstreamAddress(address));
        }
    }
}

fn check_authentication(route: &FileRoute, problems: &mut Vec<RouteProblem>) {
    let Some(auth) = &route.authentication else {
        return;
    };
    if flags::has_blank_provider(route) {
        problems.push(RouteProblem::MissingAuthenticationProvider);
        return;
    }
    match auth.provider.trim().parse::<AuthenticationProvider>() {
        Ok(AuthenticationProvider::Jwt) => {
            let has_authority = auth
                .jwt
                .as_ref()
                .is_some_and(|jwt| !jwt.authority.trim().is_empty());
            if !has_authority {
                problems.push(RouteProblem::MissingJwtAuthority);
            }
        }
        Ok(AuthenticationProvider::IdentityServer) => {}
        Err(_) => problems.push(RouteProblem::UnknownAuthenticationProvider(auth.provider.clone())),
    }
}

fn check_claims(route: &FileRoute, problems: &mut Vec<RouteProblem>) {
    let maps = [
        &route.add_headers_to_request,
        &route.add_claims_to_request,
        &route.add_queries_to_request,
    ];
    for (key, instruction) in maps.into_iter().flatten() {
        if let Err(source) = ClaimToThing::parse(key, instruction) {
            problems.push(RouteProblem::Claim {
                key: key.clone(),
                source,
            });
        }
    }
}

fn is_under(template: &str, admin: &str) -> bool {
    let admin = admin.trim_end_matches('/');
    if admin.is_empty() {
        return false;
    }
    let template = template.to_ascii_lowercase();
    let admin = admin.to_ascii_lowercase();
    template == admin || template.starts_with(&format!("{}/", admin))
}

/// The requests a route answers: its path shape and method set.
///
/// Placeholder names are erased and the path is lower-cased unless the route
/// is case-sensitive, mirroring how `UpstreamPathPattern` matches.
#[derive(Debug, PartialEq, Eq, Hash)]
struct EntryPoint {
    path: String,
    methods: BTreeSet<String>,
}

impl EntryPoint {
    fn of(route: &FileRoute) -> Self {
        let template = &route.upstream_path_template;
        let mut path: String = match parse_template(template) {
            Ok(segments) => segments
                .into_iter()
                .map(|segment| match segment {
                    Segment::Literal(text) => text,
                    Segment::Placeholder(_) => "{}",
                })
                .collect(),
            Err(_) => template.clone(),
        };
        if !route.route_is_case_sensitive {
            path = path.to_lowercase();
        }

        let methods = route
            .upstream_http_methods
            .iter()
            .map(|m| m.trim().to_ascii_uppercase())
            .collect();

        Self { path, methods }
    }
}

/// Two routes answering the same requests would share load-balancer and
/// session state, and the later one could never be dispatched to.
fn validate_route_keys(routes: &[FileRoute], errors: &mut Vec<ValidationError>) {
    let mut seen: HashMap<EntryPoint, usize> = HashMap::with_capacity(routes.len());
    for (index, route) in routes.iter().enumerate() {
        match seen.entry(EntryPoint::of(route)) {
            Entry::Occupied(entry) => {
                let first = *entry.get();
                let key = derive_route_key(
                    &routes[first].upstream_path_template,
                    &routes[first].upstream_http_methods,
                );
                errors.push(if same_downstream(&routes[first], route) {
                    ValidationError::DuplicateRouteKey { first, second: index, key }
                } else {
                    ValidationError::ConflictingRouteKey { first, second: index, key }
                });
            }
            Entry::Vacant(entry) => {
                entry.insert(index);
            }
        }
    }
}

fn same_downstream(a: &FileRoute, b: &FileRoute) -> bool {
    a.downstream_path_template == b.downstream_path_template
        && a.downstream_scheme == b.downstream_scheme
        && a.downstream_host == b.downstream_host
        && a.downstream_port == b.downstream_port
        && a.service_name == b.service_name
        && a.use_service_discovery == b.use_service_discovery
}
