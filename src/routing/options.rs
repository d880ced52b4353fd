//! Resolved option blocks carried by a route.
//!
//! These are plain values. The subsystems that act on them (authentication,
//! caching, QoS, rate limiting, load balancing, service discovery) live
//! outside this crate and only read them.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Authentication provider for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AuthenticationProvider {
    IdentityServer,
    Jwt,
}

impl FromStr for AuthenticationProvider {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "identityserver" => Ok(Self::IdentityServer),
            "jwt" => Ok(Self::Jwt),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}

impl fmt::Display for AuthenticationProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IdentityServer => f.write_str("IdentityServer"),
            Self::Jwt => f.write_str("Jwt"),
        }
    }
}

/// A name that matched none of the known variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown name '{0}'")]
pub struct UnknownName(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JwtConfig {
    pub authority: String,
    pub audience: Option<String>,
}

/// Authentication settings. Only present on authenticated routes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticationOptions {
    pub provider: AuthenticationProvider,
    pub provider_root_url: Option<String>,
    pub api_name: Option<String>,
    pub api_secret: Option<String>,
    pub require_https: bool,
    pub allowed_scopes: Vec<String>,
    pub jwt: Option<JwtConfig>,
}

/// Error parsing a claims-to-thing instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimParseError {
    #[error("instruction is empty")]
    Empty,

    #[error("expected 'Claims[<name>]', found '{0}'")]
    MissingClaim(String),

    #[error("expected 'value' or 'value[<index>]', found '{0}'")]
    InvalidValue(String),

    #[error("too many '>' separated parts")]
    TooManyParts,
}

/// Copies (part of) a claim into a header, claim or query parameter.
///
/// Parsed from `Claims[<claim>] > value[<index>] > <delimiter>`. The value
/// and delimiter parts are optional; without a delimiter the whole claim
/// value is used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimToThing {
    pub new_key: String,
    pub claim_key: String,
    pub delimiter: Option<String>,
    pub index: usize,
}

impl ClaimToThing {
    pub fn parse(new_key: &str, instruction: &str) -> Result<Self, ClaimParseError> {
        let parts: Vec<&str> = instruction.split('>').map(str::trim).collect();
        if parts.len() > 3 {
            return Err(ClaimParseError::TooManyParts);
        }

        let claim_part = parts.first().copied().unwrap_or_default();
        if claim_part.is_empty() {
            return Err(ClaimParseError::Empty);
        }
        let claim_key = bracketed(claim_part, "Claims")
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ClaimParseError::MissingClaim(claim_part.to_string()))?;

        let index = match parts.get(1) {
            None => 0,
            Some(part) if part.eq_ignore_ascii_case("value") => 0,
            Some(part) => bracketed(part, "value")
                .and_then(|i| i.parse::<usize>().ok())
                .ok_or_else(|| ClaimParseError::InvalidValue(part.to_string()))?,
        };

        let delimiter = parts
            .get(2)
            .filter(|d| !d.is_empty())
            .map(|d| d.to_string());

        Ok(Self {
            new_key: new_key.to_string(),
            claim_key: claim_key.to_string(),
            delimiter,
            index,
        })
    }
}

/// Returns the text inside `prefix[...]`, matching the prefix case-insensitively.
fn bracketed<'a>(part: &'a str, prefix: &str) -> Option<&'a str> {
    let head = part.get(..prefix.len())?;
    if !head.eq_ignore_ascii_case(prefix) {
        return None;
    }
    part[prefix.len()..].strip_prefix('[')?.strip_suffix(']')
}

/// Response cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheOptions {
    pub ttl_seconds: u32,
    pub region: String,
}

/// QoS (circuit breaker + timeout) settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QosOptions {
    pub exceptions_allowed_before_breaking: u32,
    pub duration_of_break: Duration,
    pub timeout: Duration,
}

/// Quota applied by the rate limiter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateLimitRule {
    /// The period as written ("1s", "5m", ...).
    pub period: String,
    pub period_duration: Duration,
    /// How long a client waits after exceeding the quota.
    pub period_timespan: Duration,
    pub limit: u64,
}

/// Rate-limit settings. Only present on rate-limited routes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateLimitOptions {
    pub client_id_header: String,
    pub client_whitelist: Vec<String>,
    pub disable_rate_limit_headers: bool,
    pub quota_exceeded_message: String,
    pub rate_limit_counter_prefix: String,
    pub http_status_code: u16,
    /// `None` when no period is configured on the route or globally.
    pub rule: Option<RateLimitRule>,
}

/// Parse a rate-limit period such as "1s", "15m", "2h" or "1d".
pub fn parse_period(period: &str) -> Option<Duration> {
    let period = period.trim();
    let unit = period.chars().last()?;
    let amount: u64 = period[..period.len() - unit.len_utf8()].parse().ok()?;
    if amount == 0 {
        return None;
    }
    let secs = match unit {
        's' => amount,
        'm' => amount.checked_mul(60)?,
        'h' => amount.checked_mul(60 * 60)?,
        'd' => amount.checked_mul(24 * 60 * 60)?,
        _ => return None,
    };
    Some(Duration::from_secs(secs))
}

/// Behavior of the HTTP handler used for downstream calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HttpHandlerOptions {
    pub allow_auto_redirect: bool,
    pub use_cookie_container: bool,
}

impl Default for HttpHandlerOptions {
    fn default() -> Self {
        Self {
            allow_auto_redirect: true,
            use_cookie_container: true,
        }
    }
}

/// Load balancer selected for a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum LoadBalancerKind {
    #[default]
    NoLoadBalancer,
    RoundRobin,
    LeastConnection,
}

impl FromStr for LoadBalancerKind {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" | "noloadbalancer" => Ok(Self::NoLoadBalancer),
            "roundrobin" => Ok(Self::RoundRobin),
            "leastconnection" => Ok(Self::LeastConnection),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}

/// Gateway-wide service discovery settings, shared by every route using discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceProviderConfiguration {
    pub provider: String,
    pub host: String,
    pub port: u16,
}
