//! Rate-limit options.

use std::time::Duration;

use crate::config::schema::{FileGlobalConfiguration, FileRoute};
use crate::resolve::{cascade, non_empty, ResolveError};
use crate::routing::options::{parse_period, RateLimitOptions, RateLimitRule};

pub const DEFAULT_CLIENT_ID_HEADER: &str = "ClientId";
pub const DEFAULT_COUNTER_PREFIX: &str = "gateway";
pub const DEFAULT_QUOTA_STATUS: u16 = 429;

pub trait RateLimitResolver: Send + Sync {
    /// Returns `None` unless `enabled` is true.
    fn resolve(
        &self,
        route: &FileRoute,
        global: &FileGlobalConfiguration,
        enabled: bool,
    ) -> Result<Option<RateLimitOptions>, ResolveError>;
}

/// Client id header, period, timespan and limit may be overridden per route;
/// the remaining settings come from the global block.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRateLimitResolver;

impl RateLimitResolver for FileRateLimitResolver {
    fn resolve(
        &self,
        route: &FileRoute,
        global: &FileGlobalConfiguration,
        enabled: bool,
    ) -> Result<Option<RateLimitOptions>, ResolveError> {
        if !enabled {
            return Ok(None);
        }

        let rule = resolve_rule(route, global)?;
        let (route, global) = (&route.rate_limit, &global.rate_limit);

        let quota_exceeded_message = non_empty(&global.quota_exceeded_message)
            .map(str::to_string)
            .unwrap_or_else(|| match &rule {
                Some(rule) => format!(
                    "API calls quota exceeded! maximum admitted {} per {}.",
                    rule.limit, rule.period
                ),
                None => "API calls quota exceeded!".to_string(),
            });

        Ok(Some(RateLimitOptions {
            client_id_header: non_empty(&route.client_id_header)
                .or_else(|| non_empty(&global.client_id_header))
                .unwrap_or(DEFAULT_CLIENT_ID_HEADER)
                .to_string(),
            client_whitelist: route.client_whitelist.clone(),
            disable_rate_limit_headers: global.disable_rate_limit_headers.unwrap_or(false),
            quota_exceeded_message,
            rate_limit_counter_prefix: non_empty(&global.rate_limit_counter_prefix)
                .unwrap_or(DEFAULT_COUNTER_PREFIX)
                .to_string(),
            http_status_code: global.http_status_code.unwrap_or(DEFAULT_QUOTA_STATUS),
            rule,
        }))
    }
}

/// Cascades period, timespan and limit.
///
/// Without a period there is no rule. The timespan defaults to the period and
/// the limit to 0. Only values that are present and malformed are errors.
pub fn resolve_rule(
    route: &FileRoute,
    global: &FileGlobalConfiguration,
) -> Result<Option<RateLimitRule>, ResolveError> {
    let (route, global) = (&route.rate_limit, &global.rate_limit);

    let timespan = match route.period_timespan_secs.or(global.period_timespan_secs) {
        Some(secs) => Some(
            Duration::try_from_secs_f64(secs).map_err(|_| ResolveError::PeriodTimespan(secs))?,
        ),
        None => None,
    };

    let Some(period) = non_empty(&route.period).or_else(|| non_empty(&global.period)) else {
        return Ok(None);
    };
    let period_duration =
        parse_period(period).ok_or_else(|| ResolveError::Period(period.to_string()))?;

    Ok(Some(RateLimitRule {
        period: period.trim().to_string(),
        period_duration,
        period_timespan: timespan.unwrap_or(period_duration),
        limit: cascade(route.limit, global.limit, 0),
    }))
}
