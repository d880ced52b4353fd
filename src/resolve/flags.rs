//! Per-route capability flags.

use crate::config::schema::{FileGlobalConfiguration, FileRoute};
use crate::resolve::{cascade, qos};

/// Which cross-cutting concerns are switched on for a route.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteFlags {
    pub is_authenticated: bool,
    pub is_authorised: bool,
    pub is_cached: bool,
    pub is_qos: bool,
    pub enable_rate_limiting: bool,
}

pub trait RouteOptionsResolver: Send + Sync {
    fn resolve(&self, route: &FileRoute, global: &FileGlobalConfiguration) -> RouteFlags;
}

/// Default flag rules.
///
/// - authenticated: an authentication block with a provider
/// - authorised: at least one route claims requirement
/// - cached: a positive TTL
/// - QoS: route `enabled`, else global `enabled`, else threshold and timeout both set
/// - rate limited: route `enabled`, else global `enabled`, else off
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRouteOptionsResolver;

impl RouteOptionsResolver for FileRouteOptionsResolver {
    fn resolve(&self, route: &FileRoute, global: &FileGlobalConfiguration) -> RouteFlags {
        RouteFlags {
            is_authenticated: is_authenticated(route),
            is_authorised: !route.route_claims_requirement.is_empty(),
            is_cached: route.cache.ttl_seconds > 0,
            is_qos: is_qos(route, global),
            enable_rate_limiting: rate_limit_enabled(route, global),
        }
    }
}

pub fn is_authenticated(route: &FileRoute) -> bool {
    route
        .authentication
        .as_ref()
        .is_some_and(|auth| !auth.provider.trim().is_empty())
}

pub fn is_qos(route: &FileRoute, global: &FileGlobalConfiguration) -> bool {
    let derived = || {
        let options = qos::cascade_qos(route, global);
        options.exceptions_allowed_before_breaking > 0 && !options.timeout.is_zero()
    };
    match route.qos.enabled.or(global.qos.enabled) {
        Some(enabled) => enabled,
        None => derived(),
    }
}

pub fn rate_limit_enabled(route: &FileRoute, global: &FileGlobalConfiguration) -> bool {
    cascade(route.rate_limit.enabled, global.rate_limit.enabled, false)
}

/// True when the route names an authentication provider that is blank.
pub(crate) fn has_blank_provider(route: &FileRoute) -> bool {
    route
        .authentication
        .as_ref()
        .is_some_and(|auth| auth.provider.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{FileAuthenticationOptions, FileQosOptions};

    fn resolve(route: &FileRoute, global: &FileGlobalConfiguration) -> RouteFlags {
        FileRouteOptionsResolver.resolve(route, global)
    }

    #[test]
    fn test_everything_off_by_default() {
        let flags = resolve(&FileRoute::default(), &FileGlobalConfiguration::default());
        assert_eq!(flags, RouteFlags::default());
    }

    #[test]
    fn test_derived_flags() {
        let mut route = FileRoute::default();
        route.authentication = Some(FileAuthenticationOptions {
            provider: "IdentityServer".into(),
            ..Default::default()
        });
        route.route_claims_requirement.insert("role".into(), "admin".into());
        route.cache.ttl_seconds = 10;

        let flags = resolve(&route, &FileGlobalConfiguration::default());
        assert!(flags.is_authenticated);
        assert!(flags.is_authorised);
        assert!(flags.is_cached);
    }

    #[test]
    fn test_blank_provider_is_not_authenticated() {
        let mut route = FileRoute::default();
        route.authentication = Some(FileAuthenticationOptions::default());
        assert!(!is_authenticated(&route));
        assert!(has_blank_provider(&route));
    }

    #[test]
    fn test_rate_limit_cascade() {
        let mut global = FileGlobalConfiguration::default();
        let mut route = FileRoute::default();
        assert!(!rate_limit_enabled(&route, &global));

        global.rate_limit.enabled = Some(true);
        assert!(rate_limit_enabled(&route, &global));

        route.rate_limit.enabled = Some(false);
        assert!(!rate_limit_enabled(&route, &global));

        global.rate_limit.enabled = Some(false);
        route.rate_limit.enabled = Some(true);
        assert!(rate_limit_enabled(&route, &global));
    }

    #[test]
    fn test_qos_derived_from_values() {
        let mut route = FileRoute::default();
        route.qos = FileQosOptions {
            exceptions_allowed_before_breaking: Some(3),
            timeout_ms: Some(5000),
            ..Default::default()
        };
        assert!(is_qos(&route, &FileGlobalConfiguration::default()));

        route.qos.timeout_ms = None;
        assert!(!is_qos(&route, &FileGlobalConfiguration::default()));
    }

    #[test]
    fn test_qos_from_global_values() {
        let mut global = FileGlobalConfiguration::default();
        global.qos.exceptions_allowed_before_breaking = Some(2);
        global.qos.timeout_ms = Some(1000);

        let mut route = FileRoute::default();
        assert!(is_qos(&route, &global));

        route.qos.enabled = Some(false);
        assert!(!is_qos(&route, &global));
    }
}
