//! Load balancer selection.

use crate::config::schema::FileRoute;
use crate::resolve::ResolveError;
use crate::routing::options::LoadBalancerKind;

pub trait LoadBalancerResolver: Send + Sync {
    fn resolve(&self, route: &FileRoute) -> Result<LoadBalancerKind, ResolveError>;
}

/// Case-insensitive name lookup; unset means no load balancer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoadBalancerResolver;

impl LoadBalancerResolver for FileLoadBalancerResolver {
    fn resolve(&self, route: &FileRoute) -> Result<LoadBalancerKind, ResolveError> {
        match route.load_balancer.as_deref() {
            None => Ok(LoadBalancerKind::NoLoadBalancer),
            Some(name) => name.trim().parse().map_err(ResolveError::LoadBalancer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_balancer_names() {
        let mut route = FileRoute::default();
        assert_eq!(
            FileLoadBalancerResolver.resolve(&route),
            Ok(LoadBalancerKind::NoLoadBalancer)
        );

        route.load_balancer = Some("LeastConnection".into());
        assert_eq!(
            FileLoadBalancerResolver.resolve(&route),
            Ok(LoadBalancerKind::LeastConnection)
        );

        route.load_balancer = Some("Random".into());
        assert!(FileLoadBalancerResolver.resolve(&route).is_err());
    }
}
