//! Upstream template matcher.

use crate::config::schema::FileRoute;
use crate::resolve::ResolveError;
use crate::routing::template::UpstreamPathPattern;

pub trait UpstreamPatternResolver: Send + Sync {
    fn resolve(&self, route: &FileRoute) -> Result<UpstreamPathPattern, ResolveError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileUpstreamPatternResolver;

impl UpstreamPatternResolver for FileUpstreamPatternResolver {
    fn resolve(&self, route: &FileRoute) -> Result<UpstreamPathPattern, ResolveError> {
        UpstreamPathPattern::compile(&route.upstream_path_template, route.route_is_case_sensitive)
            .map_err(|source| ResolveError::Template {
                template: route.upstream_path_template.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiles_route_template() {
        let route = FileRoute {
            upstream_path_template: "/products/{productId}".into(),
            route_is_case_sensitive: true,
            ..Default::default()
        };

        let pattern = FileUpstreamPatternResolver.resolve(&route).unwrap();
        assert!(pattern.is_case_sensitive());
        assert!(pattern.is_match("/products/1"));
        assert!(!pattern.is_match("/Products/1"));
    }

    #[test]
    fn test_bad_template() {
        let route = FileRoute {
            upstream_path_template: "/products/{id".into(),
            ..Default::default()
        };
        assert!(matches!(
            FileUpstreamPatternResolver.resolve(&route),
            Err(ResolveError::Template { .. })
        ));
    }
}
