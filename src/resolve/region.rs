//! Cache region.

use crate::config::schema::FileRoute;
use crate::resolve::non_empty;

pub trait RegionResolver: Send + Sync {
    fn resolve(&self, route: &FileRoute) -> String;
}

/// The configured region, else `<methods><template without '/'>`,
/// e.g. `GETPOSTusers{id}` for `/users/{id}` with `[GET, POST]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRegionResolver;

impl RegionResolver for FileRegionResolver {
    fn resolve(&self, route: &FileRoute) -> String {
        if let Some(region) = non_empty(&route.cache.region) {
            return region.to_string();
        }
        let methods: String = route.upstream_http_methods.concat();
        format!("{}{}", methods, route.upstream_path_template.replace('/', ""))
    }
}
