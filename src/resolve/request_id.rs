//! Request id header name.

use crate::config::schema::{FileGlobalConfiguration, FileRoute};
use crate::resolve::non_empty;

pub trait RequestIdKeyResolver: Send + Sync {
    fn resolve(&self, route: &FileRoute, global: &FileGlobalConfiguration) -> Option<String>;
}

/// Route key, else the global key, else none.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileRequestIdKeyResolver;

impl RequestIdKeyResolver for FileRequestIdKeyResolver {
    fn resolve(&self, route: &FileRoute, global: &FileGlobalConfiguration) -> Option<String> {
        non_empty(&route.request_id_key)
            .or_else(|| non_empty(&global.request_id_key))
            .map(str::to_string)
    }
}
