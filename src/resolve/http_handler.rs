//! HTTP handler options.

use crate::config::schema::{FileGlobalConfiguration, FileRoute};
use crate::resolve::cascade;
use crate::routing::options::HttpHandlerOptions;

pub trait HttpHandlerResolver: Send + Sync {
    fn resolve(&self, route: &FileRoute, global: &FileGlobalConfiguration) -> HttpHandlerOptions;
}

/// Each field: route value, else global default, else on.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileHttpHandlerResolver;

impl HttpHandlerResolver for FileHttpHandlerResolver {
    fn resolve(&self, route: &FileRoute, global: &FileGlobalConfiguration) -> HttpHandlerOptions {
        let builtin = HttpHandlerOptions::default();
        let (route, global) = (&route.http_handler, &global.http_handler);
        HttpHandlerOptions {
            allow_auto_redirect: cascade(
                route.allow_auto_redirect,
                global.allow_auto_redirect,
                builtin.allow_auto_redirect,
            ),
            use_cookie_container: cascade(
                route.use_cookie_container,
                global.use_cookie_container,
                builtin.use_cookie_container,
            ),
        }
    }
}
