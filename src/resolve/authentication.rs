//! Authentication options.

use crate::config::schema::FileAuthenticationOptions;
use crate::resolve::{non_empty, ResolveError};
use crate::routing::options::{AuthenticationOptions, AuthenticationProvider, JwtConfig};

/// Called only for routes whose authenticated flag resolved true.
pub trait AuthenticationResolver: Send + Sync {
    fn resolve(&self, options: &FileAuthenticationOptions)
        -> Result<AuthenticationOptions, ResolveError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileAuthenticationResolver;

impl AuthenticationResolver for FileAuthenticationResolver {
    fn resolve(
        &self,
        options: &FileAuthenticationOptions,
    ) -> Result<AuthenticationOptions, ResolveError> {
        let provider: AuthenticationProvider = options
            .provider
            .trim()
            .parse()
            .map_err(ResolveError::AuthenticationProvider)?;

        let jwt = options.jwt.as_ref().map(|jwt| JwtConfig {
            authority: jwt.authority.clone(),
            audience: non_empty(&jwt.audience).map(str::to_string),
        });

        Ok(AuthenticationOptions {
            provider,
            provider_root_url: non_empty(&options.provider_root_url).map(str::to_string),
            api_name: non_empty(&options.api_name).map(str::to_string),
            api_secret: non_empty(&options.api_secret).map(str::to_string),
            require_https: options.require_https,
            allowed_scopes: options.allowed_scopes.clone(),
            jwt,
        })
    }
}
