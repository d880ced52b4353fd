//! Gateway-wide service discovery provider.

use crate::config::schema::FileGlobalConfiguration;
use crate::resolve::non_empty;
use crate::routing::options::ServiceProviderConfiguration;

pub const DEFAULT_PROVIDER: &str = "consul";
pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8500;

/// Providers the default validator accepts.
pub const KNOWN_PROVIDERS: &[&str] = &["consul"];

/// Resolved once per build, not per route.
pub trait ServiceProviderResolver: Send + Sync {
    fn resolve(&self, global: &FileGlobalConfiguration) -> ServiceProviderConfiguration;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileServiceProviderResolver;

impl ServiceProviderResolver for FileServiceProviderResolver {
    fn resolve(&self, global: &FileGlobalConfiguration) -> ServiceProviderConfiguration {
        let discovery = &global.service_discovery;
        ServiceProviderConfiguration {
            provider: non_empty(&discovery.provider)
                .unwrap_or(DEFAULT_PROVIDER)
                .to_ascii_lowercase(),
            host: non_empty(&discovery.host).unwrap_or(DEFAULT_HOST).to_string(),
            port: discovery.port.unwrap_or(DEFAULT_PORT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileServiceProviderResolver.resolve(&FileGlobalConfiguration::default());
        assert_eq!(
            config,
            ServiceProviderConfiguration {
                provider: "consul".into(),
                host: "localhost".into(),
                port: 8500,
            }
        );
    }

    #[test]
    fn test_configured() {
        let mut global = FileGlobalConfiguration::default();
        global.service_discovery.provider = Some("Consul".into());
        global.service_discovery.host = Some("consul.internal".into());
        global.service_discovery.port = Some(8600);

        let config = FileServiceProviderResolver.resolve(&global);
        assert_eq!(config.provider, "consul");
        assert_eq!(config.host, "consul.internal");
        assert_eq!(config.port, 8600);
    }
}
