//! Builds a `RuntimeConfiguration` from raw configuration.
//!
//! # Responsibilities
//! - Gate the whole input through the validator
//! - Resolve the service provider once per build
//! - Resolve every route, in input order, through the resolver set
//! - Package routes and global settings into one immutable snapshot
//!
//! # Design Decisions
//! - No mutable state: concurrent builds of different inputs are safe
//! - Routes are collected locally and only returned on full success, so a
//!   failure at route k leaves routes 0..k-1 visible nowhere
//! - Publishing is the caller's job (see `holder.rs`)

use std::sync::Arc;
use std::time::Instant;

use crate::config::loader::ConfigError;
use crate::config::schema::{FileConfiguration, FileGlobalConfiguration, FileRoute};
use crate::config::source::{ConfigSource, StaticSource};
use crate::config::validation::{ConfigValidator, FileConfigValidator};
use crate::observability::metrics;
use crate::resolve::{non_empty, ResolveError, ResolverSet};
use crate::routing::options::{CacheOptions, ServiceProviderConfiguration};
use crate::routing::route::{ClaimsTransforms, Downstream, ResolvedRoute, RouteBuilder, RouteEntry};
use crate::routing::{derive_route_key, RuntimeConfiguration};

/// The configuration orchestrator.
pub struct ConfigBuilder {
    source: Box<dyn ConfigSource>,
    validator: Box<dyn ConfigValidator>,
    resolvers: ResolverSet,
}

impl ConfigBuilder {
    /// Builder bound to `source`, with the default validator and resolvers.
    pub fn new(source: impl ConfigSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            validator: Box::new(FileConfigValidator),
            resolvers: ResolverSet::default(),
        }
    }

    pub fn with_validator(mut self, validator: impl ConfigValidator + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn with_resolvers(mut self, resolvers: ResolverSet) -> Self {
        self.resolvers = resolvers;
        self
    }

    /// Build from the bound source.
    pub fn create(&self) -> Result<RuntimeConfiguration, ConfigError> {
        tracing::debug!(source = %self.source.describe(), "Loading configuration");
        let config = self.source.load()?;
        self.create_from(&config)
    }

    /// Build from an explicitly supplied configuration.
    pub fn create_from(&self, config: &FileConfiguration) -> Result<RuntimeConfiguration, ConfigError> {
        let started = Instant::now();
        let result = self.set_up_configuration(config);

        match &result {
            Ok(runtime) => {
                metrics::record_build("success", started);
                metrics::record_routes(runtime.routes().len());
                tracing::info!(
                    routes = runtime.routes().len(),
                    administration_path = runtime.administration_path().unwrap_or("-"),
                    elapsed_us = started.elapsed().as_micros() as u64,
                    "Runtime configuration built"
                );
            }
            Err(ConfigError::Validation(report)) => {
                metrics::record_build("invalid", started);
                metrics::record_validation_errors(report.len());
                tracing::error!(errors = report.len(), "Configuration rejected:\n{}", report);
            }
            Err(e) => {
                metrics::record_build("error", started);
                tracing::error!(error = %e, "Configuration build failed");
            }
        }

        result
    }

    fn set_up_configuration(
        &self,
        config: &FileConfiguration,
    ) -> Result<RuntimeConfiguration, ConfigError> {
        self.validator
            .validate(config)
            .map_err(ConfigError::Validation)?;

        let service_provider = Arc::new(self.resolvers.service_provider.resolve(&config.global));

        let routes = config
            .routes
            .iter()
            .enumerate()
            .map(|(index, route)| {
                self.set_up_route(route, &config.global, &service_provider)
                    .map_err(|source| ConfigError::Resolution { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let administration_path = non_empty(&config.global.administration_path).map(str::to_string);

        Ok(RuntimeConfiguration::new(routes, administration_path, service_provider))
    }

    fn set_up_route(
        &self,
        route: &FileRoute,
        global: &FileGlobalConfiguration,
        service_provider: &Arc<ServiceProviderConfiguration>,
    ) -> Result<ResolvedRoute, ResolveError> {
        let r = &self.resolvers;

        let flags = r.route_options.resolve(route, global);

        let authentication = if flags.is_authenticated {
            let options = route
                .authentication
                .as_ref()
                .ok_or(ResolveError::MissingAuthentication)?;
            Some(r.authentication.resolve(options)?)
        } else {
            None
        };

        let claims = ClaimsTransforms {
            to_headers: r.claims.resolve(&route.add_headers_to_request)?,
            to_claims: r.claims.resolve(&route.add_claims_to_request)?,
            to_queries: r.claims.resolve(&route.add_queries_to_request)?,
        };

        let request_id_key = r.request_id.resolve(route, global);
        let upstream_pattern = r.upstream.resolve(route)?;
        let route_key = derive_route_key(&route.upstream_path_template, &route.upstream_http_methods);

        let qos = flags.is_qos.then(|| r.qos.resolve(route, global));
        let rate_limit = r.rate_limit.resolve(route, global, flags.enable_rate_limiting)?;

        let cache = flags.is_cached.then(|| CacheOptions {
            ttl_seconds: route.cache.ttl_seconds,
            region: r.region.resolve(route),
        });

        let http_handler = r.http_handler.resolve(route, global);
        let load_balancer = r.load_balancer.resolve(route)?;

        let downstream = Downstream {
            scheme: non_empty(&route.downstream_scheme)
                .unwrap_or("http")
                .to_ascii_lowercase(),
            host: non_empty(&route.downstream_host).map(str::to_string),
            port: route.downstream_port,
        };

        let provider = route.use_service_discovery.then(|| service_provider.clone());

        tracing::debug!(
            route_key = %route_key,
            downstream = %route.downstream_path_template,
            authenticated = flags.is_authenticated,
            rate_limited = flags.enable_rate_limiting,
            qos = flags.is_qos,
            cached = flags.is_cached,
            "Route resolved"
        );

        Ok(RouteBuilder::new(RouteEntry {
            downstream_path_template: route.downstream_path_template.clone(),
            upstream_path_template: route.upstream_path_template.clone(),
            upstream_pattern,
            upstream_methods: route.upstream_http_methods.clone(),
            route_key,
        })
        .with_authentication(authentication)
        .with_claims(claims)
        .with_authorisation(flags.is_authorised, route.route_claims_requirement.clone())
        .with_request_id_key(request_id_key)
        .with_cache(cache)
        .with_downstream(downstream)
        .with_load_balancer(load_balancer)
        .with_qos(qos)
        .with_rate_limit(rate_limit)
        .with_http_handler(http_handler)
        .with_service(non_empty(&route.service_name).map(str::to_string), provider)
        .build())
    }
}

impl Default for ConfigBuilder {
    /// Bound to an empty in-memory configuration.
    fn default() -> Self {
        Self::new(StaticSource::default())
    }
}

impl std::fmt::Debug for ConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigBuilder")
            .field("source", &self.source.describe())
            .finish_non_exhaustive()
    }
}
