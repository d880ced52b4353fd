//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::FileConfiguration;
use crate::config::validation::ValidationReport;
use crate::resolve::ResolveError;

/// Error type for loading and building configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Unable to start gateway, configuration errors were:\n{0}")]
    Validation(ValidationReport),

    /// A resolver rejected a route the validator accepted.
    #[error("Route {index} could not be resolved: {source}")]
    Resolution {
        index: usize,
        #[source]
        source: ResolveError,
    },
}

impl ConfigError {
    /// The validation report, if this is a validation failure.
    pub fn validation_report(&self) -> Option<&ValidationReport> {
        match self {
            ConfigError::Validation(report) => Some(report),
            _ => None,
        }
    }
}

/// File formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from the file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse configuration text. Semantic checks happen later, in the builder.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<FileConfiguration, ConfigError> {
    match format {
        ConfigFormat::Toml => Ok(toml::from_str(content)?),
        ConfigFormat::Json => Ok(serde_json::from_str(content)?),
    }
}

/// Load raw configuration from a TOML or JSON file.
pub fn load_config(path: &Path) -> Result<FileConfiguration, ConfigError> {
    let format =
        ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("gateway.toml")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path(Path::new("routes.JSON")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("gateway.yaml")), None);
        assert_eq!(ConfigFormat::from_path(Path::new("gateway")), None);
    }

    #[test]
    fn test_parse_json() {
        let config = parse_config(
            r#"{
                "routes": [{
                    "downstream_path_template": "/api/orders",
                    "upstream_path_template": "/orders",
                    "upstream_http_methods": ["POST", "GET"]
                }],
                "global": { "request_id_key": "X-Request-Id" }
            }"#,
            ConfigFormat::Json,
        )
        .unwrap();

        assert_eq!(config.routes[0].upstream_http_methods, vec!["POST", "GET"]);
        assert_eq!(config.global.request_id_key.as_deref(), Some("X-Request-Id"));
    }

    #[test]
    fn test_parse_error() {
        let err = parse_config("routes = 5", ConfigFormat::Toml).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_unsupported_file() {
        let err = load_config(Path::new("routes.ini")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
