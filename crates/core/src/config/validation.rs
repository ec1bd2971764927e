//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use std::net::SocketAddr;

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `bind_addr` is not a socket address
    /// - `sitemap_path` does not start with `/` or carries a query
    /// - `redirect_missing_html` is neither a local path nor an absolute URL
    /// - `custom_domain` is set but empty
    /// - an active injection rule has an empty keyphrase
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Invalid {
                field: "bind_addr".into(),
                reason: format!("{} is not a socket address", self.bind_addr),
            });
        }

        if let Some(path) = &self.sitemap_path {
            if !path.starts_with('/') {
                return Err(ConfigError::Invalid {
                    field: "sitemap_path".into(),
                    reason: "must start with /".into(),
                });
            }
            if path.contains('?') {
                return Err(ConfigError::Invalid {
                    field: "sitemap_path".into(),
                    reason: "must not contain a query string".into(),
                });
            }
        }

        if let Some(target) = self.redirect_missing_html.as_deref() {
            let local = target.starts_with('/');
            let absolute = target.starts_with("http://") || target.starts_with("https://");
            if !target.is_empty() && !local && !absolute {
                return Err(ConfigError::Invalid {
                    field: "redirect_missing_html".into(),
                    reason: "must be a local path or an absolute http(s) URL".into(),
                });
            }
        }

        if let Some(domain) = &self.custom_domain {
            if domain.is_empty() {
                return Err(ConfigError::Invalid {
                    field: "custom_domain".into(),
                    reason: "must not be empty when set".into(),
                });
            }
        }

        for (index, rule) in self.inject.iter().enumerate() {
            if !rule.file.is_empty() && rule.keyphrase.is_empty() {
                return Err(ConfigError::Invalid {
                    field: format!("inject[{index}].keyphrase"),
                    reason: "must not be empty for an active rule".into(),
                });
            }
        }

        if self.cache_max_age == 0 {
            tracing::warn!("cache_max_age is 0; Cache-Control disabled, ETag validation still applies");
        }

        Ok(())
    }
}
