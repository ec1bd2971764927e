//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (RELICT_*)
//! 2. TOML config file (if RELICT_CONFIG_FILE set)
//! 3. Built-in defaults
//!
//! Everything here is immutable for the lifetime of one deployed snapshot;
//! the pipeline receives a shared reference at construction time.

use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Where an injected snippet lands relative to the matched keyphrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InjectPosition {
    /// Snippet precedes the match.
    Before,
    /// Snippet follows the match.
    After,
    /// Snippet replaces the match.
    Replace,
}

/// One configured text substitution applied to rendered HTML bodies.
///
/// Rules apply sequentially in declared order. A rule with an empty `file`
/// is inert and skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectionRule {
    /// Snippet source path, relative to the content root. Empty disables the rule.
    #[serde(default)]
    pub file: String,

    /// Phrase (or pattern) to match in the HTML body.
    #[serde(default)]
    pub keyphrase: String,

    /// Maximum replacements. Negative means unbounded, zero disables the rule.
    #[serde(default = "default_limit")]
    pub limit: i64,

    /// Treat `keyphrase` as a regular expression instead of a literal.
    #[serde(default)]
    pub regex: bool,

    /// Placement of the snippet relative to the match.
    #[serde(default = "default_position")]
    pub position: InjectPosition,
}

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (RELICT_*)
/// 2. TOML config file (if RELICT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment root scanned for the `.content.<id>` snapshot directory.
    ///
    /// Set via RELICT_ROOT_DIR environment variable.
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Explicit content directory, overriding discovery.
    ///
    /// Set via RELICT_CONTENT_PATH environment variable. Relative paths are
    /// resolved under `root_dir`.
    #[serde(default)]
    pub content_path: Option<PathBuf>,

    /// Serve a 1x1 placeholder when an archived image is missing.
    #[serde(default = "default_true")]
    pub fix_missing_images: bool,

    /// Serve an empty stylesheet when an archived CSS file is missing.
    #[serde(default = "default_true")]
    pub fix_missing_css: bool,

    /// Serve an empty script when an archived JS file is missing.
    #[serde(default = "default_true")]
    pub fix_missing_js: bool,

    /// Serve an empty icon when favicon.ico is missing.
    #[serde(default = "default_true")]
    pub fix_missing_ico: bool,

    /// Redirect target for missing HTML pages. Empty or unset disables it.
    #[serde(default = "default_redirect_missing_html")]
    pub redirect_missing_html: Option<String>,

    /// `Cache-Control: public, max-age=N` for cacheable types. Zero disables
    /// the header; the ETag validator is emitted either way.
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age: u64,

    /// Domain the snapshot is currently served on, when it is not recognized
    /// automatically from the request host.
    #[serde(default)]
    pub custom_domain: Option<String>,

    /// XML sitemap path, e.g. `/sitemap.xml`. Query strings are ignored when
    /// matching. Unset disables the sitemap endpoint.
    #[serde(default)]
    pub sitemap_path: Option<String>,

    /// Ordered snippet injection rules applied to HTML bodies.
    #[serde(default)]
    pub inject: Vec<InjectionRule>,

    /// Listen address for the HTTP adapter.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_redirect_missing_html() -> Option<String> {
    Some("/".into())
}

fn default_cache_max_age() -> u64 {
    2_592_000
}

fn default_bind_addr() -> String {
    "127.0.0.1:8080".into()
}

fn default_limit() -> i64 {
    1
}

fn default_position() -> InjectPosition {
    InjectPosition::After
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            root_dir: default_root_dir(),
            content_path: None,
            fix_missing_images: true,
            fix_missing_css: true,
            fix_missing_js: true,
            fix_missing_ico: true,
            redirect_missing_html: default_redirect_missing_html(),
            cache_max_age: default_cache_max_age(),
            custom_domain: None,
            sitemap_path: None,
            inject: Vec::new(),
            bind_addr: default_bind_addr(),
        }
    }
}

impl AppConfig {
    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `RELICT_`
    /// 2. TOML file from `RELICT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("RELICT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("RELICT_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
