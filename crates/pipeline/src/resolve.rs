//! URL normalization and lookup against the structure index.
//!
//! Index rows are keyed by the URL as it looked at archive time. The snapshot
//! may now be served from a different domain, so the request URL is rewritten
//! to the canonical domain before lookup. Archived crawls also normalize
//! trailing slashes inconsistently, so every lookup tries two forms: the URL
//! itself and its trailing-slash alternate. A single fixed form would
//! silently miss half the archive.

use crate::error::PipelineError;
use crate::request::SnapshotRequest;
use relict_core::{AppConfig, SiteSettings, StructureDb, StructureRow};

/// Rewrite the serving domain in a request URL back to the canonical
/// archive-time domain. A single substitution, preserving the rest of the
/// URL byte-for-byte. Without a `domain` setting the URL is used as-is.
fn canonical_url(req: &SnapshotRequest, custom_domain: Option<&str>, original_domain: Option<&str>) -> String {
    let url = req.url();
    let Some(original) = original_domain else {
        return url;
    };

    if let Some(custom) = custom_domain {
        return url.replacen(custom, original, 1);
    }
    if req.host.ends_with(original) {
        return url;
    }
    url.replacen(&req.host, original, 1)
}

/// Trailing-slash alternate of a lookup URL.
///
/// No trailing slash and no query/fragment: the alternate appends one.
/// Trailing slash: the alternate strips it. Otherwise the alternate equals
/// the URL.
fn alternate(url: &str, req: &SnapshotRequest) -> String {
    if !url.ends_with('/') && req.query.is_none() && req.fragment.is_none() {
        format!("{url}/")
    } else if url.ends_with('/') {
        url[..url.len() - 1].to_string()
    } else {
        url.to_string()
    }
}

/// The two lookup forms for a request.
pub fn lookup_keys(req: &SnapshotRequest, settings: &SiteSettings, config: &AppConfig) -> (String, String) {
    let url = canonical_url(req, config.custom_domain.as_deref(), settings.original_domain.as_deref());
    let alt = alternate(&url, req);
    (url, alt)
}

/// Resolve a request to its structure row, if any.
pub async fn resolve(
    store: &StructureDb,
    req: &SnapshotRequest,
    settings: &SiteSettings,
    config: &AppConfig,
) -> Result<Option<StructureRow>, PipelineError> {
    let (url, alt) = lookup_keys(req, settings, config);
    store.find_resource(&url, &alt).await.map_err(Into::into)
}
