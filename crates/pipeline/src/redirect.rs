//! Domain-level redirect policy.
//!
//! Runs once per request before anything else. Policy order is fixed:
//! the https upgrade is checked before the www strip, and the first rule
//! that fires terminates the request with a single 301.

use crate::request::SnapshotRequest;
use crate::response::SnapshotResponse;
use relict_core::SiteSettings;

/// Apply the https / non-www settings to a request.
///
/// Returns the terminating redirect, or `None` to continue the pipeline.
pub fn apply(settings: &SiteSettings, req: &SnapshotRequest) -> Option<SnapshotResponse> {
    if settings.force_https && !req.secure {
        return Some(SnapshotResponse::moved(format!("https://{}{}", req.host, req.request_uri())));
    }

    if settings.strip_www {
        if let Some(host) = req.host.strip_prefix("www.") {
            return Some(SnapshotResponse::moved(format!("{}://{}{}", req.scheme(), host, req.request_uri())));
        }
    }

    None
}
