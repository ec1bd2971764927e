//! Layered 404 fallback chain.
//!
//! Missing content is an expected steady-state condition in an archive, not
//! an exception. The chain is ordered and the first applicable branch wins:
//! extension-specific placeholders first, then the missing-html redirect,
//! then a bare 404. Placeholder bytes are compiled in, never read from the
//! snapshot, and go through the same cache-header logic as ordinary hits.

use crate::render;
use crate::request::SnapshotRequest;
use crate::response::SnapshotResponse;
use relict_core::AppConfig;

const PLACEHOLDER_PNG: &[u8] = include_bytes!("../assets/1px.png");
const EMPTY_ICO: &[u8] = include_bytes!("../assets/empty.ico");
const EMPTY_CSS: &[u8] = b"";
const EMPTY_JS: &[u8] = b"";

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "gif", "png", "bmp"];

/// Lowercased file extension of a request path, query excluded.
fn extension(path: &str) -> Option<String> {
    let name = path.rsplit('/').next()?;
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() { None } else { Some(ext.to_ascii_lowercase()) }
}

/// Decide the response for a missing resource.
pub fn handle(req: &SnapshotRequest, config: &AppConfig) -> SnapshotResponse {
    if let Some(ext) = extension(&req.path) {
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) && config.fix_missing_images {
            return render::render_inline(PLACEHOLDER_PNG, "image/png", "binary", req, config);
        }
        if ext == "ico" && config.fix_missing_ico {
            return render::render_inline(EMPTY_ICO, "image/x-icon", "binary", req, config);
        }
        if ext == "css" && config.fix_missing_css {
            return render::render_inline(EMPTY_CSS, "text/css", "utf-8", req, config);
        }
        if ext == "js" && config.fix_missing_js {
            return render::render_inline(EMPTY_JS, "application/javascript", "utf-8", req, config);
        }
    }

    if let Some(target) = config.redirect_missing_html.as_deref() {
        if !target.is_empty() && target != req.request_uri() {
            return SnapshotResponse::moved(target.to_string());
        }
    }

    SnapshotResponse::not_found()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::ResponseBody;
    use crate::testutil::request;

    #[test]
    fn test_extension_parsing() {
        assert_eq!(extension("/img/photo.PNG").as_deref(), Some("png"));
        assert_eq!(extension("/style.css").as_deref(), Some("css"));
        assert_eq!(extension("/a.b/readme"), None);
        assert_eq!(extension("/page"), None);
        assert_eq!(extension("/trailing."), None);
    }

    #[test]
    fn test_missing_image_gets_placeholder_over_redirect() {
        // Extension-specific rules outrank the generic redirect.
        let config = AppConfig { redirect_missing_html: Some("/".into()), ..Default::default() };
        let response = handle(&request("example.com", "/missing.png", None), &config);
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type.as_deref(), Some("image/png"));
        let ResponseBody::Full(body) = &response.body else {
            panic!("placeholder must be buffered");
        };
        assert_eq!(&body[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_missing_icon() {
        let response = handle(&request("example.com", "/favicon.ico", None), &AppConfig::default());
        assert_eq!(response.content_type.as_deref(), Some("image/x-icon"));
    }

    #[test]
    fn test_missing_css_and_js_carry_charset() {
        let css = handle(&request("example.com", "/gone.css", None), &AppConfig::default());
        assert_eq!(css.content_type.as_deref(), Some("text/css; charset=utf-8"));
        assert_eq!(css.content_length, Some(0));

        let js = handle(&request("example.com", "/gone.js", None), &AppConfig::default());
        assert_eq!(js.content_type.as_deref(), Some("application/javascript; charset=utf-8"));
    }

    #[test]
    fn test_disabled_toggle_falls_through_to_redirect() {
        let config = AppConfig { fix_missing_images: false, ..Default::default() };
        let response = handle(&request("example.com", "/missing.png", None), &config);
        assert_eq!(response.status, 301);
        assert_eq!(response.location.as_deref(), Some("/"));
    }

    #[test]
    fn test_missing_html_redirects() {
        let response = handle(&request("example.com", "/gone.html", None), &AppConfig::default());
        assert_eq!(response.status, 301);
        assert_eq!(response.location.as_deref(), Some("/"));
    }

    #[test]
    fn test_redirect_skipped_when_target_is_current_uri() {
        let response = handle(&request("example.com", "/", None), &AppConfig::default());
        assert_eq!(response.status, 404);
        assert!(matches!(response.body, ResponseBody::Empty));
    }

    #[test]
    fn test_no_redirect_configured_yields_404() {
        let config = AppConfig { redirect_missing_html: None, ..Default::default() };
        let response = handle(&request("example.com", "/gone.html", None), &config);
        assert_eq!(response.status, 404);
    }

    #[test]
    fn test_placeholder_304_round_trip() {
        let config = AppConfig::default();
        let first = handle(&request("example.com", "/missing.png", None), &config);
        let etag = first.etag.clone().unwrap();
        assert_eq!(first.cache_control.as_deref(), Some("public, max-age=2592000"));

        let mut again = request("example.com", "/missing.png", None);
        again.if_none_match = Some(etag);
        let second = handle(&again, &config);
        assert_eq!(second.status, 304);
        assert!(matches!(second.body, ResponseBody::Empty));
    }
}
