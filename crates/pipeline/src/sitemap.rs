//! Paginated XML sitemap generation.
//!
//! The sitemap lists every enabled, non-redirect HTML page of the canonical
//! archive domain, deduplicated by request URI. A single URL-set document
//! holds up to [`PAGE_LIMIT`] URLs; above that an index document points at
//! per-page children addressed with an `id` query parameter. Output URLs are
//! absolute on the current scheme and host, XML-escaped.

use crate::error::PipelineError;
use crate::request::SnapshotRequest;
use crate::response::{ResponseBody, SnapshotResponse};
use bytes::Bytes;
use relict_core::{AppConfig, SiteSettings, StructureDb};

/// Maximum URLs per sitemap document, per the sitemap protocol.
pub const PAGE_LIMIT: u64 = 50_000;

const XMLNS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Archive-time domain the sitemap query keys on.
///
/// With a custom serving domain configured, its suffix is swapped for the
/// original domain so subdomain deployments keep their own sitemaps.
fn sitemap_domain(req: &SnapshotRequest, settings: &SiteSettings, config: &AppConfig) -> String {
    let original = settings.original_domain.as_deref().unwrap_or(&req.host);
    match config.custom_domain.as_deref().and_then(|custom| req.host.strip_suffix(custom)) {
        Some(prefix) => format!("{prefix}{original}"),
        None => original.to_string(),
    }
}

/// Positive page number within range, else `None`.
fn parse_page(raw: &str, pages: u64) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let page: u64 = raw.parse().ok()?;
    (1..=pages).contains(&page).then_some(page)
}

fn url_set(req: &SnapshotRequest, uris: &[String]) -> String {
    let mut out = format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?><urlset xmlns=\"{XMLNS}\">");
    for uri in uris {
        let loc = format!("{}://{}{}", req.scheme(), req.host, uri);
        out.push_str("<url><loc>");
        out.push_str(&xml_escape(&loc));
        out.push_str("</loc></url>");
    }
    out.push_str("</urlset>");
    out
}

fn index(req: &SnapshotRequest, pages: u64) -> String {
    let mut out = format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?><sitemapindex xmlns=\"{XMLNS}\">");
    for page in 1..=pages {
        let loc = format!("{}://{}{}?id={page}", req.scheme(), req.host, req.path);
        out.push_str("<sitemap><loc>");
        out.push_str(&xml_escape(&loc));
        out.push_str("</loc></sitemap>");
    }
    out.push_str("</sitemapindex>");
    out
}

fn xml_response(body: String) -> SnapshotResponse {
    let bytes = Bytes::from(body);
    let mut response = SnapshotResponse::ok();
    response.content_type = Some("text/xml; charset=utf-8".to_string());
    response.content_length = Some(bytes.len() as u64);
    response.body = ResponseBody::Full(bytes);
    response
}

/// Render the sitemap for a request: an index, one page, or the full set.
pub async fn render(
    store: &StructureDb,
    req: &SnapshotRequest,
    settings: &SiteSettings,
    config: &AppConfig,
) -> Result<SnapshotResponse, PipelineError> {
    let domain = sitemap_domain(req, settings, config);
    let total = store.sitemap_uri_count(&domain).await?;
    let pages = total.div_ceil(PAGE_LIMIT);

    if let Some(raw) = req.query_param("id") {
        let Some(page) = parse_page(&raw, pages) else {
            return Ok(SnapshotResponse::not_found());
        };
        let uris = store.sitemap_uris(&domain, PAGE_LIMIT, (page - 1) * PAGE_LIMIT).await?;
        return Ok(xml_response(url_set(req, &uris)));
    }

    if total > PAGE_LIMIT {
        return Ok(xml_response(index(req, pages)));
    }

    let uris = store.sitemap_uris(&domain, PAGE_LIMIT, 0).await?;
    Ok(xml_response(url_set(req, &uris)))
}
