//! HTTP response synthesis for resolved structure rows.
//!
//! Redirect rows terminate immediately. Content rows get their archived
//! MIME type back, a strong validator for cacheable types, and either a
//! fully buffered body (HTML, which runs through snippet injection) or a
//! chunked file stream (everything else), so large downloads never sit in
//! memory whole. The validator hash streams the same way.

use bytes::Bytes;
use chrono::DateTime;
use sha2::{Digest, Sha256};
use std::path::Path;
use tokio::io::AsyncReadExt;

use crate::error::PipelineError;
use crate::inject::{self, SnippetRenderer};
use crate::request::SnapshotRequest;
use crate::response::{ResponseBody, SnapshotResponse};
use relict_core::{AppConfig, StructureRow};

/// MIME types that carry a `; charset=` parameter.
const TEXT_TYPES: &[&str] =
    &["text/html", "text/css", "text/xml", "application/javascript", "application/x-javascript"];

/// MIME types cached with a strong validator and `Cache-Control`.
const CACHEABLE_TYPES: &[&str] = &[
    "application/x-javascript",
    "application/font-woff",
    "application/javascript",
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/svg+xml",
    "image/tiff",
    "image/webp",
    "image/x-icon",
    "image/x-ms-bmp",
    "text/css",
    "text/javascript",
];

const HASH_CHUNK: usize = 64 * 1024;

fn content_type_for(mimetype: &str, charset: &str) -> String {
    if TEXT_TYPES.contains(&mimetype) { format!("{mimetype}; charset={charset}") } else { mimetype.to_string() }
}

/// Strong validator over in-memory bytes.
fn bytes_etag(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Strong validator over a file, hashed in bounded chunks.
async fn file_etag(path: &Path) -> Result<String, PipelineError> {
    let io_err = |source| PipelineError::ContentIo { path: path.display().to_string(), source };

    let mut file = tokio::fs::File::open(path).await.map_err(io_err)?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; HASH_CHUNK];
    loop {
        let read = file.read(&mut buf).await.map_err(io_err)?;
        if read == 0 {
            break;
        }
        hasher.update(&buf[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// True when the conditional-GET validator matches the computed ETag.
///
/// Accepts quoted and weak forms; the stored hash is unquoted.
fn validator_matches(if_none_match: Option<&str>, etag: &str) -> bool {
    let Some(raw) = if_none_match else {
        return false;
    };
    raw.split(',').any(|candidate| {
        let candidate = candidate.trim();
        let candidate = candidate.strip_prefix("W/").unwrap_or(candidate);
        candidate.trim_matches('"') == etag
    })
}

fn http_date(filetime: i64) -> Option<String> {
    DateTime::from_timestamp(filetime, 0).map(|t| t.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
}

/// Attach validator and cache headers; short-circuits to 304 on a match.
///
/// Returns `true` when the response became a 304 and needs no body.
fn apply_cache_headers(
    response: &mut SnapshotResponse,
    etag: String,
    req: &SnapshotRequest,
    config: &AppConfig,
) -> bool {
    response.etag = Some(format!("\"{etag}\""));
    if config.cache_max_age > 0 {
        response.cache_control = Some(format!("public, max-age={}", config.cache_max_age));
    }
    if validator_matches(req.if_none_match.as_deref(), &etag) {
        response.status = 304;
        response.body = ResponseBody::Empty;
        response.content_length = None;
        return true;
    }
    false
}

/// Render a resolved structure row into a response.
///
/// Returns `None` when the indexed body is missing on disk; a matched index
/// row without a body is treated identically to an unmatched URL, and the
/// caller routes it into the 404 fallback chain.
pub async fn render_row(
    row: &StructureRow,
    source_root: &Path,
    req: &SnapshotRequest,
    config: &AppConfig,
    snippets: &dyn SnippetRenderer,
) -> Result<Option<SnapshotResponse>, PipelineError> {
    if !row.redirect.is_empty() {
        return Ok(Some(SnapshotResponse::moved(row.redirect.clone())));
    }

    let path = source_root.join(&row.folder).join(&row.filename);
    let meta = match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => meta,
        _ => return Ok(None),
    };

    let mut response = SnapshotResponse::ok();
    response.content_type = Some(content_type_for(&row.mimetype, &row.charset));
    response.last_modified = http_date(row.filetime);

    if CACHEABLE_TYPES.contains(&row.mimetype.as_str()) {
        let etag = file_etag(&path).await?;
        if apply_cache_headers(&mut response, etag, req, config) {
            return Ok(Some(response));
        }
    }

    if row.mimetype.starts_with("text/html") {
        let raw = tokio::fs::read(&path)
            .await
            .map_err(|source| PipelineError::ContentIo { path: path.display().to_string(), source })?;
        let processed = inject::apply_rules(Bytes::from(raw), &config.inject, snippets).await?;
        response.content_length = Some(processed.len() as u64);
        response.body = ResponseBody::Full(processed);
    } else {
        response.content_length = Some(meta.len());
        response.body = ResponseBody::File(path);
    }

    Ok(Some(response))
}

/// Render an embedded fallback asset through the standard header logic, so
/// placeholders are cacheable exactly like ordinary hits.
pub(crate) fn render_inline(
    bytes: &'static [u8],
    mimetype: &str,
    charset: &str,
    req: &SnapshotRequest,
    config: &AppConfig,
) -> SnapshotResponse {
    let mut response = SnapshotResponse::ok();
    response.content_type = Some(content_type_for(mimetype, charset));

    if CACHEABLE_TYPES.contains(&mimetype) {
        let etag = bytes_etag(bytes);
        if apply_cache_headers(&mut response, etag, req, config) {
            return response;
        }
    }

    response.content_length = Some(bytes.len() as u64);
    response.body = ResponseBody::Full(Bytes::from_static(bytes));
    response
}
