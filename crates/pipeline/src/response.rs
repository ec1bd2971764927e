//! The HTTP response surface the pipeline produces.

use bytes::Bytes;
use std::path::PathBuf;

/// How the response body reaches the client.
#[derive(Debug, Clone)]
pub enum ResponseBody {
    /// No body (redirects, 304, bare 404).
    Empty,
    /// Fully buffered body: post-processed HTML, placeholder assets, sitemaps.
    Full(Bytes),
    /// Streamed from the content root in bounded chunks by the HTTP adapter.
    File(PathBuf),
}

/// A synthesized snapshot response.
///
/// Carries exactly the header surface the loader ever sets; the HTTP adapter
/// maps it onto the real response type of the server runtime.
#[derive(Debug, Clone)]
pub struct SnapshotResponse {
    pub status: u16,
    pub location: Option<String>,
    pub content_type: Option<String>,
    pub content_length: Option<u64>,
    /// Strong validator, already quoted for the wire.
    pub etag: Option<String>,
    pub cache_control: Option<String>,
    pub last_modified: Option<String>,
    pub body: ResponseBody,
}

impl SnapshotResponse {
    fn empty(status: u16) -> Self {
        Self {
            status,
            location: None,
            content_type: None,
            content_length: None,
            etag: None,
            cache_control: None,
            last_modified: None,
            body: ResponseBody::Empty,
        }
    }

    /// Permanent redirect with no body.
    pub fn moved(location: impl Into<String>) -> Self {
        Self { location: Some(location.into()), ..Self::empty(301) }
    }

    /// 200 response with default headers; callers fill in the rest.
    pub fn ok() -> Self {
        Self::empty(200)
    }

    /// Bare 404 with no body.
    pub fn not_found() -> Self {
        Self::empty(404)
    }
}
