//! axum adapter for the snapshot pipeline.
//!
//! A single catch-all handler maps every request onto the pipeline's request
//! surface and the pipeline's response back onto axum's. File bodies stream
//! through `ReaderStream` in bounded chunks. Pipeline errors surface as a
//! bare 503; the detail stays in the server log.

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::Response;
use relict_pipeline::{ContentLoader, ResponseBody, SnapshotRequest, SnapshotResponse};
use std::sync::Arc;
use tokio_util::io::ReaderStream;

/// Build the application router: every path falls through to the loader.
pub fn router(loader: Arc<ContentLoader>) -> Router {
    Router::new().fallback(serve).with_state(loader)
}

async fn serve(State(loader): State<Arc<ContentLoader>>, uri: Uri, headers: HeaderMap) -> Response {
    let request = snapshot_request(&uri, &headers);
    match loader.handle(&request).await {
        Ok(response) => into_http(response).await,
        Err(err) => {
            tracing::error!(error = %err, url = %request.url(), "request failed");
            status_only(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

fn header_str<'h>(headers: &'h HeaderMap, name: header::HeaderName) -> Option<&'h str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

fn snapshot_request(uri: &Uri, headers: &HeaderMap) -> SnapshotRequest {
    // Behind nginx/Apache the TLS edge announces itself via X-Forwarded-Proto.
    let secure = header_str(headers, header::HeaderName::from_static("x-forwarded-proto"))
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"));

    SnapshotRequest {
        host: header_str(headers, header::HOST).unwrap_or("localhost").to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        fragment: None,
        secure,
        if_none_match: header_str(headers, header::IF_NONE_MATCH).map(str::to_string),
    }
}

fn status_only(status: StatusCode) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    response
}

async fn into_http(snapshot: SnapshotResponse) -> Response {
    let mut builder = Response::builder().status(snapshot.status);

    if let Some(location) = &snapshot.location {
        builder = builder.header(header::LOCATION, location);
    }
    if let Some(content_type) = &snapshot.content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    if let Some(length) = snapshot.content_length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }
    if let Some(etag) = &snapshot.etag {
        builder = builder.header(header::ETAG, etag);
    }
    if let Some(cache_control) = &snapshot.cache_control {
        builder = builder.header(header::CACHE_CONTROL, cache_control);
    }
    if let Some(last_modified) = &snapshot.last_modified {
        builder = builder.header(header::LAST_MODIFIED, last_modified);
    }

    let body = match snapshot.body {
        ResponseBody::Empty => Body::empty(),
        ResponseBody::Full(bytes) => Body::from(bytes),
        ResponseBody::File(path) => match tokio::fs::File::open(&path).await {
            Ok(file) => Body::from_stream(ReaderStream::new(file)),
            Err(err) => {
                tracing::error!(error = %err, path = %path.display(), "archived body unreadable");
                return status_only(StatusCode::SERVICE_UNAVAILABLE);
            }
        },
    };

    builder.body(body).unwrap_or_else(|err| {
        tracing::error!(error = %err, "response assembly failed");
        status_only(StatusCode::SERVICE_UNAVAILABLE)
    })
}
