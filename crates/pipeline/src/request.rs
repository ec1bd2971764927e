//! The HTTP request surface the pipeline consumes.

/// The slice of an incoming HTTP request the pipeline needs.
///
/// The surrounding server runtime owns everything else (timeouts, transport,
/// method handling); an archive serves every method the same way.
#[derive(Debug, Clone)]
pub struct SnapshotRequest {
    /// Host the request arrived on, which may differ from the archived domain.
    pub host: String,
    /// Decoded request path, always starting with `/`.
    pub path: String,
    /// Raw query string without the leading `?`.
    pub query: Option<String>,
    /// Fragment, in the rare case the caller has one (proxied rewrites).
    pub fragment: Option<String>,
    /// Whether the transport is TLS (directly or via a trusted proxy header).
    pub secure: bool,
    /// Conditional-GET validator from `If-None-Match`.
    pub if_none_match: Option<String>,
}

impl SnapshotRequest {
    pub fn scheme(&self) -> &'static str {
        if self.secure { "https" } else { "http" }
    }

    /// Path plus query, exactly as visitors saw it.
    pub fn request_uri(&self) -> String {
        match &self.query {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path.clone(),
        }
    }

    /// Absolute URL of the request on the current serving domain.
    pub fn url(&self) -> String {
        format!("{}://{}{}", self.scheme(), self.host, self.request_uri())
    }

    /// First value of a query parameter, percent-decoded.
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.query.as_deref()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}
