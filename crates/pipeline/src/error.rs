//! Pipeline error types.
//!
//! Missing archived bodies are not errors (the 404 fallback chain owns
//! them); everything below is fatal for the request and maps to a 5xx in
//! the HTTP adapter.

/// Errors raised while resolving and rendering a snapshot response.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Structure index failure.
    #[error(transparent)]
    Store(#[from] relict_core::Error),

    /// Injection rule produced an unusable pattern.
    #[error("INJECT_PATTERN: {0}")]
    Pattern(#[from] regex::Error),

    /// Snippet source could not be read.
    #[error("SNIPPET_IO: {path}: {source}")]
    Snippet {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Archived body vanished between the existence check and the read.
    #[error("CONTENT_IO: {path}: {source}")]
    ContentIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
