//! Unified error types for relict.
//!
//! Everything here is fatal for the request that hits it; the HTTP adapter
//! maps these to a bare 5xx and logs the detail server-side.

use tokio_rusqlite::rusqlite;

/// Unified error types for the relict content loader.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structure index unreachable or malformed.
    #[error("INDEX_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Content root could not be located on disk.
    #[error("CONTENT_ROOT: {0}")]
    ContentRootMissing(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}
