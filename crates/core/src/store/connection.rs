//! Database connection management for the structure index.
//!
//! The index lives inside the content root and is opened strictly read-only;
//! the archiving process that produced it has exclusive write ownership.

use crate::Error;
use std::path::Path;
use tokio_rusqlite::Connection;
use tokio_rusqlite::rusqlite::{self, OpenFlags};

/// Primary index file inside the content root.
const INDEX_FILE: &str = "structure.db";

/// Fallback index exported for SQLite runtimes older than 3.7.0.
const LEGACY_INDEX_FILE: &str = "structure.legacy.db";

/// Schema of an exported snapshot index, applied by [`StructureDb::open_in_memory`]
/// so tests and tooling can build fixtures without a real export.
const ARCHIVE_SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS structure (
    id INTEGER PRIMARY KEY,
    url TEXT NOT NULL,
    request_uri TEXT NOT NULL DEFAULT '',
    hostname TEXT NOT NULL DEFAULT '',
    folder TEXT NOT NULL DEFAULT '',
    filename TEXT NOT NULL DEFAULT '',
    mimetype TEXT NOT NULL DEFAULT '',
    charset TEXT NOT NULL DEFAULT '',
    redirect TEXT NOT NULL DEFAULT '',
    enabled INTEGER NOT NULL DEFAULT 1,
    filetime INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS structure_url ON structure (url COLLATE NOCASE, enabled);
CREATE TABLE IF NOT EXISTS settings (
    param TEXT PRIMARY KEY,
    value TEXT NOT NULL DEFAULT ''
);
";

/// Structure index handle.
///
/// Wraps a tokio-rusqlite Connection that runs database operations
/// on a background thread.
#[derive(Clone, Debug)]
pub struct StructureDb {
    pub(crate) conn: Connection,
}

impl StructureDb {
    /// Open the index that lives inside a content root.
    ///
    /// Picks `structure.db`, or `structure.legacy.db` when the linked SQLite
    /// runtime predates 3.7.0.
    pub async fn open_in_root(root: impl AsRef<Path>) -> Result<Self, Error> {
        let file = if rusqlite::version_number() >= 3_007_000 { INDEX_FILE } else { LEGACY_INDEX_FILE };
        Self::open(root.as_ref().join(file)).await
    }

    /// Open a structure index read-only.
    ///
    /// Fails when the file is absent or not a database; that is fatal for
    /// the request and maps to a 5xx upstream.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .await
        .map_err(|e| Error::Database(e.into()))?;

        Ok(Self { conn })
    }

    /// Open an in-memory index with the archiver schema applied.
    ///
    /// Read-write, for tests and tooling only; the serving path never writes.
    pub async fn open_in_memory() -> Result<Self, Error> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| Error::Database(e.into()))?;

        conn.call(|conn| {
            conn.execute_batch(ARCHIVE_SCHEMA)?;
            Ok(())
        })
        .await
        .map_err(Error::Database)?;

        Ok(Self { conn })
    }
}
