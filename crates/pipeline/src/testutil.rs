//! On-disk archive fixtures for pipeline tests: a content root with a real
//! structure index plus cached bodies, built the way an export would be.

use relict_core::{StructureDb, StructureRow};
use std::path::Path;
use tempfile::TempDir;
use tokio_rusqlite::rusqlite::{Connection, params};

use crate::inject::FileSnippets;

const SCHEMA: &str = "
CREATE TABLE structure (
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
CREATE INDEX structure_url ON structure (url COLLATE NOCASE, enabled);
CREATE TABLE settings (
    param TEXT PRIMARY KEY,
    value TEXT NOT NULL DEFAULT ''
);
";

pub struct Archive {
    dir: TempDir,
    snippets: FileSnippets,
}

impl Archive {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(dir.path().join("structure.db")).unwrap();
        conn.execute_batch(SCHEMA).unwrap();
        let snippets = FileSnippets::new(dir.path());
        Self { dir, snippets }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn snippets(&self) -> &FileSnippets {
        &self.snippets
    }

    fn conn(&self) -> Connection {
        Connection::open(self.dir.path().join("structure.db")).unwrap()
    }

    pub fn write_body(&self, folder: &str, name: &str, bytes: &[u8]) {
        let dir = self.dir.path().join(folder);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(name), bytes).unwrap();
    }

    pub fn write_snippet(&self, name: &str, text: &str) {
        std::fs::write(self.dir.path().join(name), text).unwrap();
    }

    pub fn insert(&self, row: &StructureRow) {
        self.conn()
            .execute(
                "INSERT INTO structure (url, request_uri, hostname, folder, filename,
                                        mimetype, charset, redirect, enabled, filetime)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    row.url,
                    row.request_uri,
                    row.hostname,
                    row.folder,
                    row.filename,
                    row.mimetype,
                    row.charset,
                    row.redirect,
                    row.enabled as i64,
                    row.filetime,
                ],
            )
            .unwrap();
    }

    pub fn insert_setting(&self, param: &str, value: &str) {
        self.conn()
            .execute("INSERT INTO settings (param, value) VALUES (?1, ?2)", params![param, value])
            .unwrap();
    }

    /// Bulk-insert `count` distinct enabled HTML pages for one hostname.
    pub fn insert_pages(&self, hostname: &str, count: usize) {
        let mut conn = self.conn();
        let tx = conn.transaction().unwrap();
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO structure (url, request_uri, hostname, folder, filename,
                                            mimetype, charset, enabled, filetime)
                     VALUES (?1, ?2, ?3, 'html', 'page.html', 'text/html', 'utf-8', 1, 100)",
                )
                .unwrap();
            for n in 0..count {
                let uri = format!("/page-{n:06}");
                stmt.execute(params![format!("http://{hostname}{uri}"), uri, hostname]).unwrap();
            }
        }
        tx.commit().unwrap();
    }

    pub async fn store(&self) -> StructureDb {
        StructureDb::open(self.dir.path().join("structure.db")).await.unwrap()
    }
}

/// A page row with sensible defaults for one URL.
pub fn html_row(url: &str, request_uri: &str) -> StructureRow {
    StructureRow {
        url: url.to_string(),
        request_uri: request_uri.to_string(),
        hostname: "example.com".to_string(),
        folder: "html".to_string(),
        filename: "page.html".to_string(),
        mimetype: "text/html".to_string(),
        charset: "utf-8".to_string(),
        enabled: true,
        filetime: 100,
        ..Default::default()
    }
}

/// A plain GET request for a path on the serving host.
pub fn request(host: &str, path: &str, query: Option<&str>) -> crate::request::SnapshotRequest {
    crate::request::SnapshotRequest {
        host: host.to_string(),
        path: path.to_string(),
        query: query.map(str::to_string),
        fragment: None,
        secure: false,
        if_none_match: None,
    }
}
