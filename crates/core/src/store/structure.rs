//! Structure row lookups.
//!
//! One row describes one archived resource variant. The serving path only
//! ever selects rows; selection is deterministic: disabled rows are
//! invisible, then the largest `filetime` wins.

use super::connection::StructureDb;
use crate::Error;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// One archived resource variant from the structure index.
#[derive(Debug, Clone, Default)]
pub struct StructureRow {
    /// Original absolute URL; case-insensitive match key.
    pub url: String,
    /// Path plus query as seen by visitors.
    pub request_uri: String,
    /// Origin domain at archive time.
    pub hostname: String,
    /// Directory of the cached body inside the content root.
    pub folder: String,
    /// File name of the cached body.
    pub filename: String,
    pub mimetype: String,
    pub charset: String,
    /// Non-empty means this row is a redirect rule, not a content row.
    pub redirect: String,
    pub enabled: bool,
    /// Capture timestamp; the tie-break when several rows match one URL.
    pub filetime: i64,
}

fn row_from(row: &rusqlite::Row<'_>) -> rusqlite::Result<StructureRow> {
    Ok(StructureRow {
        url: row.get(0)?,
        request_uri: row.get(1)?,
        hostname: row.get(2)?,
        folder: row.get(3)?,
        filename: row.get(4)?,
        mimetype: row.get(5)?,
        charset: row.get(6)?,
        redirect: row.get(7)?,
        enabled: row.get::<_, i64>(8)? != 0,
        filetime: row.get(9)?,
    })
}

impl StructureDb {
    /// Find the archived resource for a URL or its trailing-slash alternate.
    ///
    /// Matching is case-insensitive on the URL key. Among several enabled
    /// rows the most recent `filetime` wins; disabled rows never match.
    pub async fn find_resource(&self, url: &str, alt: &str) -> Result<Option<StructureRow>, Error> {
        let url = url.to_string();
        let alt = alt.to_string();
        self.conn
            .call(move |conn| -> Result<Option<StructureRow>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT url, request_uri, hostname, folder, filename,
                            mimetype, charset, redirect, enabled, filetime
                     FROM structure
                     WHERE (url = ?1 COLLATE NOCASE OR url = ?2 COLLATE NOCASE)
                       AND enabled = 1
                     ORDER BY filetime DESC
                     LIMIT 1",
                )?;

                let result = stmt.query_row(params![url, alt], row_from);

                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)
    }

    /// Count distinct page URIs eligible for the sitemap.
    ///
    /// Eligible rows are enabled, non-redirect, `text/html`, and belong to
    /// the given archive-time hostname.
    pub async fn sitemap_uri_count(&self, hostname: &str) -> Result<u64, Error> {
        let hostname = hostname.to_string();
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 = conn
                    .query_row(
                        "SELECT COUNT(DISTINCT request_uri) FROM structure
                         WHERE hostname = ?1 AND mimetype = 'text/html'
                           AND enabled = 1 AND redirect = ''",
                        params![hostname],
                        |row| row.get(0),
                    )
                    .map_err(Error::from)?;

                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }

    /// Fetch one page of sitemap URIs, deduplicated by request URI and
    /// ordered by it; within one URI the most recent capture represents it.
    pub async fn sitemap_uris(&self, hostname: &str, limit: u64, offset: u64) -> Result<Vec<String>, Error> {
        let hostname = hostname.to_string();
        self.conn
            .call(move |conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT request_uri FROM structure
                     WHERE hostname = ?1 AND mimetype = 'text/html'
                       AND enabled = 1 AND redirect = ''
                     GROUP BY request_uri
                     ORDER BY request_uri, MAX(filetime) DESC
                     LIMIT ?2 OFFSET ?3",
                )?;

                let rows = stmt.query_map(params![hostname, limit as i64, offset as i64], |row| {
                    row.get::<_, String>(0)
                })?;

                let mut uris = Vec::new();
                for uri in rows {
                    uris.push(uri?);
                }
                Ok(uris)
            })
            .await
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn insert(db: &StructureDb, row: StructureRow) {
        db.conn
            .call(move |conn| {
                conn.execute(
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
            })
            .await
            .unwrap();
    }

    fn page(url: &str, filetime: i64) -> StructureRow {
        StructureRow {
            url: url.to_string(),
            request_uri: url.trim_start_matches("http://example.com").to_string(),
            hostname: "example.com".to_string(),
            folder: "html".to_string(),
            filename: "index.html".to_string(),
            mimetype: "text/html".to_string(),
            charset: "utf-8".to_string(),
            enabled: true,
            filetime,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let db = StructureDb::open_in_memory().await.unwrap();
        insert(&db, page("http://example.com/Foo", 100)).await;

        let found = db.find_resource("http://example.com/foo", "http://example.com/foo/").await.unwrap();
        assert_eq!(found.unwrap().url, "http://example.com/Foo");
    }

    #[tokio::test]
    async fn test_alternate_form_matches() {
        let db = StructureDb::open_in_memory().await.unwrap();
        insert(&db, page("http://example.com/about/", 100)).await;

        let found = db.find_resource("http://example.com/about", "http://example.com/about/").await.unwrap();
        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_latest_filetime_wins() {
        let db = StructureDb::open_in_memory().await.unwrap();
        let mut old = page("http://example.com/", 100);
        old.filename = "old.html".to_string();
        let mut new = page("http://example.com/", 200);
        new.filename = "new.html".to_string();
        insert(&db, old).await;
        insert(&db, new).await;

        let found = db.find_resource("http://example.com/", "http://example.com").await.unwrap();
        assert_eq!(found.unwrap().filename, "new.html");
    }

    #[tokio::test]
    async fn test_disabled_rows_never_match() {
        let db = StructureDb::open_in_memory().await.unwrap();
        let mut row = page("http://example.com/gone", 999);
        row.enabled = false;
        insert(&db, row).await;

        let found = db.find_resource("http://example.com/gone", "http://example.com/gone/").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_sitemap_filters_and_dedupes() {
        let db = StructureDb::open_in_memory().await.unwrap();
        insert(&db, page("http://example.com/a", 100)).await;
        insert(&db, page("http://example.com/a", 200)).await;
        insert(&db, page("http://example.com/b", 100)).await;

        let mut redirect = page("http://example.com/r", 100);
        redirect.redirect = "http://example.com/".to_string();
        insert(&db, redirect).await;

        let mut css = page("http://example.com/style.css", 100);
        css.mimetype = "text/css".to_string();
        insert(&db, css).await;

        let mut disabled = page("http://example.com/c", 100);
        disabled.enabled = false;
        insert(&db, disabled).await;

        let mut other_host = page("http://other.com/d", 100);
        other_host.hostname = "other.com".to_string();
        insert(&db, other_host).await;

        assert_eq!(db.sitemap_uri_count("example.com").await.unwrap(), 2);
        let uris = db.sitemap_uris("example.com", 50, 0).await.unwrap();
        assert_eq!(uris, vec!["/a".to_string(), "/b".to_string()]);
    }

    #[tokio::test]
    async fn test_sitemap_pagination_offsets() {
        let db = StructureDb::open_in_memory().await.unwrap();
        for name in ["a", "b", "c", "d"] {
            insert(&db, page(&format!("http://example.com/{name}"), 100)).await;
        }

        let first = db.sitemap_uris("example.com", 2, 0).await.unwrap();
        let second = db.sitemap_uris("example.com", 2, 2).await.unwrap();
        assert_eq!(first, vec!["/a".to_string(), "/b".to_string()]);
        assert_eq!(second, vec!["/c".to_string(), "/d".to_string()]);
    }
}
