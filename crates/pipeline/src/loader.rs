//! Pipeline composition.
//!
//! One request flows: redirect policy, sitemap path match, index resolution,
//! rendering, and finally the 404 fallback chain. Each stage either returns
//! a final response or lets the next stage run; nothing here exits the
//! process. The loader is stateless across requests apart from the shared
//! read-only index handle.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::PipelineError;
use crate::inject::{FileSnippets, SnippetRenderer};
use crate::request::SnapshotRequest;
use crate::response::SnapshotResponse;
use crate::{fallback, redirect, render, resolve, sitemap};
use relict_core::{AppConfig, StructureDb};

/// Resolves requests against one deployed snapshot.
pub struct ContentLoader {
    store: StructureDb,
    config: Arc<AppConfig>,
    source_root: PathBuf,
    snippets: Arc<dyn SnippetRenderer>,
}

impl ContentLoader {
    /// Build a loader over an opened index and a discovered content root.
    ///
    /// Snippet sources default to static files under the content root.
    pub fn new(store: StructureDb, config: Arc<AppConfig>, source_root: impl Into<PathBuf>) -> Self {
        let source_root = source_root.into();
        let snippets: Arc<dyn SnippetRenderer> = Arc::new(FileSnippets::new(source_root.clone()));
        Self { store, config, source_root, snippets }
    }

    /// Swap the snippet renderer implementation.
    pub fn with_snippets(mut self, snippets: Arc<dyn SnippetRenderer>) -> Self {
        self.snippets = snippets;
        self
    }

    /// Resolve one request to its final response.
    ///
    /// Errors are fatal for the request; the HTTP adapter maps them to a
    /// bare 5xx and logs the detail.
    pub async fn handle(&self, req: &SnapshotRequest) -> Result<SnapshotResponse, PipelineError> {
        let settings = self.store.site_settings().await?;

        if let Some(response) = redirect::apply(&settings, req) {
            return Ok(response);
        }

        if self.config.sitemap_path.as_deref() == Some(req.path.as_str()) {
            return sitemap::render(&self.store, req, &settings, &self.config).await;
        }

        if let Some(row) = resolve::resolve(&self.store, req, &settings, &self.config).await? {
            match render::render_row(&row, &self.source_root, req, &self.config, self.snippets.as_ref()).await? {
                Some(response) => return Ok(response),
                None => {
                    tracing::debug!(
                        url = %req.url(),
                        folder = %row.folder,
                        file = %row.filename,
                        "indexed body missing on disk"
                    );
                }
            }
        }

        Ok(fallback::handle(req, &self.config))
    }
}
