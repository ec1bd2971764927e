//! Request-to-snapshot pipeline for relict.
//!
//! This crate turns an incoming request into a synthesized response against
//! an archived snapshot: domain-level redirect policy, URL normalization and
//! index lookup, response rendering with conditional caching, ordered HTML
//! snippet injection, the layered 404 fallback chain, and paginated sitemap
//! generation.
//!
//! Stages short-circuit by returning a final [`SnapshotResponse`] instead of
//! terminating the process, so each stage is testable on its own.

pub mod error;
pub mod fallback;
pub mod inject;
pub mod loader;
pub mod redirect;
pub mod render;
pub mod request;
pub mod resolve;
pub mod response;
pub mod sitemap;

#[cfg(test)]
mod testutil;

pub use error::PipelineError;
pub use inject::{FileSnippets, SnippetRenderer};
pub use loader::ContentLoader;
pub use request::SnapshotRequest;
pub use response::{ResponseBody, SnapshotResponse};
