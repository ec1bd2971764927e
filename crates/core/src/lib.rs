//! Core types and shared functionality for relict.
//!
//! This crate provides:
//! - Read-only access to the snapshot structure index (SQLite)
//! - Site settings recorded by the archiver
//! - Unified error types
//! - Configuration structures
//! - Content-root discovery

pub mod config;
pub mod error;
pub mod source;
pub mod store;

pub use config::{AppConfig, InjectPosition, InjectionRule};
pub use error::Error;
pub use store::{SiteSettings, StructureDb, StructureRow};
