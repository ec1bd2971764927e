//! Read-only access to the snapshot structure index.
//!
//! The index is a SQLite database produced by the archiving process; this
//! module only ever reads it. Concurrent readers never block each other and
//! nothing here writes, so no locking is needed for the process lifetime.

pub mod connection;
pub mod settings;
pub mod structure;

pub use crate::Error;

pub use connection::StructureDb;
pub use settings::SiteSettings;
pub use structure::StructureRow;
