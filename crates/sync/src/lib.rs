//! The synchronization engine.
//!
//! A [`job::SyncJob`] reconciles the remote collections of every registry
//! database against the repository's `versions.json`: it lists every
//! collection, keeps the ingest-complete ones, rebuilds the versions
//! document from scratch, marks each qualifying collection public on the
//! dashboard backend (with retry), and only then commits the document to
//! disk. Publishing and persistence form a conditional chain: a document
//! is never written if any publish call exhausted its retries.

pub mod config;
pub mod error;
pub mod job;
pub mod manifest;
pub mod retry;
pub mod store;

pub use config::SyncConfig;
pub use error::{Result, SyncError};
pub use job::{SyncJob, SyncReport};
pub use retry::RetryPolicy;
pub use store::VersionsStore;
