//! HTTP clients for the data plane and the dashboard backend.
//!
//! Remote capabilities are expressed as traits ([`CollectionCatalog`] for
//! reads, [`CollectionPublisher`] for the public-catalog write) with one
//! reqwest-backed implementation each, so the sync engine can be driven by
//! in-memory implementations in tests.

pub mod catalog;
pub mod error;
pub mod publish;

pub use catalog::{CloudCatalog, CollectionCatalog};
pub use error::{ClientError, Result};
pub use publish::{CollectionPublisher, DashboardPublisher, PublishOutcome};
