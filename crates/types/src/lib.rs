//! Shared data model for the almanac pipeline: the registry set, remote
//! collection snapshots, version ordering, the persisted versions document
//! and native-identifier restoration.

pub mod collection;
pub mod manifest;
pub mod registry;
pub mod restore;
pub mod version;

pub use collection::{Collection, FINISHED_INGEST_KEY, split_collection_name};
pub use manifest::{PackageVersions, VersionsFile};
pub use registry::{Registry, UnknownRegistry};
pub use restore::restore_candidates;
pub use version::{VERSION_PATTERN, parse_dotted_version, sort_versions_descending};
