use std::collections::BTreeMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{error, info, warn};

use almanac_client::{
    CloudCatalog, CollectionCatalog, CollectionPublisher, DashboardPublisher, PublishOutcome,
};
use almanac_types::{Collection, Registry};

use crate::config::SyncConfig;
use crate::error::{Result, SyncError};
use crate::manifest::build_versions_file;
use crate::retry::RetryPolicy;
use crate::store::VersionsStore;

/// Cap on individually logged item-level failures; the rest collapse
/// into an overflow count.
const MAX_LOGGED_ITEM_ERRORS: usize = 10;

/// Summary of one completed run.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub listed: usize,
    pub qualifying: usize,
    pub published: usize,
    pub already_public: usize,
    /// `database/name: reason` for every failed metadata check. These are
    /// warnings: the affected collections are excluded and the run
    /// continues.
    pub metadata_errors: Vec<String>,
    /// `database/name` for every collection whose name could not be split
    /// into a (prefix, version) pair.
    pub unparseable_names: Vec<String>,
}

/// One full reconciliation run.
///
/// Phases run strictly in sequence, each draining its whole work pool
/// before the next begins. Within a phase, work items fan out across the
/// union of all databases at once rather than database-by-database:
/// latency is dominated by round trips, not by which database a call
/// touches. Results are merged single-threaded after each join, so tasks
/// share no mutable state.
pub struct SyncJob {
    catalogs: BTreeMap<Registry, Arc<dyn CollectionCatalog>>,
    publisher: Arc<dyn CollectionPublisher>,
    store: VersionsStore,
    read_concurrency: usize,
    write_concurrency: usize,
    retry: RetryPolicy,
}

enum MetadataCheck {
    Qualifying(Box<Collection>),
    NotQualifying,
    Missing,
    Failed(String),
}

impl SyncJob {
    /// Wires a job against caller-supplied clients. Tests drive the
    /// engine through this with in-memory implementations.
    pub fn new(
        catalogs: BTreeMap<Registry, Arc<dyn CollectionCatalog>>,
        publisher: Arc<dyn CollectionPublisher>,
        store: VersionsStore,
        read_concurrency: usize,
        write_concurrency: usize,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            catalogs,
            publisher,
            store,
            read_concurrency,
            write_concurrency,
            retry,
        }
    }

    /// Wires a job against the real cloud catalogs and dashboard backend
    /// described by `config`, one catalog per registry database.
    pub fn from_config(config: &SyncConfig) -> Self {
        let http = reqwest::Client::new();
        let tenant = config.tenant_id.to_string();

        let catalogs = Registry::ALL
            .iter()
            .map(|&registry| {
                let catalog = CloudCatalog::new(
                    http.clone(),
                    &config.api_url,
                    &tenant,
                    registry.as_str(),
                    config.api_key.as_str(),
                );
                (registry, Arc::new(catalog) as Arc<dyn CollectionCatalog>)
            })
            .collect();

        let publisher = Arc::new(DashboardPublisher::new(
            http,
            &config.backend_url,
            config.team_id.as_str(),
            config.api_key.as_str(),
        ));

        Self::new(
            catalogs,
            publisher,
            VersionsStore::new(config.versions_path.clone()),
            config.read_concurrency,
            config.write_concurrency,
            RetryPolicy {
                max_attempts: config.max_publish_attempts,
                base_delay: config.retry_base_delay,
            },
        )
    }

    /// Runs the whole reconciliation: list, filter, rebuild, publish,
    /// commit. Returns the run report on full success.
    pub async fn run(&self) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        self.log_counts().await;

        info!(databases = self.catalogs.len(), "listing collections");
        let listed = self.list_all().await?;
        report.listed = listed.values().map(Vec::len).sum();

        info!(total = report.listed, "checking collection metadata");
        let qualifying = self.filter_qualifying(listed, &mut report).await;
        report.qualifying = qualifying.values().map(Vec::len).sum();
        report.metadata_errors.sort();
        self.log_item_errors(&report.metadata_errors);
        for (registry, collections) in &qualifying {
            info!(
                database = registry.as_str(),
                count = collections.len(),
                "ingest-complete collections"
            );
        }

        let mut outcome = build_versions_file(&qualifying);
        outcome.unparseable.sort();
        report.unparseable_names = outcome.unparseable;

        self.publish_all(&qualifying, &mut report).await?;

        self.store.save(&outcome.document)?;
        info!(path = %self.store.path().display(), "versions file committed");

        Ok(report)
    }

    /// Per-database collection counts, logged as progress context before
    /// listing starts. Count failures are not fatal.
    async fn log_counts(&self) {
        let results: Vec<(Registry, almanac_client::Result<usize>)> =
            stream::iter(self.catalogs.iter())
                .map(|(&registry, catalog)| {
                    let catalog = Arc::clone(catalog);
                    async move { (registry, catalog.count_collections().await) }
                })
                .buffer_unordered(self.read_concurrency)
                .collect()
                .await;

        let mut total = 0usize;
        for (registry, result) in results {
            match result {
                Ok(count) => {
                    info!(database = registry.as_str(), count, "collections in database");
                    total += count;
                }
                Err(err) => warn!(
                    database = registry.as_str(),
                    error = %err,
                    "failed to count collections, continuing"
                ),
            }
        }
        info!(total, "collections to process");
    }

    /// Lists every database concurrently. Any single listing failure
    /// fails the run: a partial listing would silently drop every version
    /// of the unlisted databases from the rebuilt document.
    async fn list_all(&self) -> Result<BTreeMap<Registry, Vec<String>>> {
        let results: Vec<(Registry, almanac_client::Result<Vec<String>>)> =
            stream::iter(self.catalogs.iter())
                .map(|(&registry, catalog)| {
                    let catalog = Arc::clone(catalog);
                    async move { (registry, catalog.list_collections().await) }
                })
                .buffer_unordered(self.read_concurrency)
                .collect()
                .await;

        let mut listed = BTreeMap::new();
        let mut failures = Vec::new();
        for (registry, result) in results {
            match result {
                Ok(names) => {
                    info!(
                        database = registry.as_str(),
                        count = names.len(),
                        "listed collections"
                    );
                    listed.insert(registry, names);
                }
                Err(err) => {
                    error!(database = registry.as_str(), error = %err, "failed to list collections");
                    failures.push(format!("{}: {err}", registry.as_str()));
                }
            }
        }

        if !failures.is_empty() {
            failures.sort();
            return Err(SyncError::ListingFailed { failures });
        }
        Ok(listed)
    }

    /// Checks metadata for the union of all listed collections and keeps
    /// the ingest-complete ones. Item failures are recorded and the item
    /// excluded; the run continues with a smaller but consistent set.
    async fn filter_qualifying(
        &self,
        listed: BTreeMap<Registry, Vec<String>>,
        report: &mut SyncReport,
    ) -> BTreeMap<Registry, Vec<Collection>> {
        let mut items = Vec::new();
        for (registry, names) in listed {
            if let Some(catalog) = self.catalogs.get(&registry) {
                for name in names {
                    items.push((registry, name, Arc::clone(catalog)));
                }
            }
        }

        let results: Vec<(Registry, String, MetadataCheck)> = stream::iter(items)
            .map(|(registry, name, catalog)| async move {
                let check = match catalog.get_collection(&name).await {
                    Ok(Some(collection)) if collection.is_ingest_complete() => {
                        MetadataCheck::Qualifying(Box::new(collection))
                    }
                    Ok(Some(_)) => MetadataCheck::NotQualifying,
                    Ok(None) => MetadataCheck::Missing,
                    Err(err) => MetadataCheck::Failed(err.to_string()),
                };
                (registry, name, check)
            })
            .buffer_unordered(self.read_concurrency)
            .collect()
            .await;

        let mut qualifying: BTreeMap<Registry, Vec<Collection>> = self
            .catalogs
            .keys()
            .map(|&registry| (registry, Vec::new()))
            .collect();

        for (registry, name, check) in results {
            match check {
                MetadataCheck::Qualifying(collection) => {
                    qualifying.entry(registry).or_default().push(*collection);
                }
                MetadataCheck::NotQualifying => {}
                MetadataCheck::Missing => report.metadata_errors.push(format!(
                    "{}/{name}: collection disappeared between listing and metadata check",
                    registry.as_str()
                )),
                MetadataCheck::Failed(reason) => report
                    .metadata_errors
                    .push(format!("{}/{name}: {reason}", registry.as_str())),
            }
        }

        qualifying
    }

    /// Marks every qualifying collection public through the retry policy.
    /// A single exhausted item fails the run before the commit: the
    /// versions file must never claim a collection that was not actually
    /// published.
    async fn publish_all(
        &self,
        qualifying: &BTreeMap<Registry, Vec<Collection>>,
        report: &mut SyncReport,
    ) -> Result<()> {
        let items: Vec<(Registry, &Collection)> = qualifying
            .iter()
            .flat_map(|(&registry, collections)| {
                collections.iter().map(move |collection| (registry, collection))
            })
            .collect();

        if items.is_empty() {
            info!("no collections to publish");
            return Ok(());
        }
        info!(count = items.len(), "marking collections public");

        let results: Vec<Result<PublishOutcome>> = stream::iter(items)
            .map(|(registry, collection)| {
                let publisher = Arc::clone(&self.publisher);
                let retry = self.retry;
                async move {
                    retry
                        .publish(publisher.as_ref(), registry, collection)
                        .await
                }
            })
            .buffer_unordered(self.write_concurrency)
            .collect()
            .await;

        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(PublishOutcome::Published) => report.published += 1,
                Ok(PublishOutcome::AlreadyPublic) => report.already_public += 1,
                Err(err) => failures.push(err.to_string()),
            }
        }

        if !failures.is_empty() {
            failures.sort();
            error!(
                failed = failures.len(),
                "publishing failed, versions file will not be committed"
            );
            return Err(SyncError::PublishFailed { failures });
        }

        info!(
            published = report.published,
            already_public = report.already_public,
            "publishing complete"
        );
        Ok(())
    }

    fn log_item_errors(&self, failures: &[String]) {
        if failures.is_empty() {
            return;
        }
        warn!(
            count = failures.len(),
            "metadata checks failed for some collections, continuing without them"
        );
        for failure in failures.iter().take(MAX_LOGGED_ITEM_ERRORS) {
            warn!("{failure}");
        }
        if failures.len() > MAX_LOGGED_ITEM_ERRORS {
            warn!("... and {} more", failures.len() - MAX_LOGGED_ITEM_ERRORS);
        }
    }
}
