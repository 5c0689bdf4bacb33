use std::path::PathBuf;

use tracing::{info, warn};

use almanac_sync::{SyncConfig, SyncJob};

pub async fn run(
    versions_file: PathBuf,
    read_concurrency: Option<usize>,
    write_concurrency: Option<usize>,
) -> eyre::Result<()> {
    let mut config = SyncConfig::from_env(versions_file)?;
    if let Some(read) = read_concurrency {
        config.read_concurrency = read;
    }
    if let Some(write) = write_concurrency {
        config.write_concurrency = write;
    }

    let report = SyncJob::from_config(&config).run().await?;

    for name in &report.unparseable_names {
        warn!(name = %name, "collection excluded from the versions document");
    }
    info!(
        listed = report.listed,
        qualifying = report.qualifying,
        published = report.published,
        already_public = report.already_public,
        metadata_errors = report.metadata_errors.len(),
        "sync completed"
    );
    Ok(())
}
