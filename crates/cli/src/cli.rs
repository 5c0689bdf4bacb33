use std::path::PathBuf;

#[derive(clap::Parser, Debug)]
#[command(
    name = "almanac",
    about = "Reconciles remote collections against versions.json and validates repository metadata"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Reconcile remote collections, publish newly completed ones and
    /// commit the versions document
    Sync {
        /// Path of the versions document to commit
        #[clap(long, default_value = "versions.json")]
        versions_file: PathBuf,
        /// Pool size for listing and metadata checks
        #[clap(long)]
        read_concurrency: Option<usize>,
        /// Pool size for publish calls
        #[clap(long)]
        write_concurrency: Option<usize>,
    },
    /// Validate the named metadata files
    Validate {
        /// Files to validate
        files: Vec<PathBuf>,
    },
    /// Discover and validate every metadata file under a root
    Check {
        /// Repository root to scan
        #[clap(long, default_value = ".")]
        root: PathBuf,
    },
}
