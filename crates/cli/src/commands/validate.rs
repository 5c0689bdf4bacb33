use std::path::{Path, PathBuf};

use eyre::eyre;
use tracing::{error, info, warn};

use almanac_validate::{FileOutcome, find_validation_files, validate_file};

pub fn run_files(files: &[PathBuf]) -> eyre::Result<()> {
    if files.is_empty() {
        warn!("no files to validate");
        return Ok(());
    }
    validate_all(files.iter().map(PathBuf::as_path))
}

pub fn run_check(root: &Path) -> eyre::Result<()> {
    let files = find_validation_files(root);
    info!(
        root = %root.display(),
        count = files.len(),
        "validating discovered metadata files"
    );
    validate_all(files.iter().map(PathBuf::as_path))
}

fn validate_all<'a>(files: impl Iterator<Item = &'a Path>) -> eyre::Result<()> {
    let mut passed = 0usize;
    let mut failed = 0usize;

    for path in files {
        match validate_file(path) {
            FileOutcome::Valid { message } => {
                info!(path = %path.display(), "{message}");
                passed += 1;
            }
            FileOutcome::Skipped { reason } => {
                info!("{reason}");
            }
            FileOutcome::Invalid { problems } => {
                for problem in &problems {
                    error!(path = %path.display(), "{problem}");
                }
                failed += 1;
            }
        }
    }

    info!(passed, failed, total = passed + failed, "validation summary");
    if failed > 0 {
        Err(eyre!("{failed} file(s) failed validation"))
    } else {
        Ok(())
    }
}
