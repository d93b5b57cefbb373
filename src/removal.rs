use crate::error::Result;
use crate::fingerprint::Fingerprinter;
use crate::index::build_index;
use crate::resolve::resolve;
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug)]
pub struct DeleteFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

#[derive(Debug, Default)]
pub struct RemovalReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<DeleteFailure>,
    pub pruned: Vec<PathBuf>,
}

impl RemovalReport {
    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }
}

/// Rescan `root` and delete every duplicate, keeping one original per group.
///
/// A file that is already gone is skipped quietly; any other failure is recorded
/// and the remaining deletions still run.
pub fn remove_duplicates(root: &Path, fingerprinter: &dyn Fingerprinter) -> Result<RemovalReport> {
    let index = build_index(root, fingerprinter)?;
    let resolution = resolve(&index);

    let mut report = RemovalReport::default();
    for path in resolution.duplicates {
        match fs::remove_file(&path) {
            Ok(()) => {
                info!("Deleted duplicate {}", path.display());
                report.removed.push(path);
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("Duplicate already gone: {}", path.display());
            }
            Err(error) => {
                warn!("Failed to delete {}: {}", path.display(), error);
                report.failed.push(DeleteFailure { path, error });
            }
        }
    }
    Ok(report)
}

/// Remove every empty directory below `root`, deepest first, so parents emptied
/// along the way go too. `root` itself is kept.
pub fn prune_empty_directories(root: &Path) -> Vec<PathBuf> {
    let mut pruned = Vec::new();

    let dirs = WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir());

    for entry in dirs {
        let dir = entry.path();
        if !is_empty_dir(dir) {
            continue;
        }
        match fs::remove_dir(dir) {
            Ok(()) => {
                info!("Removed empty directory {}", dir.display());
                pruned.push(dir.to_path_buf());
            }
            Err(err) => debug!("Left {} in place: {}", dir.display(), err),
        }
    }
    pruned
}

fn is_empty_dir(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

/// Delete duplicates, then prune the directories they leave empty.
pub fn remove_duplicates_and_prune(
    root: &Path,
    fingerprinter: &dyn Fingerprinter,
) -> Result<RemovalReport> {
    let mut report = remove_duplicates(root, fingerprinter)?;
    report.pruned = prune_empty_directories(root);
    Ok(report)
}
