use crate::error::{Error, Result};
use crate::fingerprint::{Fingerprint, Fingerprinter};
use crate::media::{MediaFile, MediaKind};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// Paths sharing one fingerprint, in the order the walk found them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FingerprintGroup {
    pub kind: MediaKind,
    pub fingerprint: Fingerprint,
    pub paths: Vec<PathBuf>,
}

impl FingerprintGroup {
    pub fn has_duplicates(&self) -> bool {
        self.paths.len() > 1
    }
}

/// Fingerprint groups for one media kind, kept in first-seen order.
#[derive(Debug, Default)]
pub struct KindIndex {
    groups: Vec<FingerprintGroup>,
    positions: HashMap<Fingerprint, usize>,
}

impl KindIndex {
    fn insert(&mut self, kind: MediaKind, fingerprint: Fingerprint, path: PathBuf) {
        match self.positions.get(&fingerprint) {
            Some(&pos) => self.groups[pos].paths.push(path),
            None => {
                self.positions.insert(fingerprint.clone(), self.groups.len());
                self.groups.push(FingerprintGroup {
                    kind,
                    fingerprint,
                    paths: vec![path],
                });
            }
        }
    }

    pub fn groups(&self) -> &[FingerprintGroup] {
        &self.groups
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&FingerprintGroup> {
        self.positions.get(fingerprint).map(|&pos| &self.groups[pos])
    }
}

/// `kind -> fingerprint -> paths` for every fingerprinted file under a root.
#[derive(Debug, Default)]
pub struct MediaIndex {
    kinds: BTreeMap<MediaKind, KindIndex>,
}

impl MediaIndex {
    pub fn insert(&mut self, file: MediaFile, fingerprint: Fingerprint) {
        self.kinds
            .entry(file.kind)
            .or_default()
            .insert(file.kind, fingerprint, file.path);
    }

    pub fn kind(&self, kind: MediaKind) -> Option<&KindIndex> {
        self.kinds.get(&kind)
    }

    /// All groups of the given kinds, kind by kind.
    pub fn groups<'a>(
        &'a self,
        kinds: &'a [MediaKind],
    ) -> impl Iterator<Item = &'a FingerprintGroup> + 'a {
        kinds
            .iter()
            .filter_map(|kind| self.kinds.get(kind))
            .flat_map(|index| index.groups.iter())
    }

    pub fn all_groups(&self) -> impl Iterator<Item = &FingerprintGroup> {
        self.kinds.values().flat_map(|index| index.groups.iter())
    }

    pub fn file_count(&self) -> usize {
        self.all_groups().map(|group| group.paths.len()).sum()
    }
}

/// Walk `root` and fingerprint every supported media file.
///
/// Unsupported suffixes are never opened. Files the fingerprinter rejects are
/// left out of the index; only an unusable root is an error.
pub fn build_index(root: &Path, fingerprinter: &dyn Fingerprinter) -> Result<MediaIndex> {
    if !root.is_dir() {
        return Err(Error::InvalidRoot {
            path: root.to_path_buf(),
        });
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
    spinner.set_message("Scanning for media…");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let start = Instant::now();
    let mut index = MediaIndex::default();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("Skipping unreadable entry: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(file) = MediaFile::from_path(entry.path()) else {
            continue;
        };

        spinner.set_message(format!("Fingerprinting {}", file.path.display()));
        match fingerprinter.fingerprint(&file) {
            Ok(fingerprint) => index.insert(file, fingerprint),
            Err(err) => debug!("Skipping {}: {}", file.path.display(), err),
        }
    }

    spinner.finish_and_clear();
    debug!(
        "Indexed {} media files under {} in {:.2?}",
        index.file_count(),
        root.display(),
        start.elapsed()
    );
    Ok(index)
}
