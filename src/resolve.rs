use crate::index::{FingerprintGroup, MediaIndex};
use crate::media::{MediaKind, status_changed};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// One group split into the copy to keep and the copies to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedGroup<'a> {
    pub group: &'a FingerprintGroup,
    pub retained: &'a Path,
    pub duplicates: Vec<&'a Path>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub retained: Vec<PathBuf>,
    pub duplicates: Vec<PathBuf>,
}

/// Resolve a group using each file's last status change.
pub fn resolve_group(group: &FingerprintGroup) -> Option<ResolvedGroup<'_>> {
    resolve_group_by(group, status_changed)
}

/// Keep the member with the earliest timestamp; ties keep the first one walked.
/// Members without a readable timestamp are only kept if none has one.
/// Singleton groups resolve to `None`.
pub fn resolve_group_by<F>(group: &FingerprintGroup, mut stamp: F) -> Option<ResolvedGroup<'_>>
where
    F: FnMut(&Path) -> Option<SystemTime>,
{
    if !group.has_duplicates() {
        return None;
    }

    let keep = group
        .paths
        .iter()
        .enumerate()
        .min_by_key(|(_, path)| match stamp(path.as_path()) {
            Some(time) => (false, time),
            None => (true, SystemTime::UNIX_EPOCH),
        })
        .map(|(i, _)| i)?;

    Some(ResolvedGroup {
        group,
        retained: &group.paths[keep],
        duplicates: group
            .paths
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != keep)
            .map(|(_, path)| path.as_path())
            .collect(),
    })
}

/// Every group of the given kinds that has duplicates, resolved.
pub fn resolve_groups<'a>(
    index: &'a MediaIndex,
    kinds: &'a [MediaKind],
) -> impl Iterator<Item = ResolvedGroup<'a>> + 'a {
    index.groups(kinds).filter_map(resolve_group)
}

pub fn resolve(index: &MediaIndex) -> Resolution {
    let mut resolution = Resolution::default();
    for resolved in resolve_groups(index, &MediaKind::ALL) {
        resolution.retained.push(resolved.retained.to_path_buf());
        resolution
            .duplicates
            .extend(resolved.duplicates.iter().map(|p| p.to_path_buf()));
    }
    resolution
}

/// Number of duplicate files across both kinds. Needs no timestamps.
pub fn count_duplicates(index: &MediaIndex) -> usize {
    index
        .all_groups()
        .map(|group| group.paths.len().saturating_sub(1))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fingerprint::Fingerprint;
    use crate::index::build_index;
    use crate::test_utils::{ContentFingerprinter, write_file};
    use std::collections::HashMap;
    use std::time::Duration;
    use tempfile::TempDir;

    fn group(paths: &[&str]) -> FingerprintGroup {
        FingerprintGroup {
            kind: MediaKind::Image,
            fingerprint: Fingerprint("fp".to_string()),
            paths: paths.iter().map(PathBuf::from).collect(),
        }
    }

    fn at(secs: u64) -> Option<SystemTime> {
        Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
    }

    #[test]
    fn test_keeps_earliest_timestamp() {
        let g = group(&["x.jpg", "y.jpg", "z.jpg"]);
        let stamps: HashMap<&str, Option<SystemTime>> =
            [("x.jpg", at(30)), ("y.jpg", at(10)), ("z.jpg", at(20))].into();

        let resolved = resolve_group_by(&g, |p| stamps[p.to_str().unwrap()]).unwrap();
        assert_eq!(resolved.retained, Path::new("y.jpg"));
        assert_eq!(
            resolved.duplicates,
            vec![Path::new("x.jpg"), Path::new("z.jpg")]
        );
    }

    #[test]
    fn test_tie_keeps_first_walked() {
        let g = group(&["first.jpg", "second.jpg"]);
        let resolved = resolve_group_by(&g, |_| at(5)).unwrap();
        assert_eq!(resolved.retained, Path::new("first.jpg"));
        assert_eq!(resolved.duplicates, vec![Path::new("second.jpg")]);
    }

    #[test]
    fn test_unreadable_timestamp_never_preferred() {
        let g = group(&["gone.jpg", "here.jpg"]);
        let resolved =
            resolve_group_by(&g, |p| if p == Path::new("gone.jpg") { None } else { at(99) })
                .unwrap();
        assert_eq!(resolved.retained, Path::new("here.jpg"));
    }

    #[test]
    fn test_singleton_has_no_resolution() {
        let g = group(&["alone.jpg"]);
        assert!(resolve_group_by(&g, |_| at(1)).is_none());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let g = group(&["a.jpg", "b.jpg", "c.jpg"]);
        let first = resolve_group_by(&g, |_| at(7)).unwrap();
        for _ in 0..5 {
            assert_eq!(resolve_group_by(&g, |_| at(7)).unwrap(), first);
        }
    }

    #[test]
    fn test_count_and_resolve_across_kinds() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_file(&root.join("a.jpg"), b"img");
        write_file(&root.join("b.jpg"), b"img");
        write_file(&root.join("c.png"), b"img");
        write_file(&root.join("solo.png"), b"unique");
        write_file(&root.join("v1.mp4"), b"vid");
        write_file(&root.join("v2.mp4"), b"vid");
        write_file(&root.join("v3.mp4"), b"other vid");

        let index = build_index(root, &ContentFingerprinter).unwrap();
        assert_eq!(count_duplicates(&index), 3);

        let resolution = resolve(&index);
        assert_eq!(resolution.retained.len(), 2);
        assert_eq!(resolution.duplicates.len(), 3);
        for kept in &resolution.retained {
            assert!(!resolution.duplicates.contains(kept));
        }
        assert!(!resolution.duplicates.contains(&root.join("solo.png")));
        assert!(!resolution.duplicates.contains(&root.join("v3.mp4")));
    }

    #[test]
    fn test_resolve_matches_minimum_status_change() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write_file(&root.join("one.png"), b"img");
        write_file(&root.join("two.png"), b"img");
        write_file(&root.join("three.png"), b"img");

        let index = build_index(root, &ContentFingerprinter).unwrap();
        let resolved: Vec<_> = resolve_groups(&index, &MediaKind::ALL).collect();
        assert_eq!(resolved.len(), 1);

        let earliest = resolved[0]
            .group
            .paths
            .iter()
            .filter_map(|p| status_changed(p))
            .min()
            .unwrap();
        assert_eq!(status_changed(resolved[0].retained), Some(earliest));
        assert_eq!(resolved[0].duplicates.len(), 2);
    }
}
