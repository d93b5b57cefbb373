use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const IMAGE_EXTENSIONS: [&str; 2] = ["jpg", "png"];
const VIDEO_EXTENSIONS: [&str; 1] = ["mp4"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Image, MediaKind::Video];

    /// Classify a path by its extension, ignoring case. `None` means unsupported.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Image)
        } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub kind: MediaKind,
}

impl MediaFile {
    pub fn from_path(path: &Path) -> Option<Self> {
        MediaKind::from_path(path).map(|kind| MediaFile {
            path: path.to_path_buf(),
            kind,
        })
    }
}

/// Last status change of a file: inode ctime on Unix, creation time elsewhere.
pub fn status_changed(path: &Path) -> Option<SystemTime> {
    let metadata = fs::metadata(path).ok()?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        use std::time::Duration;

        let secs = metadata.ctime();
        let nanos = metadata.ctime_nsec();
        if secs >= 0 && nanos >= 0 {
            return Some(SystemTime::UNIX_EPOCH + Duration::new(secs as u64, nanos as u32));
        }
    }

    metadata.created().or_else(|_| metadata.modified()).ok()
}
