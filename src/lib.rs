//! Find photos and videos that share a perceptual fingerprint, show them, and
//! delete every copy but the oldest.

pub mod error;
pub mod fingerprint;
pub mod index;
pub mod media;
pub mod prompt;
pub mod removal;
pub mod resolve;
pub mod session;

#[cfg(test)]
mod test_utils;

pub use error::{Error, FingerprintError, Result};
pub use fingerprint::{Fingerprint, Fingerprinter, FrameSampler, PerceptualFingerprinter};
pub use index::{FingerprintGroup, MediaIndex, build_index};
pub use media::{MediaFile, MediaKind};
pub use removal::{RemovalReport, prune_empty_directories, remove_duplicates, remove_duplicates_and_prune};
pub use resolve::{Resolution, count_duplicates, resolve};
pub use session::{Session, SessionOutcome};
