use crate::error::FingerprintError;
use crate::fingerprint::{Fingerprint, Fingerprinter};
use crate::media::MediaFile;
use image::{Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

const SIDE: u32 = 64;
const DARK: Rgb<u8> = Rgb([30, 30, 30]);
const LIGHT: Rgb<u8> = Rgb([225, 225, 225]);

/// Left half dark and right half light (or the reverse when `flipped`).
pub fn write_split_image(dir: &Path, name: &str, flipped: bool) -> PathBuf {
    let img = RgbImage::from_fn(SIDE, SIDE, |x, _| {
        if (x < SIDE / 2) != flipped { DARK } else { LIGHT }
    });
    save(dir, name, img)
}

/// Top half dark, bottom half light.
pub fn write_banded_image(dir: &Path, name: &str) -> PathBuf {
    let img = RgbImage::from_fn(SIDE, SIDE, |_, y| if y < SIDE / 2 { DARK } else { LIGHT });
    save(dir, name, img)
}

fn save(dir: &Path, name: &str, img: RgbImage) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    img.save(&path).unwrap();
    path
}

/// Write raw bytes, creating parent directories as needed.
pub fn write_file(path: &Path, contents: &[u8]) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
    path.to_path_buf()
}

/// Fingerprints a file by its raw contents. Files whose contents start with
/// `corrupt` fail, like an undecodable media file would.
pub struct ContentFingerprinter;

impl Fingerprinter for ContentFingerprinter {
    fn fingerprint(&self, file: &MediaFile) -> Result<Fingerprint, FingerprintError> {
        let bytes = fs::read(&file.path)?;
        if bytes.starts_with(b"corrupt") {
            return Err(FingerprintError::FrameSample {
                path: file.path.clone(),
                message: "corrupt test media".to_string(),
            });
        }
        Ok(Fingerprint(String::from_utf8_lossy(&bytes).into_owned()))
    }
}
