use crate::error::FingerprintError;
use crate::media::{MediaFile, MediaKind};
use image::{DynamicImage, ImageFormat, ImageReader};
use image_hasher::{HashAlg, Hasher, HasherConfig};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Perceptual fingerprint rendered as text. Equal fingerprints mean duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(pub String);

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub trait Fingerprinter {
    fn fingerprint(&self, file: &MediaFile) -> Result<Fingerprint, FingerprintError>;
}

/// Mean hash of decoded images, and of one sampled frame for videos.
pub struct PerceptualFingerprinter {
    hasher: Hasher,
    sampler: FrameSampler,
}

impl PerceptualFingerprinter {
    pub fn new(sampler: FrameSampler) -> Self {
        Self {
            hasher: HasherConfig::new().hash_alg(HashAlg::Mean).to_hasher(),
            sampler,
        }
    }

    pub fn hash_image(&self, img: &DynamicImage) -> Fingerprint {
        Fingerprint(self.hasher.hash_image(img).to_base64())
    }

    fn decode_image(path: &Path) -> Result<DynamicImage, FingerprintError> {
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|source| FingerprintError::Decode {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl Default for PerceptualFingerprinter {
    fn default() -> Self {
        Self::new(FrameSampler::default())
    }
}

impl Fingerprinter for PerceptualFingerprinter {
    fn fingerprint(&self, file: &MediaFile) -> Result<Fingerprint, FingerprintError> {
        let img = match file.kind {
            MediaKind::Image => Self::decode_image(&file.path)?,
            MediaKind::Video => self.sampler.sample(&file.path)?,
        };
        Ok(self.hash_image(&img))
    }
}

/// Pulls a single frame out of a video with the ffprobe/ffmpeg command-line tools.
pub struct FrameSampler {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    /// Fraction of the total duration at which the frame is taken.
    position: f64,
}

impl FrameSampler {
    pub const DEFAULT_POSITION: f64 = 0.3;

    pub fn new(ffmpeg: impl Into<PathBuf>, ffprobe: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            ffprobe: ffprobe.into(),
            position: Self::DEFAULT_POSITION,
        }
    }

    /// Duration of the container in seconds, as reported by ffprobe.
    pub fn duration(&self, path: &Path) -> Result<f64, FingerprintError> {
        let output = Command::new(&self.ffprobe)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output()?;

        if !output.status.success() {
            return Err(frame_error(path, &output.stderr));
        }

        let text = String::from_utf8_lossy(&output.stdout);
        match text.trim().parse::<f64>() {
            Ok(secs) if secs.is_finite() && secs >= 0.0 => Ok(secs),
            _ => Err(FingerprintError::FrameSample {
                path: path.to_path_buf(),
                message: format!("unusable duration {:?}", text.trim()),
            }),
        }
    }

    pub fn sample(&self, path: &Path) -> Result<DynamicImage, FingerprintError> {
        let at = self.duration(path)? * self.position;

        let output = Command::new(&self.ffmpeg)
            .args(["-v", "error", "-ss"])
            .arg(format!("{:.3}", at))
            .arg("-i")
            .arg(path)
            .args(["-frames:v", "1", "-f", "image2pipe", "-c:v", "png", "-"])
            .output()?;

        if !output.status.success() || output.stdout.is_empty() {
            return Err(frame_error(path, &output.stderr));
        }

        let frame = image::load_from_memory_with_format(&output.stdout, ImageFormat::Png)
            .map_err(|source| FingerprintError::Decode {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(DynamicImage::ImageRgb8(frame.to_rgb8()))
    }
}

impl Default for FrameSampler {
    fn default() -> Self {
        Self::new("ffmpeg", "ffprobe")
    }
}

fn frame_error(path: &Path, stderr: &[u8]) -> FingerprintError {
    FingerprintError::FrameSample {
        path: path.to_path_buf(),
        message: String::from_utf8_lossy(stderr).trim().to_string(),
    }
}
