use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid scan root: {path}")]
    InvalidRoot { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Progress template error: {0}")]
    Template(#[from] indicatif::style::TemplateError),
}

/// Why a supported file could not be fingerprinted. Never fatal to a scan.
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to sample a frame from {path}: {message}")]
    FrameSample { path: PathBuf, message: String },
}
