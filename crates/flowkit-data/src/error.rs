use std::path::PathBuf;

/// Errors raised while scanning a dataset root or decoding one of its samples.
///
/// Construction-time problems (`Config`, `MissingData`, `Pairing`) surface
/// from the builders; decode problems (`Format`, `Io`, `Image`) surface from
/// `FlowDataset::get` for the offending index only.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// A split / pass argument outside the dataset's allow-list.
    #[error("invalid {arg} {value:?}: expected one of {allowed:?}")]
    Config {
        arg: &'static str,
        value: String,
        allowed: Vec<&'static str>,
    },

    /// A required file or directory is absent.
    #[error("missing dataset files at {}: {reason}", path.display())]
    MissingData { path: PathBuf, reason: String },

    /// A flow file or split file does not follow its on-disk format.
    #[error("malformed file {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// Parallel image / flow lists disagree in length.
    #[error("pairing mismatch in {context}: {images} image pairs vs {flows} flow files")]
    Pairing {
        context: String,
        images: usize,
        flows: usize,
    },

    #[error("index {index} out of range for dataset of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Grid(#[from] flowkit_core::Error),
}

impl DatasetError {
    pub(crate) fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DatasetError::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        DatasetError::MissingData {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DatasetError::Io {
            path: path.into(),
            source,
        }
    }

    /// Split an `image` error into the I/O and decode cases.
    pub(crate) fn from_image(path: impl Into<PathBuf>, err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(source) => DatasetError::Io {
                path: path.into(),
                source,
            },
            other => DatasetError::Image {
                path: path.into(),
                source: other,
            },
        }
    }
}

/// Convenience Result type used throughout flowkit-data.
pub type DataResult<T> = Result<T, DatasetError>;
