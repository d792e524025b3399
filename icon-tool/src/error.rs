use std::path::PathBuf;

/// Failures of a single encode call
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),

    #[error("invalid target size {0} (must be 1..={max})", max = weather_icon_format::MAX_DIMENSION)]
    InvalidSize(u32),
}

/// Failures of a conversion run
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Source absent at every resolution; the icon is skipped
    #[error("Icon not found: {file_name} ({name})")]
    MissingAsset { name: String, file_name: String },

    #[error("Corrupt icon {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid size {size} for icon {name}")]
    InvalidSize { name: String, size: u32 },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Encoder task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Failed to render output: {0}")]
    Render(#[from] std::fmt::Error),
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| ConvertError::Io { path, source }
    }
}
