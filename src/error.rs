//! Error types for the skyline mesher.

use thiserror::Error;

/// Result type alias using SkylineError.
pub type Result<T> = std::result::Result<T, SkylineError>;

/// Coarse classification of a [`SkylineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input shape or configuration.
    Validation,
    /// Font, image or file load/decode failure.
    Io,
    /// Degenerate geometry or STL codec mismatch.
    Stl,
    /// Failure at the data retrieval boundary.
    Network,
}

/// Main error type for skyline generation.
#[derive(Error, Debug)]
pub enum SkylineError {
    /// Input data or configuration is invalid.
    #[error("Validation error: {0}")]
    Validation(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode an image.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// No usable font could be loaded.
    #[error("Font error: {0}")]
    Font(String),

    /// Failed to parse JSON contribution data.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A primitive could not be built (non-positive extents).
    #[error("Geometry error: {0}")]
    Geometry(String),

    /// Malformed or truncated STL data.
    #[error("STL error: {0}")]
    Stl(String),

    /// Contribution data could not be retrieved.
    #[error("Network error: {0}")]
    Network(String),

    /// An error annotated with the stage that produced it.
    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<SkylineError>,
    },
}

impl SkylineError {
    /// Wrap this error with a description of the failing stage.
    pub fn context(self, context: impl Into<String>) -> Self {
        SkylineError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Classify the error, looking through any context wrappers.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SkylineError::Validation(_) => ErrorKind::Validation,
            SkylineError::Io(_)
            | SkylineError::Image(_)
            | SkylineError::Font(_)
            | SkylineError::Json(_) => ErrorKind::Io,
            SkylineError::Geometry(_) | SkylineError::Stl(_) => ErrorKind::Stl,
            SkylineError::Network(_) => ErrorKind::Network,
            SkylineError::Context { source, .. } => source.kind(),
        }
    }

    /// The innermost error beneath all context wrappers.
    pub fn root(&self) -> &SkylineError {
        match self {
            SkylineError::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Attach stage context to a fallible result.
pub trait ResultExt<T> {
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T, E: Into<SkylineError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().context(context))
    }
}
