use thiserror::Error;

/// Errors raised while loading scores or settings.
///
/// Musical content never fails: pitches a harmonica cannot play come out as
/// unavailable tab markers instead.
#[derive(Error, Debug)]
pub enum HarpTabError {
    #[error("Failed to read file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parse error: {0}")]
    Xml(String),

    #[error("Unsupported root element: '{0}'. Only 'score-partwise' is supported.")]
    UnsupportedRoot(String),

    #[error("MXL archive error: {0}")]
    Archive(String),

    #[error("Invalid UTF-8 in MusicXML file: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Part {requested} does not exist (score has {available} parts)")]
    PartOutOfRange { requested: usize, available: usize },

    #[error("Invalid pitch spec '{0}'")]
    InvalidPitch(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HarpTabError>;
