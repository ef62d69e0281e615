use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConcatError {
    #[error("Failed to read file {path}: {message}")]
    FileReadError { path: String, message: String },

    #[error("Clipboard initialization failed: {0}")]
    ClipboardInitError(String),

    #[error("Clipboard write failed: {0}")]
    ClipboardWriteError(String),

    #[error("IO Error: {0}")]
    IoError(String),

    #[error("Regex Error: {0}")]
    RegexError(String),

    #[error("Tokenizer Error: {0}")]
    TokenizerError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The document was assembled but the sink rejected it.
    #[error("Failed to deliver document: {source}")]
    DeliveryError {
        source: Box<ConcatError>,
        rendered: String,
    },
}

impl ConcatError {
    pub fn file_read(path: &Path, err: impl ToString) -> Self {
        ConcatError::FileReadError {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// True for failures of the output sink, which leave the assembled
    /// document intact.
    pub fn is_sink_error(&self) -> bool {
        matches!(
            self,
            ConcatError::ClipboardInitError(_)
                | ConcatError::ClipboardWriteError(_)
                | ConcatError::DeliveryError { .. }
        )
    }

    /// The rendered document a failed delivery left behind.
    pub fn undelivered_document(&self) -> Option<&str> {
        match self {
            ConcatError::DeliveryError { rendered, .. } => Some(rendered),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConcatError {
    fn from(err: std::io::Error) -> Self {
        ConcatError::IoError(err.to_string())
    }
}

impl From<regex::Error> for ConcatError {
    fn from(err: regex::Error) -> Self {
        ConcatError::RegexError(err.to_string())
    }
}
