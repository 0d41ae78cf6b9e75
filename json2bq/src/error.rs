use std::error;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Error type for schema conversion operations.
#[derive(Debug)]
pub enum Json2BqError {
    /// The schema file could not be read.
    ReadError { path: PathBuf, error: io::Error },

    /// The generated source could not be written to the output file.
    WriteError { path: PathBuf, error: io::Error },

    /// I/O error while writing generated output.
    IoError(io::Error),

    /// The input is not a JSON array of field descriptors.
    DecodeError(serde_json::Error),

    /// A field carries a `type` outside the supported `BigQuery` field types.
    UnknownTypeError {
        field_type: String,
        source_name: String,
    },

    /// The generated text is not valid Go source. Carries the raw text for debugging.
    FormatError { message: String, raw_source: String },
}

impl error::Error for Json2BqError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::ReadError { error, .. }
            | Self::WriteError { error, .. }
            | Self::IoError(error) => Some(error),
            Self::DecodeError(json_error) => Some(json_error),
            Self::UnknownTypeError { .. } | Self::FormatError { .. } => None,
        }
    }
}

impl fmt::Display for Json2BqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadError { path, error } => {
                write!(f, "failed to read file {}: {error}", path.display())
            }
            Self::WriteError { path, error } => {
                write!(f, "failed to write file {}: {error}", path.display())
            }
            Self::IoError(io_error) => fmt::Display::fmt(io_error, f),
            Self::DecodeError(json_error) => write!(f, "failed to parse schema: {json_error}"),
            Self::UnknownTypeError {
                field_type,
                source_name,
            } => write!(f, "unknown field type {source_name} - {field_type}"),
            Self::FormatError {
                message,
                raw_source,
            } => write!(
                f,
                "failed to format generated source - {message} - {raw_source}"
            ),
        }
    }
}

impl From<io::Error> for Json2BqError {
    fn from(io_error: io::Error) -> Self {
        Self::IoError(io_error)
    }
}

impl From<serde_json::Error> for Json2BqError {
    fn from(json_error: serde_json::Error) -> Self {
        Self::DecodeError(json_error)
    }
}
