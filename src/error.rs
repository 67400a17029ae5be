// src/error.rs

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line ~{line})")]
    Parse {
        format: &'static str,
        line: usize,
        details: String,
    },

    #[error("no reader registered for extension '{extension}'")]
    UnsupportedFormat { extension: String },

    #[error(
        "extension '{extension}' is registered under several namespaces ({}), specify a namespace",
        namespaces.join(", ")
    )]
    AmbiguousFormat {
        extension: String,
        namespaces: Vec<String>,
    },

    #[error("no routine implemented to read {namespace} '{extension}' files")]
    NotImplementedForNamespace {
        namespace: String,
        extension: String,
    },

    #[error("a reader is already registered for '{key}'")]
    DuplicateReader { key: String },

    #[error("the '{key}' reader does not support writing")]
    WriteNotSupported { key: String },

    #[error("invalid input: {0}")]
    Validation(String),

    #[error("parameter '{0}' not found")]
    MissingParameter(String),

    #[error("property '{0}' not found")]
    MissingProperty(String),

    #[error("parameter '{key}' is malformed: {details}")]
    InvalidParameter { key: String, details: String },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

// Lets infallible `From` conversions flow through `TryInto<_, Error = Error>` bounds
impl From<std::convert::Infallible> for Error {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

impl Error {
    pub fn parse(format: &'static str, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    pub fn validation(details: impl Into<String>) -> Self {
        Self::Validation(details.into())
    }
}
