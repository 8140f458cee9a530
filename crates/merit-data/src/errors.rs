use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataError {
    #[error("invalid science filename '{name}': {message}")]
    Filename { name: String, message: String },

    #[error("unsupported data file extension '{extension}'")]
    UnsupportedExtension { extension: String },

    #[error("{format} format mismatch: {reason}")]
    FormatMismatch {
        format: &'static str,
        reason: String,
    },

    #[error("{format} file truncated: expected {expected} bytes, found {actual}")]
    Truncated {
        format: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("packet {index} checksum mismatch: expected {expected:#06x}, computed {computed:#06x}")]
    ChecksumMismatch {
        index: usize,
        expected: u16,
        computed: u16,
    },

    #[error("{format} file did not contain any packets")]
    EmptyData { format: &'static str },

    #[error("calibration artifact {path} invalid: {source}")]
    Artifact {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),
}
