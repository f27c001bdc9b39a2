use std::path::PathBuf;
use thiserror::Error;

/// Failures of a whole collaborator data set. These abort the run: the
/// classifier and matcher cannot produce meaningful output without them.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{what} unavailable at {path}: {source}")]
    Unavailable {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{what} at {path} contains no usable entries")]
    Empty { what: &'static str, path: PathBuf },

    #[error("unsupported {what} format: {extension:?}")]
    UnsupportedFormat {
        what: &'static str,
        extension: String,
    },
}
