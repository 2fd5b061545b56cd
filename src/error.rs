use std::io;
use std::path::PathBuf;

/// Failures surfaced by [`crate::store::WordStore`]. Nothing in the store
/// recovers from these; the caller decides how to present them.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("dictionary file {} does not exist", .0.display())]
    NotFound(PathBuf),
    /// The document is not valid JSON, or its JSON does not have the entry shape.
    #[error("malformed dictionary: {0}")]
    Parse(#[from] serde_json::Error),
    /// Valid entry shape, but an entry breaks a store invariant.
    #[error("malformed dictionary: {0}")]
    Schema(String),
    #[error("word '{0}' is not in the dictionary")]
    KeyNotFound(String),
    #[error("index {index} is out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("no entries left to choose from")]
    EmptySelection,
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
