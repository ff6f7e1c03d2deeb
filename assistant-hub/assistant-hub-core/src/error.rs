use std::io;
use std::path::Path;

/// Failures surfaced by workspace operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("invalid name: {0:?}")]
    InvalidName(String),
    #[error("path escapes workspace root: {0}")]
    Escape(String),
    #[error("reserved name: {0}")]
    Reserved(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, StoreError>;

impl StoreError {
    /// Classify an I/O error raised while touching `path`.
    pub fn io(path: &Path, err: io::Error) -> Self {
        let shown = path.display().to_string();
        match err.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(shown),
            io::ErrorKind::AlreadyExists => StoreError::AlreadyExists(shown),
            _ => StoreError::Io {
                path: shown,
                source: err,
            },
        }
    }
}

pub(crate) trait IoContext<T> {
    fn at(self, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn at(self, path: &Path) -> Result<T> {
        self.map_err(|err| StoreError::io(path, err))
    }
}
