//! Errors raised while loading the initial document.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to load a file into a [`Document`](crate::document::Document).
#[derive(Debug, Error)]
pub enum FileError {
    #[error("{}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    /// The path that failed to load.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Open { path, .. } | Self::Read { path, .. } => path.as_path(),
        }
    }
}
