// SPDX-License-Identifier: MIT OR Apache-2.0

use std::path::PathBuf;

/// Errors raised while configuring loggers and sinks.
///
/// Logging calls themselves never fail; these only surface from constructors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid redaction pattern `{pattern}`: {source}")]
    InvalidRedactionPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid color `{0}`, expected #rrggbb")]
    InvalidColor(String),

    #[error("a log folder path is required")]
    MissingLogFolder,

    #[error("log folder `{}` exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("i/o error on `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to archive the previous session: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to start the file writer thread: {0}")]
    WorkerSpawn(#[source] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Attaches a path to an `io::Error`.
pub(crate) trait IoContext<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoContext<T> for std::io::Result<T> {
    fn at(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|source| Error::Io {
            path: path.into(),
            source,
        })
    }
}
