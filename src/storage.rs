//! YAML files holding catalogs and applications.
//!
//! The core never touches the filesystem. These loaders are the edge where
//! records come in, and the only place [`LoadError`] is produced.

use std::{io, path::PathBuf};

use crate::domain::DuplicateRecord;

mod application;
mod catalog;

pub use application::{load_application, save_application};
pub use catalog::{CatalogFile, load_catalog};

/// Errors that can occur when loading or saving a YAML file.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred.
    #[error("failed to access {path}")]
    Io {
        /// The file being accessed.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The YAML could not be parsed or written.
    #[error("malformed YAML in {path}")]
    Yaml {
        /// The offending file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Two records in the file share an identity.
    #[error("invalid catalog {path}")]
    Duplicate {
        /// The offending file.
        path: PathBuf,
        /// The clashing record.
        #[source]
        source: DuplicateRecord,
    },
}

impl LoadError {
    fn io(path: &std::path::Path, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    fn yaml(path: &std::path::Path, source: serde_yaml::Error) -> Self {
        Self::Yaml {
            path: path.to_path_buf(),
            source,
        }
    }
}
