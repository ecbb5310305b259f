use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error returned while generating accessors for a single class.
///
/// Every variant is fatal for the class being processed. A batch runner decides
/// whether the remaining classes are still processed.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Metadata or annotations describe something the generator cannot honour.
    #[error("configuration error for {class}: {message}")]
    Configuration { class: String, message: String },

    /// A host source file that must be rewritten does not exist.
    #[error("host file not found: {}", path.display())]
    HostMissing { path: PathBuf },

    /// Reading, writing or copying a file failed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The metadata manifest could not be read or parsed.
    #[error("invalid manifest {}: {message}", path.display())]
    Manifest { path: PathBuf, message: String },
}

impl GenerateError {
    pub fn configuration(class: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Configuration {
            class: class.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type GenerateResult<T> = Result<T, GenerateError>;
