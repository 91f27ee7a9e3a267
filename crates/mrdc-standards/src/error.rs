#![deny(unsafe_code)]

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("empty length table in {path}")]
    EmptyTable { path: PathBuf },

    #[error("invalid digit-count key {key:?} in {path}")]
    InvalidLength { path: PathBuf, key: String },

    #[error("provider {provider:?} listed under both length {first} and length {second}")]
    DuplicateProvider {
        provider: String,
        first: u32,
        second: u32,
    },

    #[error("blank provider name under length {length} in {path}")]
    BlankProvider { path: PathBuf, length: u32 },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
