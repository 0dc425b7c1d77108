use std::fmt;

use crate::params::TrackId;

/// Signal-chain construction failed. The one way this happens in practice is
/// an unusable render context.
#[derive(Debug)]
pub enum ChainError {
    BadSampleRate { sample_rate: f32 },
}

impl fmt::Display for ChainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainError::BadSampleRate { sample_rate } => {
                write!(f, "cannot build signal chain: unusable sample rate {sample_rate}")
            }
        }
    }
}

impl std::error::Error for ChainError {}

/// A persisted blob that does not parse as the expected shape. Loading such
/// a blob fails before any existing track is touched.
#[derive(Debug)]
pub enum ConfigError {
    Malformed(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Malformed(err) => write!(f, "malformed track configuration: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// The storage medium itself failed.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(err) => write!(f, "configuration store error: {err}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Save/load failure: either the medium or the format.
#[derive(Debug)]
pub enum PersistError {
    Store(StoreError),
    Config(ConfigError),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Store(err) => err.fmt(f),
            PersistError::Config(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for PersistError {}

impl From<StoreError> for PersistError {
    fn from(err: StoreError) -> Self {
        PersistError::Store(err)
    }
}

impl From<ConfigError> for PersistError {
    fn from(err: ConfigError) -> Self {
        PersistError::Config(err)
    }
}

/// One track's failure inside a bulk operation. Bulk verbs collect these and
/// keep going instead of aborting the remaining tracks.
#[derive(Debug)]
pub struct TrackFault {
    pub id: TrackId,
    pub error: ChainError,
}

impl fmt::Display for TrackFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track {}: {}", self.id, self.error)
    }
}
