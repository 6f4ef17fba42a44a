//! Loader error types.

use std::path::PathBuf;

use sim_ecs::StoreError;

/// Errors raised while loading or spawning definition documents.
///
/// No load error is retried and no partial world state is rolled back:
/// entities already spawned from earlier definitions remain in the store.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// A definition document could not be read from disk.
    #[error("failed to read definition document {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A definition document could not be parsed.
    #[error("failed to parse definition document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A declared component variant is not in the known set. Fatal for the
    /// entity under construction; components already applied stay in place.
    #[error("unknown component variant '{0}'")]
    UnknownComponentVariant(String),

    /// An entity-scoped store write failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
