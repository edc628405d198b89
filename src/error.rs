use std::path::PathBuf;

/// Failure of a single asset load. Never fatal: the room simply goes
/// without that asset.
#[derive(thiserror::Error, Debug)]
pub enum AssetError {
    #[error("failed to load model {path:?}: {reason}")]
    Model { path: PathBuf, reason: String },

    #[error("failed to load texture {path:?}: {reason}")]
    Texture { path: PathBuf, reason: String },

    #[error("model {path:?} contains no meshes")]
    EmptyModel { path: PathBuf },

    #[error("could not start loader thread: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Configuration file errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Scene name that matches no known scene
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("unknown scene {0:?} (expected lobby, music, painter, literary or museum)")]
pub struct UnknownScene(pub String);
