use std::path::PathBuf;

/// Errors raised while reading or writing persisted Q-tables.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read q-table from {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write q-table to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse q-table from {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("q-table in {path} is {found_width}x{found_height}, expected {width}x{height}")]
    DimensionMismatch {
        path: PathBuf,
        width: usize,
        height: usize,
        found_width: usize,
        found_height: usize,
    },

    #[error("q-table holds {found} values, expected {expected}")]
    Length { expected: usize, found: usize },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
