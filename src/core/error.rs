use thiserror::Error;

/// Errors raised at the library edge: config files, snapshots, command parsing.
///
/// Gameplay rule violations are not errors; actions report them by returning
/// `false` and writing a history entry.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Unknown item: {0}")]
    UnknownItem(String),

    #[error("Unknown direction: {0}")]
    UnknownDirection(String),

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
