use thiserror::Error;

#[derive(Error, Debug)]
pub enum SandboxError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unsupported script format: {0}")]
    UnsupportedScript(String),

    #[error("Run task ended abnormally: {0}")]
    RunAborted(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, SandboxError>;
