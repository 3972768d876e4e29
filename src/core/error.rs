use thiserror::Error;

/// Upper bound on a spawn's name length. Anything longer is file corruption.
pub const MAX_NAME_LEN: usize = 500;

#[derive(Error, Debug)]
pub enum SpawnError {
    #[error("Spawn record truncated: read {read} of {expected} fixed fields")]
    Truncated { expected: usize, read: usize },

    #[error("Spawn name length {0} exceeds {} bytes", MAX_NAME_LEN)]
    NameTooLong(usize),

    #[error("Spawn name truncated: expected {expected} bytes, got {read}")]
    NameTruncated { expected: usize, read: usize },

    #[error("Spawn record short write: wrote {written} of {expected} fixed fields")]
    ShortWrite { expected: usize, written: usize },

    #[error("Spawn {id} has unusable scale {scale}")]
    InvalidScale { id: u32, scale: f32 },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, SpawnError>;
