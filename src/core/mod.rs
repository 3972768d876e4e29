pub mod config;
pub mod error;

pub use config::QueryConfig;
pub use error::{ConfigError, Result, SpawnError, MAX_NAME_LEN};
