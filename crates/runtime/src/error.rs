//! Errors surfaced while building a controller.
//!
//! Once a controller runs it never fails; missing targets, pending paths and
//! unroutable telegrams all degrade to "nothing happens this tick".
use npc_core::{ConfigError, ErrorSeverity, NpcError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("invalid orc configuration")]
    InvalidConfig(#[from] ConfigError),
}

impl NpcError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidConfig(source) => source.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(source) => source.error_code(),
        }
    }
}
