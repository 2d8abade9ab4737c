use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum StackError {
    #[error("invalid name: {0}")]
    InvalidName(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParseError(String),

    #[error("duplicate logical id: {0}")]
    DuplicateLogicalId(String),

    #[error("resource {from} references unknown logical id {to}")]
    DanglingReference { from: String, to: String },

    #[error("dependency cycle between: {0}")]
    CyclicDependency(String),

    #[error("serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for StackError {
    fn from(err: serde_json::Error) -> Self {
        StackError::ConfigParseError(err.to_string())
    }
}
