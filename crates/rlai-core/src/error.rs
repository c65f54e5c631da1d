//! Error types for the rlai core library

use thiserror::Error;

/// Core error type for distribution and process operations
#[derive(Error, Debug)]
pub enum RlaiError {
    /// A distribution or environment was built with out-of-domain parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A utility was called with a malformed argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A transition (or the policy feeding it) could not produce a distribution.
    ///
    /// Errors raised by caller-supplied transitions are carried unchanged.
    #[error(transparent)]
    Transition(anyhow::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl RlaiError {
    /// Wrap any error raised by a transition function.
    pub fn transition<E>(err: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Transition(err.into())
    }
}

/// Result type alias for rlai operations
pub type Result<T> = std::result::Result<T, RlaiError>;
