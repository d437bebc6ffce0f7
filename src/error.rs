//! Error kinds surfaced by the interceptor and its configuration.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterceptError {
    /// The process may not observe or inject input. Fatal at startup.
    #[error("input permission denied: {0}")]
    PermissionDenied(String),

    /// The motion loop thread could not be started.
    #[error("failed to start motion loop: {0}")]
    TaskCreation(#[source] io::Error),

    /// The motion loop thread could not be cancelled or joined cleanly.
    #[error("failed to stop motion loop: {0}")]
    TaskTeardown(String),

    #[error("invalid key binding: {0}")]
    InvalidBinding(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, InterceptError>;
