//! Error types for the console crate.

use thiserror::Error;

/// Result type for console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;

/// Errors raised while bootstrapping or running the console.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// The anchor to mount under does not exist on the surface.
    #[error("Mount target missing: no anchor named '{0}'")]
    MountTargetMissing(String),

    /// The mount being unmounted does not exist (anymore).
    #[error("Unknown mount: {0}")]
    UnknownMount(String),

    /// The session UI failed to render.
    #[error("UI error: {0}")]
    Ui(String),

    /// The room transport failed.
    #[error("Transport error: {0}")]
    Transport(#[from] lingo_transport::TransportError),

    /// Console input failed.
    #[error("Input error: {0}")]
    Input(#[from] rustyline::error::ReadlineError),
}

impl ConsoleError {
    /// Create a new UI error.
    pub fn ui<S: Into<String>>(msg: S) -> Self {
        Self::Ui(msg.into())
    }
}
