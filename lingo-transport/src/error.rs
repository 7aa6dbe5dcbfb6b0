//! Error types for the transport module.

use thiserror::Error;

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Errors that can occur while talking to a media room.
#[derive(Error, Debug)]
pub enum TransportError {
    /// WebSocket connection error.
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Malformed or unexpected wire message.
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Authentication rejected by the room.
    #[error("Authentication error: {0}")]
    AuthError(String),

    /// Session not connected.
    #[error("Session not connected")]
    NotConnected,

    /// Session already closed.
    #[error("Session already closed")]
    SessionClosed,

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Generic IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl TransportError {
    /// Create a new connection error.
    pub fn connection<S: Into<String>>(msg: S) -> Self {
        Self::ConnectionError(msg.into())
    }

    /// Create a new protocol error.
    pub fn protocol<S: Into<String>>(msg: S) -> Self {
        Self::ProtocolError(msg.into())
    }

    /// Create a new authentication error.
    pub fn auth<S: Into<String>>(msg: S) -> Self {
        Self::AuthError(msg.into())
    }

    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }
}
