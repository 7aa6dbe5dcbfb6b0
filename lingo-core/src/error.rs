#[derive(Debug, thiserror::Error)]
pub enum LingoError {
    #[error("Service error: {0}")]
    Service(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Flow error: {0}")]
    Flow(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LingoError>;

impl LingoError {
    pub fn service(msg: impl Into<String>) -> Self {
        Self::Service(msg.into())
    }

    pub fn pipeline(msg: impl Into<String>) -> Self {
        Self::Pipeline(msg.into())
    }

    pub fn flow(msg: impl Into<String>) -> Self {
        Self::Flow(msg.into())
    }

    pub fn prompt(msg: impl Into<String>) -> Self {
        Self::Prompt(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
