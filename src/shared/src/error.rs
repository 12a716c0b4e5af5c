use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Application not found: {0}")]
    ApplicationNotFound(String),

    #[error("System error: {0}")]
    System(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::System(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::System(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(format!("JSON error: {}", err))
    }
}

/// Outcome of one microphone capture attempt. Timeout and unrecognized
/// audio are distinct, non-fatal cases; transport failures are terminal
/// for the voice loop.
#[derive(Debug, Error)]
pub enum ListenError {
    #[error("no phrase detected before the timeout")]
    Timeout,

    #[error("audio captured but not recognized")]
    Unrecognized,

    #[error("speech transport error: {0}")]
    Transport(String),
}
