use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Process-wide error taxonomy, matching the policy table in the design document:
/// handshake and device errors are fatal, config errors abort startup, invariant
/// violations are logged and the offending keystroke is dropped.
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("config: {0}")]
    Config(String),
    #[error("handshake: {0}")]
    Handshake(String),
    #[error("device: {0}")]
    Device(String),
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn handshake(msg: impl Into<String>) -> Self {
        Self::Handshake(msg.into())
    }

    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}
