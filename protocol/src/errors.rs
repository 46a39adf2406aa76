pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("cryptographic error: {0}")]
    Crypto(#[from] keyveil_crypto::Error),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("link broken: {0}")]
    LinkBroken(String),
    #[error("device error: {0}")]
    Device(String),
    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

impl Error {
    pub fn link_broken(msg: impl Into<String>) -> Self {
        Self::LinkBroken(msg.into())
    }

    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }
}

impl From<Error> for keyveil_core::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Crypto(c) => keyveil_core::Error::handshake(c.to_string()),
            Error::Io(io) => keyveil_core::Error::Io(io),
            Error::LinkBroken(m) => keyveil_core::Error::handshake(m),
            Error::Device(m) => keyveil_core::Error::device(m),
            Error::Invariant(m) => keyveil_core::Error::invariant(m),
        }
    }
}
