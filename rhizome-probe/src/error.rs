use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("DNS resolution failed: {0}")]
    Resolve(#[from] hickory_resolver::ResolveError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, ProbeError>;
