use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A backend call resolved, but to nothing meaningful.
    #[error("{0}")]
    EmptyResult(String),
    #[error("Upload incomplete: {0}")]
    IncompleteUpload(String),
    #[error("Invalid field: {0}")]
    InvalidField(String),
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Cannot parse URL: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("Cannot resolve asset: {0}")]
    AssetError(#[from] aora_util::ParsingError),

    /// Backend failures keep their own message.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
