use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[allow(clippy::enum_variant_names)]
#[derive(Error, Debug)]
pub enum Error {
    /// Error body returned by Appwrite for a non-2xx response.
    /// Displays the server message as-is, so callers can surface it unchanged.
    #[error("{message}")]
    Service { code: u16, kind: String, message: String },
    #[error("Invalid field: {0}")]
    InvalidField(String),
    #[error("Cannot encode/decode JSON: {0}")]
    JSONError(#[from] serde_json::Error),
    #[error("IO Error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Network Error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Cannot parse URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl Error {
    /// HTTP status of a service error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Service { code, .. } => Some(*code),
            Error::NetworkError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
