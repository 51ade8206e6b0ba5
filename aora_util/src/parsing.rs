use std::path::PathBuf;
use thiserror::Error;

use url::Url;

#[derive(Debug, Clone, Error)]
pub enum ParsingError {
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),
    #[error("Invalid file URI: {0}")]
    InvalidFileUri(String),
}

type Result<T> = std::result::Result<T, ParsingError>;

/// Resolve a picked asset's URI to a local path.
/// Accepts `file://` URLs as handed out by media pickers, or plain filesystem paths.
pub fn local_path(uri: &str) -> Result<PathBuf> {
    if uri.starts_with("file://") {
        let url = Url::parse(uri)?;
        return url
            .to_file_path()
            .map_err(|_| ParsingError::InvalidFileUri(uri.to_string()));
    }
    if uri.contains("://") {
        return Err(ParsingError::InvalidFileUri(uri.to_string()));
    }
    Ok(PathBuf::from(uri))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_local_path() {
        assert_eq!(local_path("/tmp/clip.mp4").unwrap(), PathBuf::from("/tmp/clip.mp4"));
        assert_eq!(local_path("file:///tmp/clip.mp4").unwrap(), PathBuf::from("/tmp/clip.mp4"));
        assert!(local_path("content://media/external/video/42").is_err());
    }
}
