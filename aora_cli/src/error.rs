use std::process::ExitCode;

use aora_core::Error as AoraError;
use appwrite_client::Error as ClientError;

/// How a failed command is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Unauthorized,
    NotFound,
    Network,
    Invalid,
    Other,
}

#[derive(Debug)]
pub struct CliError(anyhow::Error);

impl<E> From<E> for CliError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.0)
    }
}

impl CliError {
    pub fn failure(&self) -> Failure {
        for cause in self.0.chain() {
            if let Some(err) = cause.downcast_ref::<ClientError>() {
                return client_failure(err);
            }
            if let Some(err) = cause.downcast_ref::<AoraError>() {
                match err {
                    // Backend errors travel inside `Other` and don't show up in the chain themselves.
                    AoraError::Other(inner) => {
                        if let Some(err) = inner.downcast_ref::<ClientError>() {
                            return client_failure(err);
                        }
                        return Failure::Other;
                    }
                    AoraError::EmptyResult(_) => return Failure::NotFound,
                    AoraError::IncompleteUpload(_)
                    | AoraError::InvalidField(_)
                    | AoraError::Config(_)
                    | AoraError::AssetError(_) => return Failure::Invalid,
                    _ => return Failure::Other,
                }
            }
        }
        Failure::Other
    }

    pub fn exit_code(&self) -> ExitCode {
        let code = match self.failure() {
            Failure::Unauthorized => 3,
            Failure::NotFound => 4,
            Failure::Network => 5,
            Failure::Invalid => 2,
            Failure::Other => 1,
        };
        ExitCode::from(code)
    }

    /// One-line message for the terminal, prefixed by what kind of failure it was.
    pub fn report(&self) -> String {
        let prefix = match self.failure() {
            Failure::Unauthorized => "Not signed in",
            Failure::NotFound => "Not found",
            Failure::Network => "Network error",
            Failure::Invalid => "Invalid input",
            Failure::Other => "Error",
        };
        format!("{}: {}", prefix, self)
    }
}

fn client_failure(err: &ClientError) -> Failure {
    match err {
        ClientError::NetworkError(_) => Failure::Network,
        ClientError::InvalidField(_) | ClientError::UrlError(_) => Failure::Invalid,
        _ => match err.status() {
            Some(401) | Some(403) => Failure::Unauthorized,
            Some(404) => Failure::NotFound,
            Some(400) | Some(409) => Failure::Invalid,
            _ => Failure::Other,
        },
    }
}
