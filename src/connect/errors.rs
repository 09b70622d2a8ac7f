/// Errors that can occur while building a Connect authorization request
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    #[error("${name} must be boolean, got {found}")]
    InvalidArgument { name: &'static str, found: &'static str },
    #[error("Unknown Connect scope: {0}")]
    UnknownScope(String),
    #[error("Unknown permission: {0}")]
    UnknownPermission(String),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("Invalid Authorization header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),
}
