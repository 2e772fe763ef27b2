use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    InvalidUrl(String),
    UrlParse(chipp_http::UrlParseError),
    Http(chipp_http::Error),
    EmptyDownload(String),
    InvalidDigest(String),
    DigestMismatch { expected: String, actual: String },
    Io(PathBuf, std::io::Error),
}

impl From<chipp_http::UrlParseError> for Error {
    fn from(err: chipp_http::UrlParseError) -> Self {
        Self::UrlParse(err)
    }
}

impl From<chipp_http::Error> for Error {
    fn from(err: chipp_http::Error) -> Self {
        Self::Http(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(url) => write!(f, "invalid url: {url}"),
            Self::UrlParse(err) => write!(f, "url parse error: {err}"),
            Self::Http(err) => write!(f, "http error: {err}"),
            Self::EmptyDownload(url) => write!(f, "{url} returned an empty body"),
            Self::InvalidDigest(digest) => write!(f, "invalid sha256 digest: {digest}"),
            Self::DigestMismatch { expected, actual } => {
                write!(f, "digest mismatch: expected {expected}, got {actual}")
            }
            Self::Io(path, err) => write!(f, "io error at {}: {err}", path.display()),
        }
    }
}

impl std::error::Error for Error {}
