use std::fmt;

#[derive(Debug)]
pub enum Error {
    InvalidLength(usize),
    InvalidMac(String),
    ShortWrite(usize),
    Io(std::io::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength(len) => {
                write!(f, "invalid mac address: expected 12 hex digits, got {len}")
            }
            Self::InvalidMac(mac) => write!(f, "invalid mac address: {mac}"),
            Self::ShortWrite(sent) => write!(f, "magic packet truncated: sent {sent} bytes"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for Error {}
