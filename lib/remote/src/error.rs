use std::fmt;

#[derive(Debug)]
pub enum Error {
    MissingValue { line: usize, key: String },
    InvalidPort(String),
    MissingKey(&'static str),
    UnknownCommand(String),
    Resolve(String),
    Connect(String, std::io::Error),
    AuthenticationFailed(String),
    Exit {
        code: i32,
        output: String,
    },
    Ssh(ssh2::Error),
    Io(std::io::Error),
    Join(tokio::task::JoinError),
}

impl From<ssh2::Error> for Error {
    fn from(err: ssh2::Error) -> Self {
        Self::Ssh(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingValue { line, key } => write!(f, "line {line}: key {key} has no value"),
            Self::InvalidPort(port) => write!(f, "invalid ssh port: {port}"),
            Self::MissingKey(key) => write!(f, "remote config is missing key {key}"),
            Self::UnknownCommand(name) => write!(f, "unknown remote command: {name}"),
            Self::Resolve(host) => write!(f, "unable to resolve {host}"),
            Self::Connect(addr, err) => write!(f, "unable to connect to {addr}: {err}"),
            Self::AuthenticationFailed(user) => write!(f, "authentication failed for {user}"),
            Self::Exit { code, output } => {
                write!(f, "remote command exited with status {code}")?;
                if !output.trim().is_empty() {
                    write!(f, ": {}", output.trim())?;
                }
                Ok(())
            }
            Self::Ssh(err) => write!(f, "ssh error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
            Self::Join(err) => write!(f, "join error: {err}"),
        }
    }
}

impl std::error::Error for Error {}
