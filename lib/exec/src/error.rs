use std::fmt;
use std::time::Duration;

#[derive(Debug)]
pub enum Error {
    Spawn(String, std::io::Error),
    Timeout(String, Duration),
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn(command, err) => write!(f, "unable to start `{command}`: {err}"),
            Self::Timeout(command, after) => {
                write!(f, "`{command}` did not finish in {}s", after.as_secs())
            }
            Self::Failed {
                command,
                code: Some(code),
                stderr,
            } => write!(f, "`{command}` exited with status {code}: {}", stderr.trim()),
            Self::Failed {
                command,
                code: None,
                stderr,
            } => write!(f, "`{command}` was terminated by a signal: {}", stderr.trim()),
        }
    }
}

impl std::error::Error for Error {}
