use std::fmt;

#[derive(Debug)]
pub enum Error {
    InvalidSlot { slot: u8, slots: u8 },
    Exec(exec::Error),
    UnexpectedOutput(String),
}

impl From<exec::Error> for Error {
    fn from(err: exec::Error) -> Self {
        Self::Exec(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSlot { slot, slots } => {
                write!(f, "outlet {slot} does not exist, valid outlets are 1..={slots}")
            }
            Self::Exec(err) => write!(f, "{err}"),
            Self::UnexpectedOutput(output) => write!(f, "unexpected status output: {output}"),
        }
    }
}

impl std::error::Error for Error {}
