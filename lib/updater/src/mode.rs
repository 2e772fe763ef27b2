use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Only report that the remote copy differs.
    #[default]
    Notify,
    /// Replace the local file once the download matches its published digest.
    Apply,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Notify => write!(f, "notify"),
            Mode::Apply => write!(f, "apply"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notify" => Ok(Mode::Notify),
            "apply" => Ok(Mode::Apply),
            other => Err(format!("unknown update mode {other}, expected notify or apply")),
        }
    }
}
