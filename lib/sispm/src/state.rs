use std::fmt;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OutletState {
    On,
    Off,
}

impl OutletState {
    /// Switch flag understood by sispmctl.
    pub fn flag(self) -> &'static str {
        match self {
            OutletState::On => "-o",
            OutletState::Off => "-f",
        }
    }
}

impl fmt::Display for OutletState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutletState::On => write!(f, "on"),
            OutletState::Off => write!(f, "off"),
        }
    }
}

impl FromStr for OutletState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "on" | "1" => Ok(OutletState::On),
            "off" | "0" => Ok(OutletState::Off),
            other => Err(format!("expected on or off, got {other}")),
        }
    }
}
