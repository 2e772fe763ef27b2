use std::fmt;
use std::str::FromStr;

use sispm::OutletState;

use crate::Error;

/// Something the operator asked for, in the same words the console accepts:
///
/// - `wake <device name | mac>`
/// - `outlet <slot> on|off|status`
/// - `roof`
/// - `remote <command>`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Wake(String),
    Outlet { slot: u8, state: OutletState },
    OutletStatus(u8),
    Roof,
    Remote(String),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Action::Wake(target) => write!(f, "wake {target}"),
            Action::Outlet { slot, state } => write!(f, "outlet {slot} {state}"),
            Action::OutletStatus(slot) => write!(f, "outlet {slot} status"),
            Action::Roof => write!(f, "roof"),
            Action::Remote(name) => write!(f, "remote {name}"),
        }
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Action, Self::Err> {
        const USAGE: &str = "expected wake <device|mac>, outlet <slot> on|off|status, \
            roof or remote <command>";

        let invalid = || Error::InvalidAction(format!("`{}`, {USAGE}", s.trim()));

        let s = s.trim();
        let (verb, rest) = s.split_once(char::is_whitespace).unwrap_or((s, ""));
        let rest = rest.trim();

        match verb.to_ascii_lowercase().as_str() {
            "wake" if !rest.is_empty() => Ok(Action::Wake(rest.to_string())),
            "roof" if rest.is_empty() => Ok(Action::Roof),
            "remote" if !rest.is_empty() && !rest.contains(char::is_whitespace) => {
                Ok(Action::Remote(rest.to_string()))
            }
            "outlet" => {
                let mut words = rest.split_whitespace();
                let slot = words
                    .next()
                    .and_then(|slot| slot.parse().ok())
                    .ok_or_else(invalid)?;

                match (words.next(), words.next()) {
                    (Some(word), None) if word.eq_ignore_ascii_case("status") => {
                        Ok(Action::OutletStatus(slot))
                    }
                    (Some(word), None) => {
                        let state = word.parse().map_err(|_| invalid())?;
                        Ok(Action::Outlet { slot, state })
                    }
                    _ => Err(invalid()),
                }
            }
            _ => Err(invalid()),
        }
    }
}
