use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use log::debug;

use crate::{Connection, Error, Result};

pub const RESERVED_KEYS: [&str; 4] = ["ip", "user", "psw", "port"];

const DEFAULT_PORT: u16 = 22;

/// Connection details and named commands for the Windows helper host.
///
/// The file is line based, `key value [value ...]`:
///
/// ```text
/// ip 172.20.20.103
/// user observer
/// psw secret
/// restart_mount shutdown /r /t 0
/// ```
///
/// `ip`, `user`, `psw` and `port` are connection settings, every other key is
/// a runnable command whose text is the rest of the line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RemoteConfig {
    pub host: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub port: Option<u16>,
    pub commands: BTreeMap<String, String>,
}

impl RemoteConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: RemoteConfig = content.parse()?;

        debug!(
            "loaded {} remote commands from {}",
            config.commands.len(),
            path.as_ref().display()
        );

        Ok(config)
    }

    pub fn command(&self, name: &str) -> Result<&str> {
        self.commands
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::UnknownCommand(name.to_string()))
    }

    pub fn connection(
        &self,
        connect_timeout: Duration,
        command_timeout: Option<Duration>,
    ) -> Result<Connection> {
        Ok(Connection {
            host: self.host.clone().ok_or(Error::MissingKey("ip"))?,
            port: self.port.unwrap_or(DEFAULT_PORT),
            user: self.user.clone().ok_or(Error::MissingKey("user"))?,
            password: self.password.clone().ok_or(Error::MissingKey("psw"))?,
            connect_timeout,
            command_timeout,
        })
    }
}

impl FromStr for RemoteConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut config = RemoteConfig::default();

        for (index, line) in s.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let key = match tokens.next() {
                Some(key) => key,
                None => continue,
            };
            let value = tokens.collect::<Vec<_>>().join(" ");

            if value.is_empty() {
                return Err(Error::MissingValue {
                    line: index + 1,
                    key: key.to_string(),
                });
            }

            match key {
                "ip" => config.host = Some(value),
                "user" => config.user = Some(value),
                "psw" => config.password = Some(value),
                "port" => {
                    let port = value.parse().map_err(|_| Error::InvalidPort(value))?;
                    config.port = Some(port);
                }
                _ => {
                    config.commands.insert(key.to_string(), value);
                }
            }
        }

        Ok(config)
    }
}
