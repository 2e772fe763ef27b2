use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use updater::Mode;

use crate::{Error, Result};

const DEFAULT_ROOF_DIR: &str = "/home/dpv/Downloads/usb-relay-hid-master/commandline/makemake";
const DEFAULT_ROOF_SCRIPT: &str = "./strecha_on.sh";
const DEFAULT_OUTLET_NAMES: [&str; 4] = ["none(1)", "AZ2000(2)", "C14(3)", "UNKNOWN(4)"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WakeConfig {
    /// External utility called as `<tool> <mac>` instead of sending the packet.
    pub tool: Option<String>,
    pub target: SocketAddr,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutletConfig {
    pub tool: String,
    pub slots: u8,
    pub names: Vec<String>,
    pub timeout: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoofConfig {
    pub dir: PathBuf,
    pub script: String,
    pub timeout: Duration,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteSettings {
    pub path: PathBuf,
    pub connect_timeout: Duration,
    /// `None` lets a remote command run for as long as it needs.
    pub command_timeout: Option<Duration>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateConfig {
    pub url: String,
    pub digest_url: Option<String>,
    pub target: PathBuf,
    pub mode: Mode,
    pub interval: Duration,
}

/// Everything the panel needs, read once at startup and handed down.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub home: PathBuf,
    pub devices_file: Option<PathBuf>,
    pub snapshot_file: Option<PathBuf>,
    pub settings_file: PathBuf,
    pub saved_log_file: PathBuf,
    pub log_mirror: Option<PathBuf>,
    pub wake: WakeConfig,
    pub outlets: OutletConfig,
    pub roof: RoofConfig,
    pub remote: RemoteSettings,
    pub update: Option<UpdateConfig>,
}

impl Config {
    /// Reads the process environment. `home` takes precedence over `JADIV_HOME`.
    pub fn from_env(home: Option<&Path>) -> Result<Self> {
        Self::from_lookup(|name| match (name, home) {
            ("JADIV_HOME", Some(home)) => Some(home.display().to_string()),
            _ => std::env::var(name).ok(),
        })
    }

    /// Builds the config from `lookup`, which maps variable names such as
    /// `OUTLET_SLOTS` to their values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let home = PathBuf::from(var("JADIV_HOME").unwrap_or_else(|| ".".to_string()));
        let path_or = |name: &str, file: &str| {
            var(name)
                .map(PathBuf::from)
                .unwrap_or_else(|| home.join(file))
        };

        let names = match var("OUTLET_NAMES") {
            Some(names) => names.split(',').map(|name| name.trim().to_string()).collect(),
            None => DEFAULT_OUTLET_NAMES.iter().map(|name| name.to_string()).collect(),
        };

        let slots = parse_or(var("OUTLET_SLOTS"), "OUTLET_SLOTS", 4u8)?;
        if slots == 0 {
            return Err(Error::InvalidVar {
                name: "OUTLET_SLOTS",
                value: slots.to_string(),
            });
        }

        let update = match var("UPDATE_URL") {
            Some(url) => {
                let target = match var("UPDATE_TARGET") {
                    Some(target) => PathBuf::from(target),
                    None => std::env::current_exe()?,
                };

                Some(UpdateConfig {
                    url,
                    digest_url: var("UPDATE_DIGEST_URL"),
                    target,
                    mode: parse_or(var("UPDATE_MODE"), "UPDATE_MODE", Mode::Notify)?,
                    interval: Duration::from_secs(
                        60 * parse_or(var("UPDATE_INTERVAL"), "UPDATE_INTERVAL", 15u64)?,
                    ),
                })
            }
            None => None,
        };

        Ok(Config {
            devices_file: var("DEVICES_FILE").map(PathBuf::from),
            snapshot_file: Some(path_or("SNAPSHOT_FILE", "mac.json")),
            settings_file: path_or("SETTINGS_FILE", "settings.json"),
            saved_log_file: path_or("SAVED_LOG_FILE", "logs.txt"),
            log_mirror: var("LOG_FILE").map(PathBuf::from),
            wake: WakeConfig {
                tool: var("WAKE_TOOL"),
                target: parse_or(var("WAKE_TARGET"), "WAKE_TARGET", wol::BROADCAST_ADDR)?,
            },
            outlets: OutletConfig {
                tool: var("OUTLET_TOOL").unwrap_or_else(|| "sispmctl".to_string()),
                slots,
                names,
                timeout: seconds(var("OUTLET_TIMEOUT"), "OUTLET_TIMEOUT", 10)?,
            },
            roof: RoofConfig {
                dir: var("ROOF_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOF_DIR)),
                script: var("ROOF_SCRIPT").unwrap_or_else(|| DEFAULT_ROOF_SCRIPT.to_string()),
                timeout: seconds(var("ROOF_TIMEOUT"), "ROOF_TIMEOUT", 300)?,
            },
            remote: RemoteSettings {
                path: path_or("REMOTE_CONFIG", "remote.txt"),
                connect_timeout: seconds(var("REMOTE_TIMEOUT"), "REMOTE_TIMEOUT", 10)?,
                command_timeout: Some(seconds(
                    var("REMOTE_COMMAND_TIMEOUT"),
                    "REMOTE_COMMAND_TIMEOUT",
                    600,
                )?)
                .filter(|timeout| !timeout.is_zero()),
            },
            update,
            home,
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, name: &'static str, default: T) -> Result<T> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| Error::InvalidVar { name, value }),
        None => Ok(default),
    }
}

fn seconds(value: Option<String>, name: &'static str, default: u64) -> Result<Duration> {
    parse_or(value, name, default).map(Duration::from_secs)
}
