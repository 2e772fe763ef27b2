use std::fmt;

#[derive(Debug)]
pub enum Error {
    UnknownDevice(String),
    InvalidAction(String),
    InvalidVar { name: &'static str, value: String },
    MissingVar(&'static str),
    RoofBusy,
    Wol(wol::Error),
    Outlet(sispm::Error),
    Exec(exec::Error),
    Remote(remote::Error),
    Update(updater::Error),
    Json(serde_json::Error),
    Io(std::io::Error),
}

impl From<wol::Error> for Error {
    fn from(err: wol::Error) -> Self {
        Self::Wol(err)
    }
}

impl From<sispm::Error> for Error {
    fn from(err: sispm::Error) -> Self {
        Self::Outlet(err)
    }
}

impl From<exec::Error> for Error {
    fn from(err: exec::Error) -> Self {
        Self::Exec(err)
    }
}

impl From<remote::Error> for Error {
    fn from(err: remote::Error) -> Self {
        Self::Remote(err)
    }
}

impl From<updater::Error> for Error {
    fn from(err: updater::Error) -> Self {
        Self::Update(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownDevice(name) => write!(f, "unknown device {name}"),
            Self::InvalidAction(msg) => write!(f, "invalid action: {msg}"),
            Self::InvalidVar { name, value } => write!(f, "invalid value for {name}: {value}"),
            Self::MissingVar(name) => write!(f, "{name} is not set"),
            Self::RoofBusy => write!(f, "roof script is already running"),
            Self::Wol(err) => write!(f, "{err}"),
            Self::Outlet(err) => write!(f, "{err}"),
            Self::Exec(err) => write!(f, "{err}"),
            Self::Remote(err) => write!(f, "{err}"),
            Self::Update(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "json error: {err}"),
            Self::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for Error {}
