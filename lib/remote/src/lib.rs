mod config;
pub use config::{RemoteConfig, RESERVED_KEYS};

mod ssh;
pub use ssh::{CommandOutput, Connection};

mod error;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
