pub mod action;
pub mod config;
pub mod console;
pub mod devices;
pub mod dispatcher;
pub mod journal;
pub mod roof;
pub mod settings;
pub mod update;

mod json;

mod error;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
