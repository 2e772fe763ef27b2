mod invocation;
pub use invocation::{Invocation, Output};

mod runner;
pub use runner::{ProcessRunner, Runner};

mod error;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
