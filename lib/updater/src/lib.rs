mod source;
pub use source::{HttpSource, Source};

mod digest;
pub use digest::{parse_digest, sha256_hex};

mod mode;
pub use mode::Mode;

mod updater;
pub use updater::{Outcome, Updater};

mod error;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
