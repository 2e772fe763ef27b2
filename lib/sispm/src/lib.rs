mod state;
pub use state::OutletState;

mod strip;
pub use strip::PowerStrip;

mod board;
pub use board::{Outlet, OutletBoard, TrackedState};

mod error;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
