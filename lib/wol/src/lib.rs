mod mac;
pub use mac::MacAddr;

mod packet;
pub use packet::{magic_packet, PACKET_LEN};

mod sender;
pub use sender::{wake, BROADCAST_ADDR, WOL_PORT};

mod error;
pub use error::Error;

pub type Result<T> = std::result::Result<T, Error>;
