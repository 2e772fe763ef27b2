use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use log::{debug, trace};
use tokio::net::UdpSocket;

use crate::packet::{magic_packet, PACKET_LEN};
use crate::{Error, MacAddr, Result};

pub const WOL_PORT: u16 = 9;
pub const BROADCAST_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::BROADCAST, WOL_PORT));

/// Sends a single magic packet for `mac` to `target`.
///
/// Fire and forget: there is no way to know whether the host woke up.
pub async fn wake(mac: &MacAddr, target: SocketAddr) -> Result<()> {
    let packet = magic_packet(mac);

    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.set_broadcast(true)?;

    let sent = socket.send_to(&packet, target).await?;
    trace!("sent {sent} bytes to {target}");

    if sent != PACKET_LEN {
        return Err(Error::ShortWrite(sent));
    }

    debug!("magic packet for {mac} sent to {target}");

    Ok(())
}
