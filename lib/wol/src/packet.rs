use crate::MacAddr;

pub const PACKET_LEN: usize = 6 + 16 * 6;

pub fn magic_packet(mac: &MacAddr) -> [u8; PACKET_LEN] {
    let mut bytes = [0xff; PACKET_LEN];

    for chunk in bytes[6..].chunks_exact_mut(6) {
        chunk.copy_from_slice(&mac.0);
    }

    bytes
}
