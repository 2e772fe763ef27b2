use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};
use wol::MacAddr;

use crate::{json, Result};

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct DeviceRecord {
    pub name: String,
    pub mac: MacAddr,
    pub ip: IpAddr,
}

impl fmt::Display for DeviceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.name, self.mac, self.ip)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceRegistry {
    devices: Vec<DeviceRecord>,
}

fn device(name: &str, mac: [u8; 6], ip: [u8; 4]) -> DeviceRecord {
    DeviceRecord {
        name: name.to_string(),
        mac: MacAddr(mac),
        ip: IpAddr::V4(Ipv4Addr::from(ip)),
    }
}

impl DeviceRegistry {
    pub fn new(devices: Vec<DeviceRecord>) -> Self {
        Self { devices }
    }

    /// Hosts of the C14 observatory network.
    pub fn builtin() -> Self {
        Self::new(vec![
            device("VNT", [0x78, 0x24, 0xaf, 0x9c, 0x06, 0xe7], [172, 20, 20, 123]),
            device("C14", [0xe0, 0xd5, 0x5e, 0x37, 0x4f, 0xad], [172, 20, 20, 103]),
            device("AZ2000 mount", [0x00, 0xc0, 0x08, 0xa9, 0xc2, 0x32], [172, 20, 20, 10]),
            device("AZ2000 RPi allsky", [0xd8, 0x3a, 0xdd, 0x9a, 0x05, 0xd4], [172, 20, 20, 116]),
            device("GM3000 mount", [0x00, 0xc0, 0x08, 0xaa, 0x35, 0x12], [172, 20, 20, 12]),
            device("GM3000 RPi pi1", [0xd8, 0x3a, 0xdd, 0x89, 0x4d, 0xd0], [172, 20, 20, 112]),
        ])
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read(path.as_ref())?;
        let devices: Vec<DeviceRecord> = serde_json::from_slice(&content)?;

        info!("loaded {} devices from {}", devices.len(), path.as_ref().display());

        Ok(Self::new(devices))
    }

    pub fn save_snapshot<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        json::write_pretty(path.as_ref(), &self.devices)
    }

    pub fn devices(&self) -> &[DeviceRecord] {
        &self.devices
    }

    pub fn find(&self, name: &str) -> Option<&DeviceRecord> {
        let name = name.trim();
        self.devices
            .iter()
            .find(|device| device.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_case_insensitive() {
        let registry = DeviceRegistry::builtin();

        let device = registry.find("az2000 mount").unwrap();
        assert_eq!(device.mac.to_string(), "00:c0:08:a9:c2:32");
        assert_eq!(device.ip.to_string(), "172.20.20.10");

        assert!(registry.find("C15").is_none());
    }

    #[test]
    fn test_display() {
        let registry = DeviceRegistry::builtin();
        assert_eq!(
            registry.devices()[1].to_string(),
            "C14 - e0:d5:5e:37:4f:ad - 172.20.20.103"
        );
    }

    #[test]
    fn test_snapshot_round_trip() {
        let path = std::env::temp_dir().join(format!("mac-{}.json", uuid::Uuid::new_v4()));
        let registry = DeviceRegistry::builtin();

        registry.save_snapshot(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("[\n    {\n        \"name\": \"VNT\""));

        assert_eq!(DeviceRegistry::load(&path).unwrap(), registry);
    }

    #[test]
    fn test_load_accepts_dash_separated_macs() {
        let path = std::env::temp_dir().join(format!("devices-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(
            &path,
            r#"[{"name": "hlavny", "mac": "E0-D5-5E-DF-C6-4E", "ip": "172.20.20.133"}]"#,
        )
        .unwrap();

        let registry = DeviceRegistry::load(&path).unwrap();
        assert_eq!(
            registry.find("hlavny").unwrap().mac.to_string(),
            "e0:d5:5e:df:c6:4e"
        );
    }

    #[test]
    fn test_load_rejects_invalid_mac() {
        let path = std::env::temp_dir().join(format!("devices-{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&path, r#"[{"name": "x", "mac": "00:11", "ip": "10.0.0.1"}]"#).unwrap();

        assert!(DeviceRegistry::load(&path).is_err());
    }
}
