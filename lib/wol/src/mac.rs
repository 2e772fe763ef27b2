use std::fmt;
use std::str::FromStr;

use serde::{
    de::{self, Unexpected},
    Deserialize, Serialize,
};

use crate::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

impl FromStr for MacAddr {
    type Err = Error;

    /// Accepts `aa:bb:cc:dd:ee:ff`, `aa-bb-cc-dd-ee-ff` and `aabbccddeeff`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: Vec<u8> = s
            .trim()
            .bytes()
            .filter(|b| *b != b':' && *b != b'-')
            .collect();

        if normalized.len() != 12 {
            return Err(Error::InvalidLength(normalized.len()));
        }

        let mut octets = [0u8; 6];
        for (octet, pair) in octets.iter_mut().zip(normalized.chunks(2)) {
            let high = hex_value(pair[0]).ok_or_else(|| Error::InvalidMac(s.to_string()))?;
            let low = hex_value(pair[1]).ok_or_else(|| Error::InvalidMac(s.to_string()))?;
            *octet = high << 4 | low;
        }

        Ok(MacAddr(octets))
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl Serialize for MacAddr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MacAddr {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct MacAddrVisitor;

        impl de::Visitor<'_> for MacAddrVisitor {
            type Value = MacAddr;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("12 hex digits, optionally separated by ':' or '-'")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                MacAddr::from_str(value).map_err(|err| {
                    de::Error::invalid_value(Unexpected::Str(value), &err.to_string().as_str())
                })
            }
        }

        deserializer.deserialize_str(MacAddrVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const C14: [u8; 6] = [0xe0, 0xd5, 0x5e, 0x37, 0x4f, 0xad];

    #[test]
    fn test_parse_separators() {
        assert_eq!(MacAddr::from_str("e0:d5:5e:37:4f:ad").unwrap().0, C14);
        assert_eq!(MacAddr::from_str("E0-D5-5E-37-4F-AD").unwrap().0, C14);
        assert_eq!(MacAddr::from_str("e0d55e374fad").unwrap().0, C14);
        assert_eq!(MacAddr::from_str("  e0:d5:5e:37:4f:ad\n").unwrap().0, C14);
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            MacAddr::from_str("e0:d5:5e:37:4f"),
            Err(Error::InvalidLength(10))
        ));
        assert!(matches!(
            MacAddr::from_str("e0:d5:5e:37:4f:ad:01"),
            Err(Error::InvalidLength(14))
        ));
        assert!(matches!(MacAddr::from_str(""), Err(Error::InvalidLength(0))));
    }

    #[test]
    fn test_parse_non_hex() {
        assert!(matches!(
            MacAddr::from_str("e0:d5:5e:37:4f:zz"),
            Err(Error::InvalidMac(_))
        ));
        // multi-byte characters must not panic on the pair split
        assert!(MacAddr::from_str("é0:d5:5e:37:4f:a").is_err());
    }

    #[test]
    fn test_display() {
        let mac = MacAddr(C14);
        assert_eq!(mac.to_string(), "e0:d5:5e:37:4f:ad");
    }

    #[test]
    fn test_serde() {
        let mac: MacAddr = serde_json::from_str(r#""00-C0-08-A9-C2-32""#).unwrap();
        assert_eq!(mac.0, [0x00, 0xc0, 0x08, 0xa9, 0xc2, 0x32]);
        assert_eq!(serde_json::to_string(&mac).unwrap(), r#""00:c0:08:a9:c2:32""#);

        assert!(serde_json::from_str::<MacAddr>(r#""00:c0""#).is_err());
    }
}
