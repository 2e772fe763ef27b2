use sha2::{Digest, Sha256};

use crate::{Error, Result};

pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Takes the first token of a `sha256sum`-style line, e.g.
/// `9f86d08...  main.py`.
pub fn parse_digest(content: &[u8]) -> Result<String> {
    let content = String::from_utf8_lossy(content);
    let digest = content.split_whitespace().next().unwrap_or_default();

    match hex::decode(digest) {
        Ok(bytes) if bytes.len() == 32 => Ok(digest.to_ascii_lowercase()),
        _ => Err(Error::InvalidDigest(digest.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SHA256: &str = "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08";

    #[test]
    fn test_sha256_hex() {
        assert_eq!(sha256_hex(b"test"), TEST_SHA256);
    }

    #[test]
    fn test_parse_digest() {
        let line = format!("{}  main.py\n", TEST_SHA256.to_uppercase());
        assert_eq!(parse_digest(line.as_bytes()).unwrap(), TEST_SHA256);

        assert!(parse_digest(b"").is_err());
        assert!(parse_digest(b"abcdef  main.py").is_err());
        assert!(parse_digest(b"not hex at all").is_err());
    }
}
