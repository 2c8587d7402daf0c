//! CRC32 calculation for persistent block validation
//!
//! Detects a persistent memory block that was corrupted (or never
//! initialized) across a warm reset.

use crc::{Crc, Digest, CRC_32_ISO_HDLC};

/// CRC32 algorithm (ISO HDLC / Ethernet / ZIP)
static CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Calculate CRC32 checksum of data
///
/// Uses the CRC-32-ISO-HDLC algorithm (polynomial 0x04C11DB7),
/// which is the same as used in Ethernet, ZIP, and PNG.
pub fn calculate_crc32(data: &[u8]) -> u32 {
    CRC32.checksum(data)
}

/// Validate data against CRC32 checksum
pub fn validate_crc32(data: &[u8], expected_crc: u32) -> bool {
    calculate_crc32(data) == expected_crc
}

/// Incremental CRC32 over data fed in pieces
pub struct Crc32Digest {
    digest: Digest<'static, u32>,
}

impl Crc32Digest {
    pub fn new() -> Self {
        Self {
            digest: CRC32.digest(),
        }
    }

    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.digest.update(data);
        self
    }

    pub fn update_u32(&mut self, value: u32) -> &mut Self {
        self.update(&value.to_le_bytes())
    }

    pub fn update_u64(&mut self, value: u64) -> &mut Self {
        self.update(&value.to_le_bytes())
    }

    pub fn finalize(self) -> u32 {
        self.digest.finalize()
    }
}

impl Default for Crc32Digest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn test_crc32_known_values() {
        // Known CRC32 values for test vectors
        let test_cases = [
            (b"" as &[u8], 0x00000000u32), // Empty data
            (b"a", 0xE8B7BE43),
            (b"abc", 0x352441C2),
            (b"123456789", 0xCBF43926),
        ];

        for (data, expected) in test_cases {
            assert_eq!(
                calculate_crc32(data),
                expected,
                "CRC mismatch for '{}'",
                core::str::from_utf8(data).unwrap()
            );
        }
    }

    #[test]
    fn test_validate_crc32() {
        let data = b"Test data for CRC validation";
        let crc = calculate_crc32(data);

        assert!(validate_crc32(data, crc));
        assert!(!validate_crc32(data, crc + 1));
        assert!(!validate_crc32(data, 0));
    }

    #[test]
    fn test_digest_matches_one_shot() {
        let mut digest = Crc32Digest::new();
        digest.update(b"1234").update(b"56789");
        assert_eq!(digest.finalize(), 0xCBF43926);

        let mut digest = Crc32Digest::new();
        digest.update_u32(0x4252_4B50).update_u64(7);
        let mut bytes = [0u8; 12];
        bytes[..4].copy_from_slice(&0x4252_4B50u32.to_le_bytes());
        bytes[4..].copy_from_slice(&7u64.to_le_bytes());
        assert_eq!(digest.finalize(), calculate_crc32(&bytes));
    }

    #[test]
    fn test_crc32_detects_corruption() {
        let data = b"Original data";
        let crc = calculate_crc32(data);

        let mut corrupted = *data;
        corrupted[0] ^= 0x01;

        assert!(!validate_crc32(&corrupted, crc));
    }
}
