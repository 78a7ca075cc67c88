//! CRC32C integrity checking for write-ahead log records.
//!
//! Every record appended to the backend's durability log carries a checksum
//! so a partial or corrupted write is detected (rather than silently
//! accepted) during replay at `Database::open`.

use crc32fast::Hasher;

/// Computes the CRC32C checksum of `data`.
pub fn checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Verifies `data` against an `expected` checksum.
pub fn verify(data: &[u8], expected: u32) -> Result<(), ChecksumError> {
    let actual = checksum(data);
    if actual != expected {
        return Err(ChecksumError::Mismatch {
            expected,
            actual,
            data_len: data.len(),
        });
    }
    Ok(())
}

/// Encodes a checksummed block: `[data_len: u32][data][checksum: u32]`.
pub fn encode_with_checksum(data: &[u8]) -> Vec<u8> {
    let crc = checksum(data);
    let mut encoded = Vec::with_capacity(4 + data.len() + 4);
    encoded.extend_from_slice(&(data.len() as u32).to_le_bytes());
    encoded.extend_from_slice(data);
    encoded.extend_from_slice(&crc.to_le_bytes());
    encoded
}

/// Decodes and verifies a block produced by [`encode_with_checksum`].
pub fn decode_with_checksum(encoded: &[u8]) -> Result<Vec<u8>, ChecksumError> {
    if encoded.len() < 8 {
        return Err(ChecksumError::InvalidFormat("block shorter than header".into()));
    }

    let data_len = u32::from_le_bytes(encoded[0..4].try_into().unwrap()) as usize;
    if encoded.len() != 4 + data_len + 4 {
        return Err(ChecksumError::InvalidFormat(format!(
            "expected {} bytes, got {}",
            4 + data_len + 4,
            encoded.len()
        )));
    }

    let data = &encoded[4..4 + data_len];
    let expected = u32::from_le_bytes(encoded[4 + data_len..4 + data_len + 4].try_into().unwrap());
    verify(data, expected)?;
    Ok(data.to_vec())
}

#[derive(Debug, thiserror::Error)]
pub enum ChecksumError {
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x} (data_len={data_len})")]
    Mismatch {
        expected: u32,
        actual: u32,
        data_len: usize,
    },

    #[error("invalid checksum block: {0}")]
    InvalidFormat(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_matching_checksum() {
        let data = b"hello, index";
        let crc = checksum(data);
        assert!(verify(data, crc).is_ok());
        assert!(verify(data, crc + 1).is_err());
    }

    #[test]
    fn encode_decode_round_trips() {
        let data = b"some WAL record bytes";
        let encoded = encode_with_checksum(data);
        let decoded = decode_with_checksum(&encoded).unwrap();
        assert_eq!(data.as_slice(), decoded.as_slice());
    }

    #[test]
    fn decode_rejects_corruption() {
        let data = b"some WAL record bytes";
        let mut encoded = encode_with_checksum(data);
        let last = encoded.len() - 6;
        encoded[last] ^= 0xFF;
        let result = decode_with_checksum(&encoded);
        assert!(matches!(result, Err(ChecksumError::Mismatch { .. })));
    }

    #[test]
    fn decode_rejects_truncation() {
        assert!(decode_with_checksum(b"abc").is_err());
        let mut invalid = vec![0u8; 20];
        invalid[0] = 100;
        assert!(decode_with_checksum(&invalid).is_err());
    }
}
