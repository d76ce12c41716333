//! SHA-256 content digests for attachment payloads.
//!
//! Attachments are content-addressed: the registry hashes the bytes it
//! received and hands the hex digest back in the [`ContentHash`]. Readers
//! of an event compare that digest against the blob they fetch.
//!
//! [`ContentHash`]: evidence_types::ContentHash

use sha2::{Digest, Sha256};

/// Size of the read buffer used when hashing a stream.
pub const CHUNK_SIZE: usize = 8192;

/// Compute the SHA-256 hex digest of a byte slice.
#[must_use]
pub fn bytes_digest(data: &[u8]) -> String {
    hex_encode(&Sha256::digest(data))
}

/// Encode a finished digest as a lowercase hex string.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_digest_empty() {
        assert_eq!(
            bytes_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn bytes_digest_hello_world() {
        assert_eq!(
            bytes_digest(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn hex_encode_pads() {
        assert_eq!(hex_encode(&[0x00, 0x0f, 0xff]), "000fff");
    }
}
