//! Blake2b hashing used for watermarked message/operation hashes and for
//! public-key-hash (pkh) derivation (spec §4.4).

use blake2::digest::consts::{U20, U32};
use blake2::{Blake2b, Digest};

type Blake2b256 = Blake2b<U32>;
type Blake2b160 = Blake2b<U20>;

/// Hashes `data` to 32 bytes with Blake2b-256. Used for the watermarked
/// message/operation hash that gets signed.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let digest = Blake2b256::digest(data);
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}

/// Hashes `data` to 20 bytes with Blake2b-160. Used to derive a public-key
/// hash (pkh) from a raw public key.
pub fn blake2b_160(data: &[u8]) -> [u8; 20] {
    let digest = Blake2b160::digest(data);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest);
    out
}

/// Prepends `watermark` to `message` and hashes the result with Blake2b-256
/// (spec §4.4's watermarking step).
pub fn watermarked_hash(watermark: u8, message: &[u8]) -> [u8; 32] {
    let mut buf = Vec::with_capacity(1 + message.len());
    buf.push(watermark);
    buf.extend_from_slice(message);
    blake2b_256(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_sizes() {
        assert_eq!(blake2b_256(b"abc").len(), 32);
        assert_eq!(blake2b_160(b"abc").len(), 20);
    }

    #[test]
    fn deterministic() {
        assert_eq!(blake2b_256(b"tezos"), blake2b_256(b"tezos"));
        assert_eq!(blake2b_160(b"tezos"), blake2b_160(b"tezos"));
    }

    #[test]
    fn watermark_changes_digest() {
        assert_ne!(
            watermarked_hash(0x03, b"payload"),
            watermarked_hash(0x05, b"payload")
        );
    }
}
