//! Signing, address derivation and Base58Check plumbing (spec §4.4).
//!
//! This module is the only place that dispatches on [`Curve`]; every other
//! module deals in raw bytes and prefix-decoded strings.

pub mod base58;
pub mod curve;
pub mod ecdsa;
pub mod ed25519;
pub mod error;
pub mod hash;
pub mod hmac_drbg;

use base58::Prefix;
use curve::Curve;
use ecdsa::{EcdsaEngine, P256Engine, Secp256k1Engine};
pub use error::CryptoError;
use zeroize::Zeroizing;

/// Watermark prepended before hashing an operation group (spec §4.4).
pub const WATERMARK_OPERATION: u8 = 0x03;
/// Watermark prepended before hashing an arbitrary (non-operation) message.
pub const WATERMARK_GENERIC_MESSAGE: u8 = 0x05;

/// Decodes a Base58Check-encoded secret key, returning its curve and the raw
/// key bytes (32 bytes for every supported curve). The bytes are wrapped so
/// they are wiped from memory as soon as the caller is done with them.
fn decode_secret_key(secret_key_string: &str) -> Result<(Curve, Zeroizing<Vec<u8>>), CryptoError> {
    let (prefix, raw) = base58::decode_any(secret_key_string)?;
    let curve = match prefix {
        Prefix::EdSk => Curve::Ed25519,
        Prefix::SpSk => Curve::Secp256k1,
        Prefix::P2Sk => Curve::P256,
        _ => return Err(CryptoError::UnsupportedCurve(0xff)),
    };
    Ok((curve, Zeroizing::new(raw)))
}

/// Decodes a Base58Check-encoded public key, returning its curve and the raw
/// key bytes (32 bytes for ed25519, 33 bytes sec1-compressed otherwise).
fn decode_public_key(public_key_string: &str) -> Result<(Curve, Vec<u8>), CryptoError> {
    let (prefix, raw) = base58::decode_any(public_key_string)?;
    let curve = Curve::from_public_key_prefix(prefix)?;
    Ok((curve, raw))
}

/// Decodes a Base58Check-encoded signature (curve-specific or the generic
/// `sig` form), returning the curve hint (`None` for `sig`) and raw 64 bytes.
fn decode_signature_string(sig: &str) -> Result<(Option<Curve>, [u8; 64]), CryptoError> {
    let (prefix, raw) = base58::decode_any(sig)?;
    let curve = match prefix {
        Prefix::EdSig => Some(Curve::Ed25519),
        Prefix::SpSig => Some(Curve::Secp256k1),
        Prefix::P2Sig => Some(Curve::P256),
        Prefix::Sig => None,
        _ => return Err(CryptoError::UnsupportedCurve(0xff)),
    };
    let raw: [u8; 64] = raw
        .try_into()
        .map_err(|v: Vec<u8>| CryptoError::BadLength { expected: 64, actual: v.len() })?;
    Ok((curve, raw))
}

/// Decodes `sig` and returns its raw bytes, discarding curve information
/// (spec §4's `crypto.decode_signature(sig) → raw_bytes`).
pub fn decode_signature(sig: &str) -> Result<[u8; 64], CryptoError> {
    Ok(decode_signature_string(sig)?.1)
}

/// Derives the raw public-key-hash (pkh) bytes for `curve` from a raw public key.
fn pkh_bytes(curve: Curve, raw_public_key: &[u8]) -> [u8; 20] {
    let _ = curve;
    hash::blake2b_160(raw_public_key)
}

/// Applies `watermark` (or the operation default if `None`) and Blake2b-256
/// hashes `message`.
fn watermarked(watermark: Option<u8>, message: &[u8]) -> [u8; 32] {
    hash::watermarked_hash(watermark.unwrap_or(WATERMARK_OPERATION), message)
}

/// Signs `message` with `secret_key_string`, applying `watermark` (defaults
/// to the operation watermark `0x03` when `None`) before hashing, and
/// returns the curve-appropriate Base58Check signature string.
pub fn sign_message(
    secret_key_string: &str,
    message: &[u8],
    watermark: Option<u8>,
) -> Result<String, CryptoError> {
    let (curve, sk) = decode_secret_key(secret_key_string)?;
    let digest = watermarked(watermark, message);
    let raw_sig = match curve {
        Curve::Ed25519 => ed25519::sign(&sk, &digest)?.to_vec(),
        Curve::Secp256k1 => Secp256k1Engine::sign(&sk, &digest)?.to_vec(),
        Curve::P256 => P256Engine::sign(&sk, &digest)?.to_vec(),
    };
    base58::encode(curve.signature_prefix(), &raw_sig).map_err(CryptoError::from)
}

/// Convenience over [`sign_message`] that always applies the operation
/// watermark `0x03` (spec §4.4's `sign_operation`).
pub fn sign_operation(secret_key_string: &str, forged_bytes: &[u8]) -> Result<String, CryptoError> {
    sign_message(secret_key_string, forged_bytes, Some(WATERMARK_OPERATION))
}

/// Verifies `sig` over `message` (watermarked as `sign_message` would) using
/// `public_key_string`. If `sig` carries a curve-specific prefix it must
/// match the public key's curve; the generic `sig` prefix accepts any curve.
pub fn check_signature(
    public_key_string: &str,
    sig: &str,
    message: &[u8],
    watermark: Option<u8>,
) -> Result<(), CryptoError> {
    let (pk_curve, pk) = decode_public_key(public_key_string)?;
    let (sig_curve, raw_sig) = decode_signature_string(sig)?;
    if let Some(sig_curve) = sig_curve {
        if sig_curve != pk_curve {
            return Err(CryptoError::UnsupportedCurve(0xff));
        }
    }
    let digest = watermarked(watermark, message);
    match pk_curve {
        Curve::Ed25519 => ed25519::verify(&pk, &digest, &raw_sig),
        Curve::Secp256k1 => Secp256k1Engine::verify(&pk, &digest, &raw_sig),
        Curve::P256 => P256Engine::verify(&pk, &digest, &raw_sig),
    }
}

/// Derives the Base58Check pkh string (`tz1`/`tz2`/`tz3`) for a Base58Check
/// public key string.
pub fn derive_address(public_key_string: &str) -> Result<String, CryptoError> {
    let (curve, raw) = decode_public_key(public_key_string)?;
    let pkh = pkh_bytes(curve, &raw);
    base58::encode(curve.public_key_hash_prefix(), &pkh).map_err(CryptoError::from)
}

/// Validates that `s` is a well-formed, checksummed Base58Check string for
/// one of the known kinds, returning which kind it decoded as.
pub fn validate_address(s: &str) -> Result<Prefix, CryptoError> {
    let (kind, _payload) = base58::decode_any(s)?;
    Ok(kind)
}

/// Re-encodes `raw_hex` (a raw public key, hex-encoded) under the prefix
/// matching `pkh`'s curve (spec §4.4's `encode_pubkey`).
pub fn encode_pubkey(pkh: &str, raw_hex: &str) -> Result<String, CryptoError> {
    let (pkh_prefix, _) = base58::decode_any(pkh)?;
    let curve = Curve::from_pkh_prefix(pkh_prefix)?;
    let raw = hex::decode(raw_hex).map_err(|_| CryptoError::MalformedKey)?;
    base58::encode(curve.public_key_prefix(), &raw).map_err(CryptoError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ed25519_keypair() -> (String, String) {
        let seed = [0x42u8; 32];
        let pk = ed25519::public_key_from_seed(&seed).unwrap();
        let sk_string = base58::encode(Prefix::EdSk, &seed).unwrap();
        let pk_string = base58::encode(Prefix::EdPk, &pk).unwrap();
        (sk_string, pk_string)
    }

    #[test]
    fn sign_then_check_round_trip_ed25519() {
        let (sk, pk) = ed25519_keypair();
        let msg = b"deadbeef";
        let sig = sign_message(&sk, msg, Some(WATERMARK_GENERIC_MESSAGE)).unwrap();
        assert!(check_signature(&pk, &sig, msg, Some(WATERMARK_GENERIC_MESSAGE)).is_ok());
    }

    #[test]
    fn flipped_signature_byte_fails_check() {
        let (sk, pk) = ed25519_keypair();
        let msg = b"deadbeef";
        let sig = sign_operation(&sk, msg).unwrap();
        let mut raw = decode_signature(&sig).unwrap();
        raw[0] ^= 0x01;
        let corrupted = base58::encode(Prefix::EdSig, &raw).unwrap();
        assert_eq!(
            check_signature(&pk, &corrupted, msg, None),
            Err(CryptoError::SignatureVerifyFailed)
        );
    }

    #[test]
    fn derive_address_is_deterministic() {
        let (_, pk) = ed25519_keypair();
        let a = derive_address(&pk).unwrap();
        let b = derive_address(&pk).unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("tz1"));
    }

    #[test]
    fn validate_address_reports_kind() {
        let (_, pk) = ed25519_keypair();
        let addr = derive_address(&pk).unwrap();
        assert_eq!(validate_address(&addr).unwrap(), Prefix::Tz1);
        assert!(validate_address("not-a-valid-string").is_err());
    }

    #[test]
    fn encode_pubkey_matches_original() {
        let (_, pk) = ed25519_keypair();
        let addr = derive_address(&pk).unwrap();
        let (_, raw_pk) = decode_public_key(&pk).unwrap();
        let reencoded = encode_pubkey(&addr, &hex::encode(raw_pk)).unwrap();
        assert_eq!(reencoded, pk);
    }
}
