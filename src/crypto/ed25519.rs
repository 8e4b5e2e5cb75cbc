//! Ed25519 sign/verify (spec §4.4, §4.6's "standard library primitive" curve).

use ed25519_dalek::{Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey};

use crate::crypto::error::CryptoError;

pub const SECRET_KEY_SIZE: usize = 32;
pub const PUBLIC_KEY_SIZE: usize = 32;
pub const SIGNATURE_SIZE: usize = 64;

/// Derives the raw 32-byte public key from a 32-byte seed (the `edsk`-prefixed secret key).
pub fn public_key_from_seed(seed: &[u8]) -> Result<[u8; PUBLIC_KEY_SIZE], CryptoError> {
    let seed: [u8; SECRET_KEY_SIZE] =
        seed.try_into().map_err(|_| CryptoError::BadLength {
            expected: SECRET_KEY_SIZE,
            actual: seed.len(),
        })?;
    let signing_key = SigningKey::from_bytes(&seed);
    Ok(signing_key.verifying_key().to_bytes())
}

/// Signs `hash` with the secret key seed, returning the 64-byte raw signature.
pub fn sign(seed: &[u8], hash: &[u8; 32]) -> Result<[u8; SIGNATURE_SIZE], CryptoError> {
    let seed: [u8; SECRET_KEY_SIZE] =
        seed.try_into().map_err(|_| CryptoError::BadLength {
            expected: SECRET_KEY_SIZE,
            actual: seed.len(),
        })?;
    let signing_key = SigningKey::from_bytes(&seed);
    Ok(signing_key.sign(hash).to_bytes())
}

/// Verifies a raw 64-byte signature over `hash` against a raw 32-byte public key.
pub fn verify(public_key: &[u8], hash: &[u8; 32], signature: &[u8]) -> Result<(), CryptoError> {
    let public_key: [u8; PUBLIC_KEY_SIZE] =
        public_key
            .try_into()
            .map_err(|_| CryptoError::BadLength {
                expected: PUBLIC_KEY_SIZE,
                actual: public_key.len(),
            })?;
    let signature: [u8; SIGNATURE_SIZE] =
        signature
            .try_into()
            .map_err(|_| CryptoError::BadLength {
                expected: SIGNATURE_SIZE,
                actual: signature.len(),
            })?;

    let verifying_key =
        VerifyingKey::from_bytes(&public_key).map_err(|_| CryptoError::MalformedKey)?;
    let signature = DalekSignature::from_bytes(&signature);
    verifying_key
        .verify(hash, &signature)
        .map_err(|_| CryptoError::SignatureVerifyFailed)
}
