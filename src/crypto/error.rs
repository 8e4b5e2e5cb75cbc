use thiserror::Error;

use crate::crypto::base58::Base58Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error(transparent)]
    Base58(#[from] Base58Error),

    #[error("payload length {actual} does not match the expected {expected} bytes")]
    BadLength { expected: usize, actual: usize },

    #[error("curve tag/prefix {0:#x} is not one of the supported ed25519/secp256k1/P-256 tags")]
    UnsupportedCurve(u8),

    #[error("signature does not verify against the given public key and message")]
    SignatureVerifyFailed,

    #[error("malformed key or signature material")]
    MalformedKey,

    #[error("ECDSA nonce generation did not converge on a valid scalar")]
    NonceGenerationFailed,
}
